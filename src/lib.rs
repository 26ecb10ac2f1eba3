#![warn(
    clippy::pedantic,
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms
)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(rustdoc::broken_intra_doc_links)]

//! Welcome to `cortado`, a library for parsing JVM generic signatures and resolving type
//! variables through class hierarchies.
//!
//! - [`types::signatures`] parses the `Signature` attributes of class files into a typed AST.
//! - [`analysis::generics`] resolves the type variables of inherited fields and methods as seen
//!   from a subclass.
//! - [`jvm`] reads the generic information out of class files and loads classes from class
//!   paths.
//!
//! ## Features
#![doc = document_features::document_features!()]

pub mod analysis;
pub mod jvm;
pub(crate) mod macros;
pub mod types;

/// Test utilities
#[cfg(test)]
pub mod tests;
