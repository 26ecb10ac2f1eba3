//! Module containing the APIs for the JVM elements.
//!
//! The class file reader in this module only keeps what is needed to recover the generic shape
//! of classes: names, access flags, super types, and the `Signature` attributes of the class and
//! its members.

pub mod class;
pub mod class_loader;
pub mod field;
pub mod method;
pub mod parsing;
pub mod references;

pub use class::Class;
pub use field::Field;
pub use method::Method;
