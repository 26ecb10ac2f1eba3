//! APIs for static analysis.

pub mod generics;
