//! Module containing the APIs for the JVM type system.
pub mod signatures;
