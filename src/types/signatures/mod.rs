//! Generic type signatures in the JVM.
//!
//! A signature encodes a declaration written in the Java programming language that uses types
//! outside the type system of the JVM, i.e., generic types, type variables, and parameterized
//! types. Unlike descriptors, signatures keep the type arguments and type parameters so that the
//! generic shape of a class, method, or field can be recovered from a class file.
//!
//! All the types in this module are immutable values. Parsing is strict: the whole input must be
//! matched by the grammar, and [`Display`](std::fmt::Display) reproduces the input exactly.
//!
//! ```
//! use cortado::types::signatures::{ClassSignature, Signature};
//!
//! let signature = "<T:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/List<TT;>;";
//! let parsed: ClassSignature = signature.parse().unwrap();
//! assert_eq!(parsed.type_parameters.len(), 1);
//! assert_eq!(parsed.to_string(), signature);
//! assert!(parsed.erased_binary_references().contains("java/util/List"));
//! ```
//!
//! See the [JVM Specification §4.7.9.1](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.7.9.1) for more information.

use std::collections::HashSet;

mod class;
mod class_type;
mod erasure;
mod field;
mod java_type;
mod method;
mod parser;

pub use class::{ClassSignature, TypeParameter};
pub use class_type::{ClassTypeSignature, SimpleClassTypeSignature, TypeArgument, WildcardIndicator};
pub use field::FieldSignature;
pub use java_type::{
    ArrayTypeSignature, BaseType, JavaTypeSignature, ReferenceTypeSignature, TypeVariableSignature,
};
pub use method::{MethodSignature, ResultType, ThrowsSignature};

/// The binary name of `java.lang.Object`.
pub const OBJECT_BINARY_NAME: &str = "java/lang/Object";

/// A signature node whose erased class references can be collected.
pub trait Signature {
    /// Adds the binary names of all the classes referenced by this signature to `references`.
    fn collect_erased_references<'s>(&'s self, references: &mut HashSet<&'s str>);

    /// Returns the binary names of the classes referenced anywhere in this signature, including
    /// type arguments, bounds, array components, and throws clauses.
    /// Type variables and primitive types do not contribute any reference.
    fn erased_binary_references(&self) -> HashSet<&str> {
        let mut references = HashSet::new();
        self.collect_erased_references(&mut references);
        references
    }
}

/// An error indicating that a signature string does not conform to the grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid signature \"{signature}\" at position {position}: expected {expected}")]
pub struct InvalidSignature {
    /// The complete signature being parsed.
    pub signature: String,
    /// The byte offset in [`signature`](Self::signature) where parsing failed.
    pub position: usize,
    /// What the grammar requires at [`position`](Self::position).
    pub expected: &'static str,
}
