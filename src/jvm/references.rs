//! References to JVM elements.
use std::fmt::Display;

use crate::types::signatures::ClassTypeSignature;

/// A reference to a [`Class`](crate::jvm::Class).
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
pub struct ClassRef {
    /// The binary name of the class.
    pub binary_name: String,
}

impl ClassRef {
    /// Creates a new [`ClassRef`] from a binary name.
    pub fn new<S: Into<String>>(binary_name: S) -> Self {
        ClassRef {
            binary_name: binary_name.into(),
        }
    }

    /// The non-generic class type denoting the referenced class.
    #[must_use]
    pub fn to_class_type(&self) -> ClassTypeSignature {
        ClassTypeSignature::from_binary_name(&self.binary_name)
    }
}

impl Display for ClassRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.binary_name)
    }
}

impl AsRef<str> for ClassRef {
    fn as_ref(&self) -> &str {
        &self.binary_name
    }
}
