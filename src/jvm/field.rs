//! Fields of a JVM class.
use bitflags::bitflags;

use crate::types::signatures::{FieldSignature, JavaTypeSignature};

use super::references::ClassRef;

/// A JVM field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// The access flags of the field.
    pub access_flags: AccessFlags,
    /// The name of the field.
    pub name: String,
    /// The class containing the field.
    pub owner: ClassRef,
    /// The erased type of the field, from its descriptor.
    pub field_type: JavaTypeSignature,
    /// The generic signature of the field, from its `Signature` attribute.
    pub signature: Option<FieldSignature>,
}

impl Field {
    /// The type of the field with its type arguments.
    /// This is the type in the `Signature` attribute if present, or the erased type otherwise.
    #[must_use]
    pub fn generic_type(&self) -> JavaTypeSignature {
        match &self.signature {
            Some(signature) => signature.field_type.clone().into(),
            None => self.field_type.clone(),
        }
    }

    /// Checks whether the field is `static`.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.access_flags.contains(AccessFlags::STATIC)
    }
}

bitflags! {
    /// The access flags of a [`Field`].
    #[derive(Debug, PartialEq, Eq, Clone, Copy)]
    pub struct AccessFlags: u16 {
        /// Declared `public`; may be accessed from outside its package.
        const PUBLIC = 0x0001;
        /// Declared `private`; accessible only within the defining class and other classes belonging to the same nest.
        const PRIVATE = 0x0002;
        /// Declared `protected`; may be accessed within subclasses.
        const PROTECTED = 0x0004;
        /// Declared `static`.
        const STATIC = 0x0008;
        /// Declared `final`; never directly assigned to after object construction.
        const FINAL = 0x0010;
        /// Declared `volatile`; cannot be cached.
        const VOLATILE = 0x0040;
        /// Declared `transient`; not written or read by a persistent object manager.
        const TRANSIENT = 0x0080;
        /// Declared synthetic; not present in the source code.
        const SYNTHETIC = 0x1000;
        /// Declared as an element of an `enum` class.
        const ENUM = 0x4000;
    }
}
