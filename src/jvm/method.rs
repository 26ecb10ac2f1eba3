//! Methods of a JVM class.
use bitflags::bitflags;

use crate::types::signatures::{MethodSignature, ThrowsSignature};

use super::references::ClassRef;

/// A JVM method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    /// The access flags of the method.
    pub access_flags: AccessFlags,
    /// The name of the method.
    pub name: String,
    /// The class containing the method.
    pub owner: ClassRef,
    /// The erased method type, from its descriptor.
    /// A descriptor never has type parameters or a `throws` clause.
    pub descriptor: MethodSignature,
    /// The generic signature of the method, from its `Signature` attribute.
    pub signature: Option<MethodSignature>,
    /// The checked exceptions listed in the `Exceptions` attribute.
    pub exceptions: Vec<ClassRef>,
}

impl Method {
    /// The name of the constructors.
    pub const CONSTRUCTOR_NAME: &'static str = "<init>";
    /// The name of the class initializer.
    pub const CLASS_INITIALIZER_NAME: &'static str = "<clinit>";

    /// The generic signature of the method.
    /// This is the `Signature` attribute if present, or the descriptor otherwise. When the
    /// chosen signature has no `throws` clause, the exceptions of the method are used instead.
    #[must_use]
    pub fn generic_signature(&self) -> MethodSignature {
        let mut signature = self
            .signature
            .clone()
            .unwrap_or_else(|| self.descriptor.clone());
        if signature.throw_types.is_empty() {
            signature.throw_types = self
                .exceptions
                .iter()
                .map(|it| ThrowsSignature::Class(it.to_class_type()))
                .collect();
        }
        signature
    }

    /// Checks whether the method is a constructor.
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.name == Self::CONSTRUCTOR_NAME
    }

    /// Checks whether the method is `static`.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.access_flags.contains(AccessFlags::STATIC)
    }
}

bitflags! {
    /// The access flags of a [`Method`].
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
        /// Declared `final`; must not be overridden.
        const FINAL = 0x0010;
        /// Declared `synchronized`; invocation is wrapped by a monitor use.
        const SYNCHRONIZED = 0x0020;
        /// A bridge method, generated by the compiler.
        const BRIDGE = 0x0040;
        /// Declared with variable number of arguments.
        const VARARGS = 0x0080;
        /// Declared `native`; implemented in a language other than Java.
        const NATIVE = 0x0100;
        /// Declared `abstract`; no implementation is provided.
        const ABSTRACT = 0x0400;
        /// In a class file whose major version number is at least 46 and at most 60; Declared `strictfp`.
        const STRICT = 0x0800;
        /// Declared synthetic; not present in the source code.
        const SYNTHETIC = 0x1000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(descriptor: &str, signature: Option<&str>, exceptions: &[&str]) -> Method {
        Method {
            access_flags: AccessFlags::PUBLIC,
            name: Method::CONSTRUCTOR_NAME.to_owned(),
            owner: ClassRef::new("a/Reader"),
            descriptor: descriptor.parse().unwrap(),
            signature: signature.map(|it| it.parse().unwrap()),
            exceptions: exceptions.iter().map(|&it| ClassRef::new(it)).collect(),
        }
    }

    #[test]
    fn signature_attribute_wins() {
        let generic = method(
            "(Ljava/util/List;)V",
            Some("<T:Ljava/lang/Object;>(Ljava/util/List<TT;>;)V"),
            &["java/io/IOException"],
        );
        assert_eq!(
            generic.generic_signature().to_string(),
            "<T:Ljava/lang/Object;>(Ljava/util/List<TT;>;)V^Ljava/io/IOException;"
        );
        assert!(generic.is_constructor());
        assert!(!generic.is_static());
    }

    #[test]
    fn signature_throws_clause_wins() {
        let generic = method(
            "()V",
            Some("<E:Ljava/lang/Exception;>()V^TE;"),
            &["java/lang/Exception"],
        );
        assert_eq!(
            generic.generic_signature().to_string(),
            "<E:Ljava/lang/Exception;>()V^TE;"
        );
    }

    #[test]
    fn descriptor_with_exceptions() {
        let plain = method(
            "(I[Ljava/lang/String;)J",
            None,
            &["java/io/IOException", "java/sql/SQLException"],
        );
        assert_eq!(
            plain.generic_signature().to_string(),
            "(I[Ljava/lang/String;)J^Ljava/io/IOException;^Ljava/sql/SQLException;"
        );
    }
}
