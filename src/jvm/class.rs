//! Module for the APIs for the class in JVM.
use std::collections::HashSet;

use bitflags::bitflags;

use crate::types::signatures::{ClassSignature, ClassTypeSignature, MethodSignature, Signature};

use super::{field::Field, method::Method, references::ClassRef};

/// A JVM class, reduced to the parts needed to recover its generic shape.
#[doc = crate::macros::see_jvm_spec!(4)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    /// The access modifiers of the class.
    pub access_flags: AccessFlags,
    /// The binary name of the class (e.g., `org/cortado/jvm/Class`).
    pub binary_name: String,
    /// A reference to the superclass of the class.
    /// The class `java/lang/Object` has no superclass, so this field is `None` for that class.
    pub super_class: Option<ClassRef>,
    /// The interfaces implemented by the class.
    pub interfaces: Vec<ClassRef>,
    /// The generic signature of the class, from its `Signature` attribute.
    pub signature: Option<ClassSignature>,
    /// The fields declared the class.
    pub fields: Vec<Field>,
    /// The methods declared in the class.
    pub methods: Vec<Method>,
}

impl Class {
    /// Creates a [`ClassRef`] referring to the class.
    #[must_use]
    pub fn make_ref(&self) -> ClassRef {
        ClassRef::new(&self.binary_name)
    }

    /// The generic signature of the class.
    /// This is the `Signature` attribute if present. Otherwise, it is synthesized from the super
    /// class and the interfaces, without type parameters.
    #[must_use]
    pub fn generic_signature(&self) -> ClassSignature {
        if let Some(signature) = &self.signature {
            return signature.clone();
        }
        ClassSignature {
            type_parameters: Vec::new(),
            super_class: self
                .super_class
                .as_ref()
                .map(ClassRef::to_class_type)
                .unwrap_or_else(ClassTypeSignature::object),
            super_interfaces: self.interfaces.iter().map(ClassRef::to_class_type).collect(),
        }
    }

    /// Returns the binary names of all the classes used in the generic signatures of the class,
    /// its fields, and its methods.
    /// The class itself is not included unless it refers to itself.
    #[must_use]
    pub fn erased_binary_references(&self) -> HashSet<String> {
        let class_signature = self.generic_signature();
        let method_signatures: Vec<MethodSignature> =
            self.methods.iter().map(Method::generic_signature).collect();
        let field_types: Vec<_> = self.fields.iter().map(Field::generic_type).collect();

        let mut references = HashSet::new();
        class_signature.collect_erased_references(&mut references);
        method_signatures
            .iter()
            .for_each(|it| it.collect_erased_references(&mut references));
        field_types
            .iter()
            .for_each(|it| it.collect_erased_references(&mut references));
        references.into_iter().map(str::to_owned).collect()
    }

    /// Gets a field of the class by its name.
    #[must_use]
    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Gets the methods of the class with the given name.
    pub fn get_methods<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Method> + 'a {
        self.methods.iter().filter(move |m| m.name == name)
    }

    /// Gets a method of the class by its name and descriptor.
    #[must_use]
    pub fn get_method(&self, name: &str, descriptor: &MethodSignature) -> Option<&Method> {
        self.methods
            .iter()
            .find(|m| m.name == name && &m.descriptor == descriptor)
    }

    /// Checks whether the class is an interface.
    #[must_use]
    pub const fn is_interface(&self) -> bool {
        self.access_flags.contains(AccessFlags::INTERFACE)
    }
}

bitflags! {
    /// The access flags of a [`Class`].
    #[derive(Debug, PartialEq, Eq, Clone, Copy)]
    pub struct AccessFlags: u16 {
        /// Declared `public`; may be accessed from outside its package.
        const PUBLIC = 0x0001;
        /// Declared `final`; no subclasses allowed.
        const FINAL = 0x0010;
        /// Treat superclass methods specially when invoked by the invokespecial instruction.
        const SUPER = 0x0020;
        /// Is an interface, not a class.
        const INTERFACE = 0x0200;
        /// Declared `abstract`; must not be instantiated.
        const ABSTRACT = 0x0400;
        /// Declared synthetic; not present in the source code.
        const SYNTHETIC = 0x1000;
        /// Declared as an annotation interface.
        const ANNOTATION = 0x2000;
        /// Declared as an enum class.
        const ENUM = 0x4000;
        /// Is a module, not a class or interface.
        const MODULE = 0x8000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jvm::{field, method};

    fn class(signature: Option<&str>) -> Class {
        let owner = ClassRef::new("a/Repository");
        Class {
            access_flags: AccessFlags::PUBLIC | AccessFlags::SUPER,
            binary_name: owner.binary_name.clone(),
            super_class: Some(ClassRef::new("a/Base")),
            interfaces: vec![ClassRef::new("java/lang/Iterable")],
            signature: signature.map(|it| it.parse().unwrap()),
            fields: vec![Field {
                access_flags: field::AccessFlags::PRIVATE,
                name: "items".to_owned(),
                owner: owner.clone(),
                field_type: "Ljava/util/Map;".parse().unwrap(),
                signature: Some(
                    "Ljava/util/Map<Ljava/lang/String;Ljava/util/List<TT;>;>;"
                        .parse()
                        .unwrap(),
                ),
            }],
            methods: vec![Method {
                access_flags: method::AccessFlags::PUBLIC,
                name: "load".to_owned(),
                owner,
                descriptor: "(Ljava/nio/file/Path;)V".parse().unwrap(),
                signature: None,
                exceptions: vec![ClassRef::new("java/io/IOException")],
            }],
        }
    }

    #[test]
    fn signature_is_synthesized_without_attribute() {
        let plain = class(None);
        assert_eq!(
            plain.generic_signature().to_string(),
            "La/Base;Ljava/lang/Iterable;"
        );
        assert!(!plain.is_interface());
        assert_eq!(plain.make_ref(), ClassRef::new("a/Repository"));
    }

    #[test]
    fn references_across_members() {
        let generic = class(Some(
            "<T:Ljava/lang/Number;>La/Base<TT;>;Ljava/lang/Iterable<TT;>;",
        ));
        let mut references: Vec<_> = generic.erased_binary_references().into_iter().collect();
        references.sort();
        assert_eq!(
            references,
            vec![
                "a/Base",
                "java/io/IOException",
                "java/lang/Iterable",
                "java/lang/Number",
                "java/lang/String",
                "java/nio/file/Path",
                "java/util/List",
                "java/util/Map",
            ]
        );
    }

    #[test]
    fn member_lookup() {
        let generic = class(None);
        assert!(generic.get_field("items").is_some());
        assert!(generic.get_field("missing").is_none());
        let descriptor = "(Ljava/nio/file/Path;)V".parse().unwrap();
        assert!(generic.get_method("load", &descriptor).is_some());
        assert_eq!(generic.get_methods("load").count(), 1);
    }
}
