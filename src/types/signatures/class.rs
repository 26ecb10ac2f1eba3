use std::fmt::Display;

use itertools::Itertools;

use super::{ClassTypeSignature, ReferenceTypeSignature};

/// The generic signature of a class or interface, e.g.,
/// `<E:Ljava/lang/Object;>Ljava/util/AbstractList<TE;>;Ljava/util/List<TE;>;`.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct ClassSignature {
    /// The type parameters declared by the class, in declaration order.
    pub type_parameters: Vec<TypeParameter>,
    /// The direct super class.
    pub super_class: ClassTypeSignature,
    /// The direct super interfaces, in declaration order.
    pub super_interfaces: Vec<ClassTypeSignature>,
}

impl ClassSignature {
    /// Creates the signature of a non-generic class that directly extends `super_class`.
    #[must_use]
    pub fn non_generic(super_class: &str, super_interfaces: &[&str]) -> Self {
        Self {
            type_parameters: Vec::new(),
            super_class: ClassTypeSignature::from_binary_name(super_class),
            super_interfaces: super_interfaces
                .iter()
                .map(|it| ClassTypeSignature::from_binary_name(it))
                .collect(),
        }
    }

    /// Returns the type parameter named `identifier`, if the class declares one.
    #[must_use]
    pub fn type_parameter(&self, identifier: &str) -> Option<&TypeParameter> {
        self.type_parameters
            .iter()
            .find(|it| it.identifier == identifier)
    }

    /// Iterates over the direct super class and then the direct super interfaces.
    pub fn super_types(&self) -> impl Iterator<Item = &ClassTypeSignature> {
        std::iter::once(&self.super_class).chain(&self.super_interfaces)
    }
}

impl Display for ClassSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.type_parameters.is_empty() {
            write!(f, "<{}>", self.type_parameters.iter().join(""))?;
        }
        write!(f, "{}", self.super_class)?;
        for interface in &self.super_interfaces {
            write!(f, "{interface}")?;
        }
        Ok(())
    }
}

/// A formal type parameter of a class or a method, e.g., `T:Ljava/lang/Number;` for
/// `T extends Number`.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct TypeParameter {
    /// The name of the type parameter.
    pub identifier: String,
    /// The class bound, absent when the parameter is only bounded by interfaces.
    pub class_bound: Option<ReferenceTypeSignature>,
    /// The interface bounds, in declaration order.
    pub interface_bounds: Vec<ReferenceTypeSignature>,
}

impl TypeParameter {
    /// Returns the leftmost bound, which determines the erasure of the type parameter.
    /// A parameter without any bound is bounded by `java.lang.Object`.
    #[must_use]
    pub fn first_bound(&self) -> ReferenceTypeSignature {
        self.class_bound
            .as_ref()
            .or_else(|| self.interface_bounds.first())
            .cloned()
            .unwrap_or_else(ReferenceTypeSignature::object)
    }

    /// Iterates over the class bound, if any, and then the interface bounds.
    pub fn bounds(&self) -> impl Iterator<Item = &ReferenceTypeSignature> {
        self.class_bound.iter().chain(&self.interface_bounds)
    }
}

impl Display for TypeParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:", self.identifier)?;
        if let Some(class_bound) = &self.class_bound {
            write!(f, "{class_bound}")?;
        }
        for interface_bound in &self.interface_bounds {
            write!(f, ":{interface_bound}")?;
        }
        Ok(())
    }
}
