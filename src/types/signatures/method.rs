use std::fmt::Display;

use itertools::Itertools;

use super::{
    ClassTypeSignature, JavaTypeSignature, ReferenceTypeSignature, TypeParameter,
    TypeVariableSignature,
};

/// The generic signature of a method, e.g.,
/// `<T:Ljava/lang/Object;>(TT;I)Ljava/lang/String;^Ljava/io/IOException;`.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct MethodSignature {
    /// The type parameters declared by the method.
    pub type_parameters: Vec<TypeParameter>,
    /// The types of the formal parameters.
    pub parameter_types: Vec<JavaTypeSignature>,
    /// The return type.
    pub result_type: ResultType,
    /// The types in the `throws` clause.
    pub throw_types: Vec<ThrowsSignature>,
}

impl MethodSignature {
    /// Returns the type parameter named `identifier`, if the method declares one.
    #[must_use]
    pub fn type_parameter(&self, identifier: &str) -> Option<&TypeParameter> {
        self.type_parameters
            .iter()
            .find(|it| it.identifier == identifier)
    }
}

impl Display for MethodSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.type_parameters.is_empty() {
            write!(f, "<{}>", self.type_parameters.iter().join(""))?;
        }
        write!(
            f,
            "({}){}",
            self.parameter_types.iter().join(""),
            self.result_type
        )?;
        for throws in &self.throw_types {
            write!(f, "^{throws}")?;
        }
        Ok(())
    }
}

/// The return type of a method.
#[derive(Debug, PartialEq, Eq, Hash, Clone, derive_more::Display)]
pub enum ResultType {
    /// The method returns a value of the given type.
    Some(JavaTypeSignature),
    /// The method does not return a value.
    #[display("V")]
    Void,
}

impl ResultType {
    /// Returns the type of the returned value, or [`None`] for `void`.
    #[must_use]
    pub fn as_type(&self) -> Option<&JavaTypeSignature> {
        match self {
            Self::Some(it) => Some(it),
            Self::Void => None,
        }
    }
}

/// A type in the `throws` clause of a method.
#[derive(Debug, PartialEq, Eq, Hash, Clone, derive_more::From, derive_more::Display)]
pub enum ThrowsSignature {
    /// A class type, e.g., `^Ljava/io/IOException;`.
    Class(ClassTypeSignature),
    /// A type variable, e.g., `^TE;`.
    TypeVariable(TypeVariableSignature),
}

impl From<ThrowsSignature> for ReferenceTypeSignature {
    fn from(value: ThrowsSignature) -> Self {
        match value {
            ThrowsSignature::Class(it) => Self::Class(it),
            ThrowsSignature::TypeVariable(it) => Self::TypeVariable(it),
        }
    }
}

impl ThrowsSignature {
    /// Converts a reference type into a throws signature.
    /// Returns [`None`] for array types, which cannot be thrown.
    #[must_use]
    pub fn from_reference(reference: ReferenceTypeSignature) -> Option<Self> {
        match reference {
            ReferenceTypeSignature::Class(it) => Some(Self::Class(it)),
            ReferenceTypeSignature::TypeVariable(it) => Some(Self::TypeVariable(it)),
            ReferenceTypeSignature::Array(_) => None,
        }
    }
}
