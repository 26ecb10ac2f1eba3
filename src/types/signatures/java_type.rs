use std::fmt::Display;

use super::{ClassTypeSignature, class_type::TypeArgument};

/// A primitive type in Java.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum BaseType {
    /// The `byte` type.
    Byte,
    /// The `char` type.
    Char,
    /// The `double` type.
    Double,
    /// The `float` type.
    Float,
    /// The `int` type.
    Int,
    /// The `long` type.
    Long,
    /// The `short` type.
    Short,
    /// The `boolean` type.
    Boolean,
}

impl BaseType {
    /// All the primitive types in the order of their descriptors.
    pub const ALL: [BaseType; 8] = [
        Self::Byte,
        Self::Char,
        Self::Double,
        Self::Float,
        Self::Int,
        Self::Long,
        Self::Short,
        Self::Boolean,
    ];

    /// Returns the primitive type denoted by the descriptor character `c`.
    #[must_use]
    pub const fn from_descriptor(c: char) -> Option<Self> {
        match c {
            'B' => Some(Self::Byte),
            'C' => Some(Self::Char),
            'D' => Some(Self::Double),
            'F' => Some(Self::Float),
            'I' => Some(Self::Int),
            'J' => Some(Self::Long),
            'S' => Some(Self::Short),
            'Z' => Some(Self::Boolean),
            _ => None,
        }
    }

    /// Returns the descriptor character of this type.
    #[must_use]
    pub const fn descriptor(self) -> char {
        match self {
            Self::Byte => 'B',
            Self::Char => 'C',
            Self::Double => 'D',
            Self::Float => 'F',
            Self::Int => 'I',
            Self::Long => 'J',
            Self::Short => 'S',
            Self::Boolean => 'Z',
        }
    }

    /// Returns the keyword used for this type in the Java programming language.
    #[must_use]
    pub const fn java_name(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::Char => "char",
            Self::Double => "double",
            Self::Float => "float",
            Self::Int => "int",
            Self::Long => "long",
            Self::Short => "short",
            Self::Boolean => "boolean",
        }
    }
}

impl Display for BaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.descriptor())
    }
}

/// A primitive or reference type.
#[derive(Debug, PartialEq, Eq, Hash, Clone, derive_more::From, derive_more::Display)]
pub enum JavaTypeSignature {
    /// A primitive type.
    Base(BaseType),
    /// A reference type.
    Reference(ReferenceTypeSignature),
}

impl JavaTypeSignature {
    /// Returns the reference type if this is not a primitive type.
    #[must_use]
    pub fn as_reference(&self) -> Option<&ReferenceTypeSignature> {
        match self {
            Self::Reference(it) => Some(it),
            Self::Base(_) => None,
        }
    }

    /// Creates an array type whose component type is `self`.
    #[must_use]
    pub fn into_array_type(self) -> ReferenceTypeSignature {
        ReferenceTypeSignature::Array(ArrayTypeSignature::new(self))
    }
}

impl From<ClassTypeSignature> for JavaTypeSignature {
    fn from(value: ClassTypeSignature) -> Self {
        Self::Reference(value.into())
    }
}

impl From<TypeVariableSignature> for JavaTypeSignature {
    fn from(value: TypeVariableSignature) -> Self {
        Self::Reference(value.into())
    }
}

impl From<ArrayTypeSignature> for JavaTypeSignature {
    fn from(value: ArrayTypeSignature) -> Self {
        Self::Reference(value.into())
    }
}

/// A class type, an array type, or a type variable.
#[derive(Debug, PartialEq, Eq, Hash, Clone, derive_more::From, derive_more::Display)]
pub enum ReferenceTypeSignature {
    /// A (possibly parameterized) class or interface type.
    Class(ClassTypeSignature),
    /// An array type.
    Array(ArrayTypeSignature),
    /// A type variable.
    TypeVariable(TypeVariableSignature),
}

impl ReferenceTypeSignature {
    /// Returns the signature of `java.lang.Object`.
    #[must_use]
    pub fn object() -> Self {
        Self::Class(ClassTypeSignature::object())
    }

    /// Returns the class type if this is one.
    #[must_use]
    pub fn as_class(&self) -> Option<&ClassTypeSignature> {
        match self {
            Self::Class(it) => Some(it),
            _ => None,
        }
    }

    /// Returns the type variable if this is one.
    #[must_use]
    pub fn as_type_variable(&self) -> Option<&TypeVariableSignature> {
        match self {
            Self::TypeVariable(it) => Some(it),
            _ => None,
        }
    }

    /// Returns the type variables occurring anywhere in this type, in order of appearance.
    #[must_use]
    pub fn type_variables(&self) -> Vec<&TypeVariableSignature> {
        let mut variables = Vec::new();
        self.collect_type_variables(&mut variables);
        variables
    }

    pub(crate) fn collect_type_variables<'s>(&'s self, variables: &mut Vec<&'s TypeVariableSignature>) {
        match self {
            Self::Class(class_type) => class_type
                .segments()
                .flat_map(|it| &it.type_arguments)
                .filter_map(TypeArgument::bound)
                .for_each(|it| it.collect_type_variables(variables)),
            Self::Array(array_type) => {
                if let Some(reference) = array_type.element_type().as_reference() {
                    reference.collect_type_variables(variables);
                }
            }
            Self::TypeVariable(variable) => variables.push(variable),
        }
    }
}

/// An array type.
/// Multi-dimensional arrays are represented by nesting.
#[derive(Debug, PartialEq, Eq, Hash, Clone, derive_more::Display)]
#[display("[{component}")]
pub struct ArrayTypeSignature {
    /// The type of the components.
    pub component: Box<JavaTypeSignature>,
}

impl ArrayTypeSignature {
    /// Creates an array type with the given component type.
    pub fn new(component: impl Into<JavaTypeSignature>) -> Self {
        Self {
            component: Box::new(component.into()),
        }
    }

    /// Returns the number of dimensions of this array type.
    #[must_use]
    pub fn dimensions(&self) -> usize {
        let mut dimensions = 1;
        let mut current = self.component.as_ref();
        while let JavaTypeSignature::Reference(ReferenceTypeSignature::Array(inner)) = current {
            dimensions += 1;
            current = inner.component.as_ref();
        }
        dimensions
    }

    /// Returns the innermost component type, which is never an array type.
    #[must_use]
    pub fn element_type(&self) -> &JavaTypeSignature {
        let mut current = self.component.as_ref();
        while let JavaTypeSignature::Reference(ReferenceTypeSignature::Array(inner)) = current {
            current = inner.component.as_ref();
        }
        current
    }
}

/// A type variable.
/// The identifier only has a meaning with respect to the type parameters in scope.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, derive_more::Display)]
#[display("T{identifier};")]
pub struct TypeVariableSignature {
    /// The name of the type variable.
    pub identifier: String,
}

impl TypeVariableSignature {
    /// Creates a type variable with the given name.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn base_type_descriptor(base_type in any::<BaseType>()) {
            assert_eq!(BaseType::from_descriptor(base_type.descriptor()), Some(base_type));
            assert_eq!(base_type.to_string(), base_type.descriptor().to_string());
        }
    }

    #[test]
    fn void_is_not_a_base_type() {
        assert_eq!(BaseType::from_descriptor('V'), None);
    }

    #[test]
    fn array_dimensions() {
        let array = ArrayTypeSignature::new(JavaTypeSignature::Base(BaseType::Int).into_array_type());
        assert_eq!(array.dimensions(), 2);
        assert_eq!(array.element_type(), &JavaTypeSignature::Base(BaseType::Int));
        assert_eq!(array.to_string(), "[[I");
    }

    #[test]
    fn type_variables_in_order() {
        let element = ClassTypeSignature::object();
        let ty = ReferenceTypeSignature::Array(ArrayTypeSignature::new(TypeVariableSignature::new(
            "E",
        )));
        assert_eq!(ty.type_variables(), vec![&TypeVariableSignature::new("E")]);
        assert!(ReferenceTypeSignature::Class(element).type_variables().is_empty());
    }
}
