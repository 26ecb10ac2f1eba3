use std::fmt::Display;

use itertools::Itertools;

use super::{OBJECT_BINARY_NAME, ReferenceTypeSignature};

/// A (possibly parameterized) class or interface type, e.g.,
/// `Ljava/util/Map<TK;TV;>.Entry<TK;TV;>;`.
///
/// The binary name of the erased type is derived from the package specifier and the
/// identifiers of all the segments, with nested classes joined by `$`.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct ClassTypeSignature {
    package_specifier: String,
    class_type: SimpleClassTypeSignature,
    inner_types: Vec<SimpleClassTypeSignature>,
    binary: String,
}

impl ClassTypeSignature {
    /// Creates a class type.
    /// `package_specifier` is either empty or ends with `/`, e.g., `"java/util/"`.
    pub fn new(
        package_specifier: impl Into<String>,
        class_type: SimpleClassTypeSignature,
        inner_types: Vec<SimpleClassTypeSignature>,
    ) -> Self {
        let package_specifier = package_specifier.into();
        let mut binary = format!("{package_specifier}{}", class_type.identifier);
        for inner in &inner_types {
            binary.push('$');
            binary.push_str(&inner.identifier);
        }
        Self {
            package_specifier,
            class_type,
            inner_types,
            binary,
        }
    }

    /// Creates a non-generic class type from a binary name, e.g., `java/lang/String`.
    /// Nested classes are not split, so `java/util/Map$Entry` is a single segment.
    #[must_use]
    pub fn from_binary_name(binary_name: &str) -> Self {
        let (package_specifier, identifier) = match binary_name.rfind('/') {
            Some(idx) => binary_name.split_at(idx + 1),
            None => ("", binary_name),
        };
        Self::new(
            package_specifier,
            SimpleClassTypeSignature::new(identifier, Vec::new()),
            Vec::new(),
        )
    }

    /// Returns the signature of `java.lang.Object`.
    #[must_use]
    pub fn object() -> Self {
        Self::from_binary_name(OBJECT_BINARY_NAME)
    }

    /// Checks whether this is `java.lang.Object`.
    #[must_use]
    pub fn is_object(&self) -> bool {
        self.binary == OBJECT_BINARY_NAME
    }

    /// The package, ending with `/`, or empty for the default package.
    #[must_use]
    pub fn package_specifier(&self) -> &str {
        &self.package_specifier
    }

    /// The outermost class.
    #[must_use]
    pub fn class_type(&self) -> &SimpleClassTypeSignature {
        &self.class_type
    }

    /// The nested classes, from the outermost to the innermost.
    #[must_use]
    pub fn inner_types(&self) -> &[SimpleClassTypeSignature] {
        &self.inner_types
    }

    /// The binary name of the erased type, e.g., `java/util/Map$Entry`.
    #[must_use]
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Iterates over the outermost class and then the nested classes.
    pub fn segments(&self) -> impl Iterator<Item = &SimpleClassTypeSignature> {
        std::iter::once(&self.class_type).chain(&self.inner_types)
    }

    /// Returns the type arguments applied to the class denoted by this type, i.e., those of the
    /// innermost segment.
    #[must_use]
    pub fn innermost_type_arguments(&self) -> &[TypeArgument] {
        &self
            .inner_types
            .last()
            .unwrap_or(&self.class_type)
            .type_arguments
    }

    /// Returns the erasure of this type, i.e., the same class without any type arguments.
    #[must_use]
    pub fn erasure(&self) -> Self {
        let strip = |segment: &SimpleClassTypeSignature| {
            SimpleClassTypeSignature::new(segment.identifier.clone(), Vec::new())
        };
        Self::new(
            self.package_specifier.clone(),
            strip(&self.class_type),
            self.inner_types.iter().map(strip).collect(),
        )
    }

    /// Builds a class type with the same classes but with the type arguments of each segment
    /// replaced by `f`.
    pub(crate) fn map_type_arguments<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&TypeArgument) -> TypeArgument,
    {
        let mut map_segment = |segment: &SimpleClassTypeSignature| SimpleClassTypeSignature {
            identifier: segment.identifier.clone(),
            type_arguments: segment.type_arguments.iter().map(&mut f).collect(),
        };
        let class_type = map_segment(&self.class_type);
        let inner_types = self.inner_types.iter().map(map_segment).collect();
        Self {
            package_specifier: self.package_specifier.clone(),
            class_type,
            inner_types,
            binary: self.binary.clone(),
        }
    }
}

impl Display for ClassTypeSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L{}{}", self.package_specifier, self.class_type)?;
        for inner in &self.inner_types {
            write!(f, ".{inner}")?;
        }
        write!(f, ";")
    }
}

/// A single class in a [`ClassTypeSignature`] with its type arguments, e.g., `List<TE;>`.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct SimpleClassTypeSignature {
    /// The simple name of the class.
    pub identifier: String,
    /// The type arguments, empty if the class is not parameterized.
    pub type_arguments: Vec<TypeArgument>,
}

impl SimpleClassTypeSignature {
    /// Creates a class segment.
    pub fn new(identifier: impl Into<String>, type_arguments: Vec<TypeArgument>) -> Self {
        Self {
            identifier: identifier.into(),
            type_arguments,
        }
    }
}

impl Display for SimpleClassTypeSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identifier)?;
        if !self.type_arguments.is_empty() {
            write!(f, "<{}>", self.type_arguments.iter().join(""))?;
        }
        Ok(())
    }
}

/// The wildcard indicator of a [`TypeArgument`].
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum WildcardIndicator {
    /// No wildcard, e.g., `List<String>`.
    Exact,
    /// An upper bounded wildcard, e.g., `List<? extends Number>`.
    Extends,
    /// A lower bounded wildcard, e.g., `List<? super Integer>`.
    Super,
    /// An unbounded wildcard, e.g., `List<?>`.
    Wild,
}

impl WildcardIndicator {
    /// The character that prefixes the type argument, if any.
    #[must_use]
    pub const fn symbol(self) -> Option<char> {
        match self {
            Self::Exact => None,
            Self::Extends => Some('+'),
            Self::Super => Some('-'),
            Self::Wild => Some('*'),
        }
    }
}

/// A type argument of a parameterized class type.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum TypeArgument {
    /// A concrete type argument.
    Exact(ReferenceTypeSignature),
    /// `? extends` the bound.
    Extends(ReferenceTypeSignature),
    /// `? super` the bound.
    Super(ReferenceTypeSignature),
    /// `?`, which is distinct from `? extends Object`.
    Wild,
}

impl TypeArgument {
    /// Returns the wildcard indicator.
    #[must_use]
    pub const fn wildcard(&self) -> WildcardIndicator {
        match self {
            Self::Exact(_) => WildcardIndicator::Exact,
            Self::Extends(_) => WildcardIndicator::Extends,
            Self::Super(_) => WildcardIndicator::Super,
            Self::Wild => WildcardIndicator::Wild,
        }
    }

    /// Returns the bound, or [`None`] for [`TypeArgument::Wild`].
    #[must_use]
    pub fn bound(&self) -> Option<&ReferenceTypeSignature> {
        match self {
            Self::Exact(it) | Self::Extends(it) | Self::Super(it) => Some(it),
            Self::Wild => None,
        }
    }

    /// Returns the type the argument is known to be assignable to: the bound of an exact or
    /// `extends` argument, and `java.lang.Object` otherwise.
    #[must_use]
    pub fn upper_bound(&self) -> ReferenceTypeSignature {
        match self {
            Self::Exact(it) | Self::Extends(it) => it.clone(),
            Self::Super(_) | Self::Wild => ReferenceTypeSignature::object(),
        }
    }
}

impl Display for TypeArgument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(symbol) = self.wildcard().symbol() {
            write!(f, "{symbol}")?;
        }
        if let Some(bound) = self.bound() {
            write!(f, "{bound}")?;
        }
        Ok(())
    }
}
