use std::{fmt::Display, hash::Hash};

use crate::types::signatures::{FieldSignature, ReferenceTypeSignature};

use super::{ClassResolver, ResolutionError, SignatureLookup};

/// Resolves the type of a field as seen from a class.
#[derive(Debug)]
pub struct FieldResolver<'r, L> {
    resolver: &'r ClassResolver<L>,
    declaring_class: String,
    field: FieldSignature,
}

impl<'r, L: SignatureLookup> FieldResolver<'r, L> {
    pub(super) fn new(resolver: &'r ClassResolver<L>, declaring_class: String, field: FieldSignature) -> Self {
        Self {
            resolver,
            declaring_class,
            field,
        }
    }

    /// The class that declares the field.
    #[must_use]
    pub fn declaring_class(&self) -> &str {
        &self.declaring_class
    }

    /// The signature of the field as declared.
    #[must_use]
    pub fn field(&self) -> &FieldSignature {
        &self.field
    }

    /// Returns the type of the field in terms of the type variables of the class being resolved.
    ///
    /// # Errors
    /// See [`ClassResolver::resolve_inherited_reference`].
    pub fn substitute_field(&self) -> Result<ReferenceTypeSignature, ResolutionError> {
        self.resolver
            .resolve_inherited_reference(&self.declaring_class, &self.field.field_type)
    }

    /// Returns the type of the field with a top-level type variable replaced by its bound.
    ///
    /// # Errors
    /// See [`ClassResolver::resolve_inherited_reference`] and [`ClassResolver::resolve_type`].
    pub fn resolve_field(&self) -> Result<ReferenceTypeSignature, ResolutionError> {
        let substituted = self.substitute_field()?;
        self.resolver.resolve_type(&substituted)
    }
}

impl<L> PartialEq for FieldResolver<'_, L> {
    fn eq(&self, other: &Self) -> bool {
        self.resolver.signature == other.resolver.signature
            && self.declaring_class == other.declaring_class
            && self.field == other.field
    }
}

impl<L> Eq for FieldResolver<'_, L> {}

impl<L> Hash for FieldResolver<'_, L> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.resolver.signature.hash(state);
        self.declaring_class.hash(state);
        self.field.hash(state);
    }
}

impl<L> Display for FieldResolver<'_, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}: {}",
            self.resolver.signature, self.declaring_class, self.field
        )
    }
}
