use super::ReferenceTypeSignature;

/// The generic signature of a field, e.g., `Ljava/util/List<+Ljava/lang/Number;>;`.
///
/// Fields of primitive types do not carry signatures, so the type is always a reference type.
#[derive(Debug, PartialEq, Eq, Hash, Clone, derive_more::Display, derive_more::From)]
#[display("{field_type}")]
pub struct FieldSignature {
    /// The type of the field.
    pub field_type: ReferenceTypeSignature,
}

impl FieldSignature {
    /// Creates a field signature.
    pub fn new(field_type: impl Into<ReferenceTypeSignature>) -> Self {
        Self {
            field_type: field_type.into(),
        }
    }
}
