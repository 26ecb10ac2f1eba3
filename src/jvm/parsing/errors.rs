use crate::types::signatures::InvalidSignature;

use super::constant_pool::BadConstantPoolIndex;

/// An error that occurs when parsing a Java class file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An error that occurs when reading from a buffer.
    #[error("Failed to read from buffer: {0}")]
    ReadFail(#[from] std::io::Error),
    /// The buffer does not contain a Java class file.
    #[error("The buffer does not contains a Java class file")]
    NotAClassFile,
    /// The format of the class file is invalid.
    #[error("MalformedClassFile: {0}")]
    MalformedClassFile(&'static str),
    /// The constant pool index does not point to an entry.
    #[error("Error when accessing constant pool: {0}")]
    BadConstantPoolIndex(#[from] BadConstantPoolIndex),
    /// The constant pool index does not point to a desired entry.
    #[error("Mismatched constant pool entry, expected {expected}, but found {found}")]
    MismatchedConstantPoolEntryType {
        /// The type of the constant pool entry that was expected.
        expected: &'static str,
        /// The type of the constant pool entry that was found.
        found: &'static str,
    },
    /// The constant pool tag is invalid.
    #[error("Unexpected constant pool tag {0}")]
    UnexpectedConstantPoolTag(u8),
    /// Tries to read a string for constructing JVM components (e.g., class name) but got an
    /// invalid modified UTF-8 string.
    #[error("Invalid UTF-8 string")]
    BrokenUTF8,
    /// The flags cannot be recognized.
    #[error("Unknown access flag in {0}: {1:#x}")]
    UnknownFlags(&'static str, u16),
    /// A `Signature` attribute or a descriptor does not conform to the signature grammar.
    #[error(transparent)]
    InvalidSignature(#[from] InvalidSignature),
}
