//! The constant pool of a class file, decoded as far as needed to recover names and signatures.

use std::io::Read;

use crate::macros::see_jvm_spec;

use super::{
    Error,
    reader_utils::{ValueReaderExt, read_byte_chunk},
};

/// A string in the constant pool, encoded in modified UTF-8.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum JavaString {
    /// A string that can be represented in UTF-8.
    ValidUtf8(String),
    /// The raw bytes of a string that is not valid modified UTF-8.
    InvalidUtf8(Vec<u8>),
}

impl From<Vec<u8>> for JavaString {
    fn from(bytes: Vec<u8>) -> Self {
        match cesu8::from_java_cesu8(&bytes) {
            Ok(it) => Self::ValidUtf8(it.into_owned()),
            Err(_) => Self::InvalidUtf8(bytes),
        }
    }
}

#[derive(Debug, Clone)]
enum Slot {
    Entry(Entry),
    Padding,
}

/// A JVM constant pool.
#[doc = see_jvm_spec!(4, 4)]
#[derive(Debug, Clone)]
pub struct ConstantPool {
    inner: Vec<Slot>,
}

impl ConstantPool {
    /// Parses a constant pool with `constant_pool_count - 1` slots from the reader.
    ///
    /// # Errors
    /// - [`Error::UnexpectedConstantPoolTag`] if an entry has an unknown tag.
    /// - [`Error::ReadFail`] if the reader ends early.
    pub fn from_reader<R: Read>(reader: &mut R, constant_pool_count: u16) -> Result<Self, Error> {
        // The `constant_pool` table is indexed from `1` to `constant_pool_count - 1`.
        let count: usize = constant_pool_count.into();
        let mut inner = Vec::with_capacity(count);
        inner.push(Slot::Padding);
        while inner.len() < count {
            let entry = Entry::from_reader(reader)?;
            let wide = entry.is_wide();
            inner.push(Slot::Entry(entry));
            if wide {
                inner.push(Slot::Padding);
            }
        }
        Ok(Self { inner })
    }

    /// Gets the constant pool entry at the given index.
    ///
    /// # Errors
    /// - [`BadConstantPoolIndex`] if `index` does not point to a valid entry.
    pub fn get_entry(&self, index: u16) -> Result<&Entry, BadConstantPoolIndex> {
        match self.inner.get(usize::from(index)) {
            Some(Slot::Entry(entry)) => Ok(entry),
            _ => Err(BadConstantPoolIndex(index)),
        }
    }

    /// Gets the string of the `CONSTANT_Utf8` entry at the given index.
    ///
    /// # Errors
    /// - [`Error::BadConstantPoolIndex`] if `index` does not point to a valid entry.
    /// - [`Error::MismatchedConstantPoolEntryType`] if the entry is not a `CONSTANT_Utf8`.
    /// - [`Error::BrokenUTF8`] if the string is not valid modified UTF-8.
    pub fn get_str(&self, index: u16) -> Result<&str, Error> {
        match self.get_entry(index)? {
            Entry::Utf8(JavaString::ValidUtf8(it)) => Ok(it),
            Entry::Utf8(JavaString::InvalidUtf8(_)) => Err(Error::BrokenUTF8),
            entry => Err(Error::MismatchedConstantPoolEntryType {
                expected: "CONSTANT_Utf8",
                found: entry.constant_kind(),
            }),
        }
    }

    /// Gets the binary name of the `CONSTANT_Class` entry at the given index.
    ///
    /// # Errors
    /// See [`ConstantPool::get_str`].
    pub fn get_class_name(&self, index: u16) -> Result<&str, Error> {
        match self.get_entry(index)? {
            &Entry::Class { name_index } => self.get_str(name_index),
            entry => Err(Error::MismatchedConstantPoolEntryType {
                expected: "CONSTANT_Class",
                found: entry.constant_kind(),
            }),
        }
    }
}

/// An error when getting an entry from the constant pool with an invalid index.
#[derive(Debug, thiserror::Error)]
#[error("Bad constant pool index: {0}")]
pub struct BadConstantPoolIndex(pub u16);

/// An entry in the [`ConstantPool`].
///
/// Only the entries that name classes and members are kept. The payload of the other entries is
/// skipped while reading.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum Entry {
    /// A UTF-8 string.
    #[doc = see_jvm_spec!(4, 4, 7)]
    Utf8(JavaString),
    /// A class.
    #[doc = see_jvm_spec!(4, 4, 1)]
    Class {
        /// The index in the constant pool of its binary name.
        name_index: u16,
    },
    /// Any other entry, identified by its tag.
    Opaque(u8),
}

const CONSTANT_UTF8: u8 = 1;
const CONSTANT_CLASS: u8 = 7;
const CONSTANT_LONG: u8 = 5;
const CONSTANT_DOUBLE: u8 = 6;

impl Entry {
    fn from_reader<R: Read>(reader: &mut R) -> Result<Self, Error> {
        let tag: u8 = reader.read_value()?;
        let payload_len = match tag {
            CONSTANT_UTF8 => {
                let length: u16 = reader.read_value()?;
                let bytes = read_byte_chunk(reader, length.into())?;
                return Ok(Self::Utf8(bytes.into()));
            }
            CONSTANT_CLASS => {
                let name_index = reader.read_value()?;
                return Ok(Self::Class { name_index });
            }
            // String, MethodType, Module, Package
            8 | 16 | 19 | 20 => 2,
            // MethodHandle
            15 => 3,
            // Integer, Float, Fieldref, Methodref, InterfaceMethodref, NameAndType, Dynamic,
            // InvokeDynamic
            3 | 4 | 9..=12 | 17 | 18 => 4,
            CONSTANT_LONG | CONSTANT_DOUBLE => 8,
            unexpected => return Err(Error::UnexpectedConstantPoolTag(unexpected)),
        };
        read_byte_chunk(reader, payload_len)?;
        Ok(Self::Opaque(tag))
    }

    /// `CONSTANT_Long` and `CONSTANT_Double` take up two slots.
    const fn is_wide(&self) -> bool {
        matches!(self, Self::Opaque(CONSTANT_LONG | CONSTANT_DOUBLE))
    }

    /// Gets the kind of this constant pool entry.
    #[must_use]
    pub const fn constant_kind(&self) -> &'static str {
        match self {
            Self::Utf8(_) => "CONSTANT_Utf8",
            Self::Class { .. } => "CONSTANT_Class",
            Self::Opaque(tag) => match *tag {
                3 => "CONSTANT_Integer",
                4 => "CONSTANT_Float",
                CONSTANT_LONG => "CONSTANT_Long",
                CONSTANT_DOUBLE => "CONSTANT_Double",
                8 => "CONSTANT_String",
                9 => "CONSTANT_Fieldref",
                10 => "CONSTANT_Methodref",
                11 => "CONSTANT_InterfaceMethodref",
                12 => "CONSTANT_NameAndType",
                15 => "CONSTANT_MethodHandle",
                16 => "CONSTANT_MethodType",
                17 => "CONSTANT_Dynamic",
                18 => "CONSTANT_InvokeDynamic",
                19 => "CONSTANT_Module",
                _ => "CONSTANT_Package",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_opaque_entry() -> impl Strategy<Value = Vec<u8>> {
        prop_oneof![
            (prop_oneof![Just(8u8), Just(16), Just(19), Just(20)], any::<[u8; 2]>())
                .prop_map(|(tag, payload)| [&[tag][..], &payload[..]].concat()),
            any::<[u8; 3]>().prop_map(|payload| [&[15u8][..], &payload[..]].concat()),
            (
                prop_oneof![Just(3u8), Just(4), Just(9), Just(10), Just(11), Just(12), Just(17), Just(18)],
                any::<[u8; 4]>()
            )
                .prop_map(|(tag, payload)| [&[tag][..], &payload[..]].concat()),
            (prop_oneof![Just(5u8), Just(6)], any::<[u8; 8]>())
                .prop_map(|(tag, payload)| [&[tag][..], &payload[..]].concat()),
        ]
    }

    fn arb_entry() -> impl Strategy<Value = Vec<u8>> {
        prop_oneof![
            "[a-zA-Z/$]{0,20}".prop_map(|it| {
                let len = u16::try_from(it.len()).unwrap().to_be_bytes();
                [&[CONSTANT_UTF8][..], &len[..], it.as_bytes()].concat()
            }),
            any::<u16>().prop_map(|it| [&[CONSTANT_CLASS][..], &it.to_be_bytes()[..]].concat()),
            arb_opaque_entry(),
        ]
    }

    proptest! {
        #[test]
        fn reads_exactly_the_entries(entries in prop::collection::vec(arb_entry(), 1..=50)) {
            let slots = entries
                .iter()
                .map(|it| if matches!(it[0], 5 | 6) { 2 } else { 1 })
                .sum::<usize>();
            let count = u16::try_from(slots + 1).unwrap();
            let bytes = entries.concat();
            let mut reader = bytes.as_slice();
            let constant_pool = ConstantPool::from_reader(&mut reader, count).unwrap();
            assert!(reader.is_empty());
            assert_eq!(constant_pool.inner.len(), slots + 1);
        }
    }

    fn pool(bytes: &[u8], count: u16) -> ConstantPool {
        let mut reader = bytes;
        ConstantPool::from_reader(&mut reader, count).unwrap()
    }

    #[test]
    fn class_names() {
        #[rustfmt::skip]
        let bytes = [
            CONSTANT_CLASS, 0x00, 0x02,
            CONSTANT_UTF8, 0x00, 0x05, b'a', b'/', b'B', b'$', b'C',
            CONSTANT_CLASS, 0x00, 0x01,
        ];
        let constant_pool = pool(&bytes, 4);
        assert_eq!(constant_pool.get_class_name(1).unwrap(), "a/B$C");
        assert_eq!(constant_pool.get_str(2).unwrap(), "a/B$C");
        assert!(matches!(
            constant_pool.get_class_name(3),
            Err(Error::MismatchedConstantPoolEntryType {
                expected: "CONSTANT_Utf8",
                found: "CONSTANT_Class"
            })
        ));
        assert!(matches!(
            constant_pool.get_str(0),
            Err(Error::BadConstantPoolIndex(BadConstantPoolIndex(0)))
        ));
        assert!(matches!(
            constant_pool.get_str(4),
            Err(Error::BadConstantPoolIndex(BadConstantPoolIndex(4)))
        ));
    }

    #[test]
    fn wide_entries_take_two_slots() {
        #[rustfmt::skip]
        let bytes = [
            CONSTANT_LONG, 0, 0, 0, 0, 0, 0, 0, 42,
            CONSTANT_UTF8, 0x00, 0x01, b'x',
        ];
        let constant_pool = pool(&bytes, 4);
        assert_eq!(constant_pool.get_entry(1).unwrap().constant_kind(), "CONSTANT_Long");
        assert!(constant_pool.get_entry(2).is_err());
        assert_eq!(constant_pool.get_str(3).unwrap(), "x");
    }

    #[test]
    fn opaque_entries_report_their_kind() {
        #[rustfmt::skip]
        let bytes = [
            CONSTANT_DOUBLE, 0, 0, 0, 0, 0, 0, 0, 0,
            8, 0x00, 0x01,
            20, 0x00, 0x01,
        ];
        let constant_pool = pool(&bytes, 5);
        assert!(matches!(
            constant_pool.get_str(1),
            Err(Error::MismatchedConstantPoolEntryType {
                expected: "CONSTANT_Utf8",
                found: "CONSTANT_Double"
            })
        ));
        assert!(matches!(
            constant_pool.get_class_name(3),
            Err(Error::MismatchedConstantPoolEntryType {
                expected: "CONSTANT_Class",
                found: "CONSTANT_String"
            })
        ));
        assert_eq!(constant_pool.get_entry(4).unwrap().constant_kind(), "CONSTANT_Package");
    }

    #[test]
    fn broken_modified_utf8() {
        let bytes = [CONSTANT_UTF8, 0x00, 0x02, 0xC0, 0x20];
        let constant_pool = pool(&bytes, 2);
        assert!(matches!(constant_pool.get_str(1), Err(Error::BrokenUTF8)));
    }

    #[test]
    fn unknown_tag() {
        let mut reader = [2u8, 0x00].as_slice();
        assert!(matches!(
            ConstantPool::from_reader(&mut reader, 2),
            Err(Error::UnexpectedConstantPoolTag(2))
        ));
    }
}
