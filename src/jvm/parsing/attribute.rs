use std::{
    io::{self, Read},
    str::FromStr,
};

use crate::{
    jvm::references::ClassRef,
    macros::{fill_once, malform, see_jvm_spec},
    types::signatures::InvalidSignature,
};

use super::{
    Context, Error,
    reader_utils::{FromReader, ValueReaderExt, read_byte_chunk, read_table},
};

/// Represent an attribute of a class file, method, or field.
#[doc = see_jvm_spec!(4, 7)]
#[derive(Debug)]
pub(crate) struct AttributeInfo {
    name_idx: u16,
    info: Vec<u8>,
}

impl FromReader for AttributeInfo {
    fn from_reader<R: Read>(reader: &mut R) -> io::Result<Self> {
        let name_idx = reader.read_value()?;
        let attribute_length: u32 = reader.read_value()?;
        let attribute_length = usize::try_from(attribute_length)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let info = read_byte_chunk(reader, attribute_length)?;
        Ok(Self { name_idx, info })
    }
}

/// The attributes that carry generic type information. All the other attributes are dropped.
#[derive(Debug)]
pub(crate) struct GenericAttributes<S> {
    /// The `Signature` attribute.
    pub signature: Option<S>,
    /// The `Exceptions` attribute.
    pub exceptions: Vec<ClassRef>,
}

impl<S> GenericAttributes<S>
where
    S: FromStr<Err = InvalidSignature>,
{
    pub(crate) fn extract(attributes: Vec<AttributeInfo>, ctx: &Context) -> Result<Self, Error> {
        let mut signature = None;
        let mut exceptions = None;
        for AttributeInfo { name_idx, info } in attributes {
            match ctx.constant_pool.get_str(name_idx)? {
                "Signature" => {
                    let parsed = Self::parse_signature(&info, ctx)?;
                    fill_once!(signature, parsed, "Signature attribute");
                }
                "Exceptions" => {
                    let parsed = Self::parse_exceptions(&info, ctx)?;
                    fill_once!(exceptions, parsed, "Exceptions attribute");
                }
                _ => {}
            }
        }
        Ok(Self {
            signature,
            exceptions: exceptions.unwrap_or_default(),
        })
    }

    #[doc = see_jvm_spec!(4, 7, 9)]
    fn parse_signature(info: &[u8], ctx: &Context) -> Result<S, Error> {
        let mut reader = info;
        let signature_index = reader.read_value()?;
        if !reader.is_empty() {
            malform!("The Signature attribute must be two bytes long");
        }
        let signature = ctx.constant_pool.get_str(signature_index)?;
        signature.parse().map_err(Error::from)
    }

    #[doc = see_jvm_spec!(4, 7, 5)]
    fn parse_exceptions(info: &[u8], ctx: &Context) -> Result<Vec<ClassRef>, Error> {
        let mut reader = info;
        let indices: Vec<u16> = read_table(&mut reader)?;
        if !reader.is_empty() {
            malform!("Unexpected data at the end of the Exceptions attribute");
        }
        indices
            .into_iter()
            .map(|it| ctx.constant_pool.get_class_name(it).map(ClassRef::new))
            .collect()
    }
}
