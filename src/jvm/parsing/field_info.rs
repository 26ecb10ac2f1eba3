use std::io::{self, Read};

use crate::{
    jvm::{field::Field, references::ClassRef},
    macros::see_jvm_spec,
    types::signatures::{FieldSignature, JavaTypeSignature},
};

use super::{
    Context, Error,
    attribute::{AttributeInfo, GenericAttributes},
    jvm_element_parser::{ClassElement, parse_flags},
    reader_utils::{FromReader, ValueReaderExt, read_table},
};

#[doc = see_jvm_spec!(4, 5)]
#[derive(Debug)]
pub(crate) struct FieldInfo {
    access_flags: u16,
    name_index: u16,
    descriptor_index: u16,
    attributes: Vec<AttributeInfo>,
}

impl FromReader for FieldInfo {
    fn from_reader<R: Read>(reader: &mut R) -> io::Result<Self> {
        Ok(Self {
            access_flags: reader.read_value()?,
            name_index: reader.read_value()?,
            descriptor_index: reader.read_value()?,
            attributes: read_table(reader)?,
        })
    }
}

impl ClassElement for Field {
    type Raw = FieldInfo;

    fn from_raw(raw: Self::Raw, ctx: &Context) -> Result<Self, Error> {
        let FieldInfo {
            access_flags,
            name_index,
            descriptor_index,
            attributes,
        } = raw;
        let access_flags = parse_flags(access_flags)?;
        let name = ctx.constant_pool.get_str(name_index)?.to_owned();
        let field_type: JavaTypeSignature = ctx.constant_pool.get_str(descriptor_index)?.parse()?;
        let GenericAttributes { signature, .. } =
            GenericAttributes::<FieldSignature>::extract(attributes, ctx)?;
        Ok(Field {
            access_flags,
            name,
            owner: ClassRef::new(&ctx.current_class_binary_name),
            field_type,
            signature,
        })
    }
}
