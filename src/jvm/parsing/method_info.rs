use std::io::{self, Read};

use crate::{
    jvm::{method::Method, references::ClassRef},
    macros::{malform, see_jvm_spec},
    types::signatures::{MethodSignature, ResultType},
};

use super::{
    Context, Error,
    attribute::{AttributeInfo, GenericAttributes},
    jvm_element_parser::{ClassElement, parse_flags},
    reader_utils::{FromReader, ValueReaderExt, read_table},
};

#[doc = see_jvm_spec!(4, 6)]
#[derive(Debug)]
pub(crate) struct MethodInfo {
    access_flags: u16,
    name_index: u16,
    descriptor_index: u16,
    attributes: Vec<AttributeInfo>,
}

impl FromReader for MethodInfo {
    fn from_reader<R: Read>(reader: &mut R) -> io::Result<Self> {
        Ok(Self {
            access_flags: reader.read_value()?,
            name_index: reader.read_value()?,
            descriptor_index: reader.read_value()?,
            attributes: read_table(reader)?,
        })
    }
}

impl ClassElement for Method {
    type Raw = MethodInfo;

    fn from_raw(raw: Self::Raw, ctx: &Context) -> Result<Self, Error> {
        let MethodInfo {
            access_flags,
            name_index,
            descriptor_index,
            attributes,
        } = raw;
        let access_flags = parse_flags(access_flags)?;
        let name = ctx.constant_pool.get_str(name_index)?.to_owned();
        let descriptor: MethodSignature = ctx.constant_pool.get_str(descriptor_index)?.parse()?;
        if !descriptor.type_parameters.is_empty() || !descriptor.throw_types.is_empty() {
            malform!("A method descriptor cannot have type parameters or a throws clause");
        }
        if name == Method::CONSTRUCTOR_NAME && descriptor.result_type != ResultType::Void {
            malform!("A constructor must return void");
        }
        let GenericAttributes {
            signature,
            exceptions,
        } = GenericAttributes::<MethodSignature>::extract(attributes, ctx)?;
        Ok(Method {
            access_flags,
            name,
            owner: ClassRef::new(&ctx.current_class_binary_name),
            descriptor,
            signature,
            exceptions,
        })
    }
}
