use std::io::Read;

use crate::{
    jvm::{
        class::{self, Class},
        references::ClassRef,
    },
    macros::{malform, see_jvm_spec},
    types::signatures::{ClassSignature, OBJECT_BINARY_NAME},
};

use super::{
    Context, Error,
    attribute::{AttributeInfo, GenericAttributes},
    constant_pool::ConstantPool,
    field_info::FieldInfo,
    jvm_element_parser::{ClassElement, parse_flags},
    method_info::MethodInfo,
    reader_utils::{ValueReaderExt, read_table},
};

/// The raw representation of a class file.
#[doc = see_jvm_spec!(4, 1)]
#[derive(Debug)]
pub(crate) struct ClassFile {
    constant_pool: ConstantPool,
    access_flags: u16,
    this_class: u16,
    super_class: u16,
    interfaces: Vec<u16>,
    fields: Vec<FieldInfo>,
    methods: Vec<MethodInfo>,
    attributes: Vec<AttributeInfo>,
}

const JAVA_CLASS_MAGIC: u32 = 0xCAFE_BABE;

impl Class {
    /// Parses a class file from the given reader.
    ///
    /// Only the names, the access flags, the super types, and the generic information of the
    /// class and its members are decoded. The other attributes (e.g., the code of the methods)
    /// are skipped.
    ///
    /// # Errors
    /// - [`Error::NotAClassFile`] if the reader does not start with the class file magic.
    /// - [`Error::InvalidSignature`] if a `Signature` attribute or a descriptor is malformed.
    ///
    /// See [`Error`] for the other errors.
    pub fn from_reader<R: Read>(reader: R) -> Result<Class, Error> {
        let mut reader = reader;
        let class_file = ClassFile::from_reader(&mut reader)?;
        Class::from_raw(class_file)
    }

    pub(crate) fn from_raw(raw: ClassFile) -> Result<Self, Error> {
        let ClassFile {
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
        } = raw;
        let access_flags: class::AccessFlags = parse_flags(access_flags)?;
        let binary_name = constant_pool.get_class_name(this_class)?.to_owned();
        let super_class = match super_class {
            0 if binary_name == OBJECT_BINARY_NAME => None,
            0 if access_flags.contains(class::AccessFlags::MODULE) => None,
            0 => malform!("Class must have a super type except for java/lang/Object or a module"),
            it => Some(ClassRef::new(constant_pool.get_class_name(it)?)),
        };

        let parsing_context = Context {
            constant_pool,
            current_class_binary_name: binary_name.clone(),
        };
        let ctx = &parsing_context;

        let interfaces = interfaces
            .into_iter()
            .map(|it| ctx.constant_pool.get_class_name(it).map(ClassRef::new))
            .collect::<Result<_, _>>()?;
        let fields = fields
            .into_iter()
            .map(|it| ClassElement::from_raw(it, ctx))
            .collect::<Result<_, _>>()?;
        let methods = methods
            .into_iter()
            .map(|it| ClassElement::from_raw(it, ctx))
            .collect::<Result<_, _>>()?;
        let GenericAttributes { signature, .. } =
            GenericAttributes::<ClassSignature>::extract(attributes, ctx)?;

        Ok(Class {
            access_flags,
            binary_name,
            super_class,
            interfaces,
            signature,
            fields,
            methods,
        })
    }
}

impl ClassFile {
    fn from_reader<R: Read>(reader: &mut R) -> Result<Self, Error> {
        let magic: u32 = reader.read_value()?;
        if magic != JAVA_CLASS_MAGIC {
            return Err(Error::NotAClassFile);
        }
        let _minor_version: u16 = reader.read_value()?;
        let _major_version: u16 = reader.read_value()?;
        let constant_pool_count = reader.read_value()?;
        let constant_pool = ConstantPool::from_reader(reader, constant_pool_count)?;
        let access_flags = reader.read_value()?;
        let this_class = reader.read_value()?;
        let super_class = reader.read_value()?;
        let interfaces = read_table(reader)?;
        let fields = read_table(reader)?;
        let methods = read_table(reader)?;
        let attributes = read_table(reader)?;
        Ok(Self {
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
        })
    }
}
