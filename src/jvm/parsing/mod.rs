//! The parsing logic for the JVM class file format.
mod attribute;
mod class_file;
pub mod constant_pool;
mod errors;
mod field_info;
mod jvm_element_parser;
mod method_info;
mod reader_utils;

use constant_pool::ConstantPool;
pub use errors::Error;

/// Context used to parse the elements of a class file.
#[derive(Debug)]
pub(crate) struct Context {
    /// The constant pool of the class file.
    pub constant_pool: ConstantPool,
    /// The binary name of the class being parsed.
    pub current_class_binary_name: String,
}
