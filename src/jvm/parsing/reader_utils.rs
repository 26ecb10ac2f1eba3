use std::io::{self, Read};

/// Extension for reading big-endian values from a class file.
pub(crate) trait ValueReaderExt: Read + Sized {
    fn read_value<T: Readable>(&mut self) -> io::Result<T> {
        T::read_from_reader(self)
    }
}

impl<R: Read> ValueReaderExt for R {}

pub(crate) trait Readable: Sized {
    fn read_from_reader<R: Read>(reader: &mut R) -> io::Result<Self>;
}

impl<const N: usize> Readable for [u8; N] {
    fn read_from_reader<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut buf = [0u8; N];
        reader.read_exact(&mut buf)?;
        Ok(buf)
    }
}

macro_rules! impl_readable_for {
    ($($t:ty),*) => {
        $(
            impl Readable for $t {
                fn read_from_reader<R: Read>(reader: &mut R) -> io::Result<Self> {
                    reader.read_value().map(Self::from_be_bytes)
                }
            }
        )*
    };
}

impl_readable_for!(u8, u16, u32);

/// A raw structure of the class file that can be read without consulting the constant pool.
pub(crate) trait FromReader: Sized {
    fn from_reader<R: Read>(reader: &mut R) -> io::Result<Self>;
}

impl FromReader for u16 {
    fn from_reader<R: Read>(reader: &mut R) -> io::Result<Self> {
        reader.read_value()
    }
}

/// Reads a table prefixed by its `u16` length.
pub(crate) fn read_table<T, R>(reader: &mut R) -> io::Result<Vec<T>>
where
    T: FromReader,
    R: Read,
{
    let count: u16 = reader.read_value()?;
    (0..count).map(|_| T::from_reader(reader)).collect()
}

/// Reads `len` bytes and advances the reader by `len` bytes.
pub(crate) fn read_byte_chunk<R: Read>(reader: &mut R, len: usize) -> io::Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    reader.read_exact(buf.as_mut_slice())?;
    Ok(buf)
}
