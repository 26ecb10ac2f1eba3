use bitflags::Flags;

use super::{Context, Error};

/// An element of a class file that is built from its raw form with the help of the constant
/// pool.
pub(crate) trait ClassElement: Sized {
    type Raw;

    fn from_raw(raw: Self::Raw, ctx: &Context) -> Result<Self, Error>;
}

#[inline]
pub(crate) fn parse_flags<F>(flag_bits: u16) -> Result<F, Error>
where
    F: Flags<Bits = u16>,
{
    F::from_bits(flag_bits).ok_or(Error::UnknownFlags(std::any::type_name::<F>(), flag_bits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jvm::{class, method};

    #[test]
    fn known_flags() {
        let flags: class::AccessFlags = parse_flags(0x0421).unwrap();
        assert_eq!(
            flags,
            class::AccessFlags::PUBLIC | class::AccessFlags::SUPER | class::AccessFlags::ABSTRACT
        );
    }

    #[test]
    fn unknown_flags() {
        let result: Result<method::AccessFlags, _> = parse_flags(0x0200);
        assert!(matches!(result, Err(Error::UnknownFlags(_, 0x0200))));
    }
}
