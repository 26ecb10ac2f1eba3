#![no_main]

use std::{fmt::Display, str::FromStr};

use cortado::types::signatures::{
    ClassSignature, FieldSignature, InvalidSignature, JavaTypeSignature, MethodSignature,
};
use libfuzzer_sys::fuzz_target;

fn check<T>(input: &str)
where
    T: FromStr<Err = InvalidSignature> + Display + PartialEq + std::fmt::Debug,
{
    match input.parse::<T>() {
        Ok(parsed) => assert_eq!(parsed.to_string(), input),
        Err(e) => assert!(e.position <= input.len()),
    }
}

fuzz_target!(|input: &str| {
    check::<ClassSignature>(input);
    check::<MethodSignature>(input);
    check::<FieldSignature>(input);
    check::<JavaTypeSignature>(input);
});
