/// Produces a link to the given section of the JVM specification, for use in `#[doc = ...]`.
macro_rules! see_jvm_spec {
    ($sec:literal $(, $sub:literal )*) => {
        concat!(
            "See the [JVM Specification §",
            $sec $(, ".", $sub)*,
            "](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-",
            $sec,
            ".html#jvms-",
            $sec $(, ".", $sub)*,
            ") for more information."
        )
    };
}

/// Returns early with [`Error::MalformedClassFile`](crate::jvm::parsing::Error::MalformedClassFile).
macro_rules! malform {
    ($msg:expr) => {
        return Err($crate::jvm::parsing::Error::MalformedClassFile($msg))
    };
}

/// Stores `$with` into the [`Option`] `$container`, failing if it is already filled.
macro_rules! fill_once {
    ($container:ident, $with:ident, $what:literal) => {
        if $container.replace($with).is_some() {
            $crate::macros::malform!(concat!("There should be at most one ", $what));
        }
    };
}

pub(crate) use fill_once;
pub(crate) use malform;
pub(crate) use see_jvm_spec;
