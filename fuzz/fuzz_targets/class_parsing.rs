#![no_main]

use libfuzzer_sys::fuzz_target;
use cortado::jvm::Class;

fuzz_target!(|data: &[u8]| {
    if let Ok(class) = Class::from_reader(data) {
        let _ = class.erased_binary_references();
    }
});
