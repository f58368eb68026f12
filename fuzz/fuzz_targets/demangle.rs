#![no_main]

use libfuzzer_sys::fuzz_target;
use itanium_demangle::{demangle, demangle_with, parse, DemangleOptions};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Force the mangled path so the decoder sees every input.
    let symbol = format!("_Z{}", text);

    let rendered = demangle(&symbol);
    let _ = demangle_with(&symbol, &DemangleOptions::name_only());

    // The tree and the string API must agree.
    if let Ok(tree) = parse(&symbol) {
        assert_eq!(tree.to_string(), rendered);
    }

    // Unmangled input is returned verbatim.
    if !text.starts_with("_Z") {
        assert_eq!(demangle(text), text);
    }
});
