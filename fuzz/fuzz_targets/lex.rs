#![no_main]
use glyph_front::{Syntax, tokenize};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary text through both tokenizers; neither may panic
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = tokenize(s, Syntax::Compact);
        let _ = tokenize(s, Syntax::Expanded);
    }
});
