//! Fuzz target: `commands::parse`
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - An accepted command's canonical token parses back to itself
//! - The legacy vocabulary accepts everything the standard one does
//!
//! cargo fuzz run fuzz_command_parse

#![no_main]

use gradelight::app::commands::{self, Vocabulary};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let standard = commands::parse(data, Vocabulary::Standard);
    let legacy = commands::parse(data, Vocabulary::WithLegacy);

    if !standard.is_none() {
        assert_eq!(standard, legacy, "legacy vocabulary must extend standard");
        assert_eq!(commands::parse(standard.token().as_bytes(), Vocabulary::Standard), standard);
        assert_eq!(data, standard.token().as_bytes());
    }
});
