//! Fuzz target for flat record line parsing.
//!
//! Record lines are matched by searching for a count that fits the number
//! of trailing values, so this mostly guards against panics in that search.

#![no_main]

use libfuzzer_sys::fuzz_target;
use yolo2flat::ir::io_flat_txt::fuzz_parse_record_line;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };

    let _ = fuzz_parse_record_line(line);
});
