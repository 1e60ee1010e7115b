//! Generated script fuzzer.
//!
//! Builds a script from structural fragments (words, groups, quoted literals,
//! comments) with a known set of statements and checks that the splitter
//! finds exactly those statements.

use honggfuzz::fuzz;
use sql_stmt_splitter::testing::{FuzzScript, test_script_roundtrip};

fn main() {
    loop {
        fuzz!(|script: FuzzScript| {
            test_script_roundtrip(&script);
        });
    }
}
