//! Splitter round-trip fuzzer.
//!
//! Feeds arbitrary strings through the splitter. Errors are expected; on
//! success the statements joined by the delimiter must reproduce the input.

use honggfuzz::fuzz;
use sql_stmt_splitter::testing::test_split_roundtrip;

fn main() {
    loop {
        fuzz!(|sql: &str| {
            test_split_roundtrip(sql);
        });
    }
}
