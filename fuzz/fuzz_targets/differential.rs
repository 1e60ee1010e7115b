//! Differential fuzzer: statement-by-statement execution against SQLite's
//! `execute_batch` on the whole script.

use honggfuzz::fuzz;
use sql_stmt_splitter::testing::run_differential_test;

fn main() {
    loop {
        fuzz!(|sql: String| {
            run_differential_test(&sql);
        });
    }
}
