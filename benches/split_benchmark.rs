//! Benchmark measuring splitter throughput on generated migration files.
//!
//! Two script shapes:
//! - **plain**: short `INSERT` statements, mostly ordinary characters
//! - **dense**: statements heavy on quoted literals, comments and nested
//!   parentheses, which exercise the sub-scanners
//!
//! Each shape is measured with the default `;` delimiter and with a
//! `$$` delimiter declared by a directive.

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use sql_stmt_splitter::{Splitter, split_statements};
use std::hint::black_box;

fn plain_statement(i: usize, rng: &mut StdRng) -> String {
    let value: u32 = rng.random_range(0..1_000_000);
    format!("INSERT INTO events (id, payload) VALUES ({i}, {value})")
}

fn dense_statement(i: usize, rng: &mut StdRng) -> String {
    let depth = rng.random_range(1..4);
    let open = "(".repeat(depth);
    let close = ")".repeat(depth);
    format!(
        "-- row {i}; generated\nINSERT INTO `events` (\"id\", payload) /* keep; order */ \
         VALUES {open}{i}, 'it\\'s; {i}', \"x;y\"{close}"
    )
}

fn make_script(
    count: usize,
    delimiter: &str,
    seed: u64,
    statement: fn(usize, &mut StdRng) -> String,
) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut script = String::new();
    if delimiter != ";" {
        script.push_str("//atlas:delimiter ");
        script.push_str(delimiter);
        script.push('\n');
    }
    for i in 0..count {
        script.push_str(&statement(i, &mut rng));
        script.push_str(delimiter);
        script.push('\n');
    }
    script
}

fn bench_split(c: &mut Criterion) {
    for (shape, statement) in [
        ("plain", plain_statement as fn(usize, &mut StdRng) -> String),
        ("dense", dense_statement),
    ] {
        for delimiter in [";", "$$"] {
            let mut group = c.benchmark_group(format!("split/{shape}/{delimiter}"));
            for count in [10usize, 100, 1000] {
                let script = make_script(count, delimiter, 42 + count as u64, statement);
                group.throughput(Throughput::Bytes(script.len() as u64));

                group.bench_function(format!("collect/{count}"), |b| {
                    b.iter(|| split_statements(black_box(&script)).unwrap());
                });

                group.bench_function(format!("count/{count}"), |b| {
                    b.iter(|| {
                        Splitter::new(black_box(&script))
                            .unwrap()
                            .filter(Result::is_ok)
                            .count()
                    });
                });
            }
            group.finish();
        }
    }
}

criterion_group!(benches, bench_split);
criterion_main!(benches);
