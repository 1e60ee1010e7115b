//! Testing utilities shared by the fuzz harnesses and the integration tests.
//!
//! This module is gated behind the `testing` feature.
//!
//! # Provided helpers
//!
//! - [`FuzzScript`]: an `arbitrary`-generated script whose statement
//!   boundaries are known in advance
//! - [`test_split_roundtrip`]: splitting any input either fails or can be
//!   undone by re-joining the statements with the delimiter
//! - [`test_script_roundtrip`]: a rendered [`FuzzScript`] splits back into
//!   exactly its statements
//! - [`run_differential_test`]: executing the split statements one by one on
//!   SQLite ends in the same state as `execute_batch` on the whole script

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use arbitrary::{Arbitrary, Unstructured};
use rusqlite::Connection;

use crate::directive::{DEFAULT_DELIMITER, DELIMITER_DIRECTIVE, Directive};
use crate::execute::execute_script;
use crate::splitter::{Splitter, split_statements};

/// Delimiters a [`FuzzScript`] may be rendered with.
pub const FUZZ_DELIMITERS: [&str; 5] = [";", "$$", "//", "GO", "¶"];

const WORD_CHARS: &[char] = &[
    'a', 'b', 'c', 'e', 'l', 's', 't', 'x', 'z', '0', '1', '9', '_', ',', '.', '=', '*', '+', 'é',
];
const QUOTED_CHARS: &[char] = &[
    'a', ' ', ';', '(', ')', '-', '/', '*', '$', '¶', '\n', '\'', '"', '`', 'G', 'O', '€',
];
const COMMENT_CHARS: &[char] = &[
    'a', ' ', ';', '(', ')', '-', '/', '$', '¶', '\'', '"', '`', 'G', 'O', '€',
];

/// One structural piece of a generated statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Ordinary text without any structural character.
    Word(String),
    /// A parenthesised group of fragments.
    Group(Vec<Fragment>),
    /// A quoted literal. The body never contains the raw quote or a raw
    /// backslash: escapes are part of the rendered body.
    Quoted {
        /// Quote character.
        quote: char,
        /// Rendered body, escapes included.
        body: String,
    },
    /// A `--` comment, rendered with its trailing newline.
    LineComment(String),
    /// A `/* */` comment.
    BlockComment(String),
}

impl Fragment {
    fn render_into(&self, out: &mut String) {
        match self {
            Self::Word(word) => out.push_str(word),
            Self::Group(inner) => {
                out.push('(');
                render_fragments(inner, out);
                out.push(')');
            }
            Self::Quoted { quote, body } => {
                out.push(*quote);
                out.push_str(body);
                out.push(*quote);
            }
            Self::LineComment(text) => {
                out.push_str("--");
                out.push_str(text);
                out.push('\n');
            }
            Self::BlockComment(text) => {
                out.push_str("/*");
                out.push_str(text);
                out.push_str("*/");
            }
        }
    }

    fn arbitrary_at_depth(u: &mut Unstructured<'_>, depth: u8) -> arbitrary::Result<Self> {
        let max_kind = if depth >= 3 { 3 } else { 4 };
        Ok(match u.int_in_range(0..=max_kind)? {
            0 => Self::Word(arbitrary_text(u, WORD_CHARS, 1)?),
            1 => {
                let quote = *u.choose(&['\'', '"', '`'])?;
                let mut body = String::new();
                for _ in 0..u.int_in_range(0..=8)? {
                    if u.ratio(1, 6)? {
                        body.push('\\');
                        body.push(*u.choose(&[quote, '\\', 'n'])?);
                    } else {
                        let c = *u.choose(QUOTED_CHARS)?;
                        if c != quote {
                            body.push(c);
                        }
                    }
                }
                Self::Quoted { quote, body }
            }
            2 => Self::LineComment(arbitrary_text(u, COMMENT_CHARS, 0)?),
            // '*' never occurs in COMMENT_CHARS, so the body cannot close
            // the comment early.
            3 => Self::BlockComment(arbitrary_text(u, COMMENT_CHARS, 0)?),
            _ => {
                let mut inner = Vec::new();
                for _ in 0..u.int_in_range(0..=3)? {
                    inner.push(Self::arbitrary_at_depth(u, depth + 1)?);
                }
                Self::Group(inner)
            }
        })
    }
}

impl<'a> Arbitrary<'a> for Fragment {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        Self::arbitrary_at_depth(u, 0)
    }
}

fn arbitrary_text(
    u: &mut Unstructured<'_>,
    chars: &[char],
    min_len: usize,
) -> arbitrary::Result<String> {
    let len = u.int_in_range(min_len..=min_len + 8)?;
    let mut text = String::with_capacity(len);
    for _ in 0..len {
        text.push(*u.choose(chars)?);
    }
    Ok(text)
}

/// Fragments are separated by a space, except after a line comment whose
/// newline already separates it from what follows.
fn render_fragments(fragments: &[Fragment], out: &mut String) {
    for (i, fragment) in fragments.iter().enumerate() {
        if i > 0 && !matches!(fragments[i - 1], Fragment::LineComment(_)) {
            out.push(' ');
        }
        fragment.render_into(out);
    }
}

/// A generated script with known statement boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzScript {
    /// Delimiter the script is rendered with.
    pub delimiter: &'static str,
    /// Statements, each a non-empty list of fragments. There is always at
    /// least one: a directive line alone is rejected by the splitter.
    pub statements: Vec<Vec<Fragment>>,
    /// Whether statements after the first start on a new line.
    pub newline_separated: bool,
}

impl FuzzScript {
    /// The statements the splitter is expected to return, in order.
    #[must_use]
    pub fn expected_statements(&self) -> Vec<String> {
        self.statements
            .iter()
            .enumerate()
            .map(|(i, fragments)| {
                let mut out = String::new();
                if i > 0 && self.newline_separated {
                    out.push('\n');
                }
                render_fragments(fragments, &mut out);
                out
            })
            .collect()
    }

    /// Render the script, with a directive line for non-default delimiters
    /// and a delimiter after every statement.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.delimiter != DEFAULT_DELIMITER {
            out.push_str(DELIMITER_DIRECTIVE);
            out.push_str(self.delimiter);
            out.push('\n');
        }
        for statement in self.expected_statements() {
            out.push_str(&statement);
            out.push_str(self.delimiter);
        }
        out
    }
}

impl<'a> Arbitrary<'a> for FuzzScript {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let delimiter = *u.choose(&FUZZ_DELIMITERS)?;
        let mut statements = Vec::new();
        for _ in 0..u.int_in_range(1..=6)? {
            let mut fragments = Vec::new();
            for _ in 0..u.int_in_range(1..=6)? {
                fragments.push(Fragment::arbitrary(u)?);
            }
            statements.push(fragments);
        }
        Ok(Self {
            delimiter,
            statements,
            newline_separated: u.arbitrary()?,
        })
    }
}

/// Check that splitting `input` never panics and loses nothing.
///
/// Invalid input is expected and returns silently. On success, joining the
/// statements with the delimiter must reproduce the scanned text, with at
/// most one trailing delimiter missing.
///
/// # Panics
///
/// Panics if the re-joined statements differ from the scanned text.
pub fn test_split_roundtrip(input: &str) {
    let Ok(directive) = Directive::parse(input) else {
        return;
    };
    let Ok(statements) = Splitter::from(directive).collect::<Result<Vec<_>, _>>() else {
        return;
    };

    let joined = statements.join(directive.delimiter);
    let with_trailing = format!("{joined}{}", directive.delimiter);
    assert!(
        joined == directive.body || with_trailing == directive.body,
        "Round-trip mismatch!\n  delimiter: {:?}\n  scanned:   {:?}\n  joined:    {joined:?}\n  statements: {statements:?}",
        directive.delimiter,
        directive.body,
    );
}

/// Check that a rendered [`FuzzScript`] splits into exactly its statements.
///
/// # Panics
///
/// Panics if splitting fails or returns different statements.
pub fn test_script_roundtrip(script: &FuzzScript) {
    let rendered = script.render();
    let expected = script.expected_statements();
    let actual = match split_statements(&rendered) {
        Ok(statements) => statements,
        Err(err) => panic!("Failed to split generated script: {err}\n{rendered}"),
    };
    assert_eq!(
        actual, expected,
        "Statement mismatch for script:\n{rendered}"
    );
    test_split_roundtrip(&rendered);
}

/// Whether a `-` or `/` that does not open a comment is followed by a
/// character that is structural on its own, or that could open a comment.
///
/// The splitter consumes that second character without looking at it, where
/// SQLite's tokenizer would not.
fn has_lookahead_hazard(sql: &str) -> bool {
    sql.chars().zip(sql.chars().skip(1)).any(|pair| {
        matches!(
            pair,
            ('-' | '/', '\'' | '"' | '`' | '(' | ')' | '/') | ('/', '-')
        )
    })
}

/// Read every user table of `conn` as sorted, string-formatted rows.
#[must_use]
pub fn dump_tables(conn: &Connection) -> Vec<(String, Vec<Vec<String>>)> {
    let Ok(mut stmt) =
        conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
    else {
        return Vec::new();
    };
    let names: Vec<String> = match stmt.query_map([], |row| row.get(0)) {
        Ok(mapped) => mapped.filter_map(Result::ok).collect(),
        Err(_) => Vec::new(),
    };

    names
        .into_iter()
        .map(|name| {
            let rows = get_all_rows(conn, &name);
            (name, rows)
        })
        .collect()
}

fn get_all_rows(conn: &Connection, table_name: &str) -> Vec<Vec<String>> {
    let query = format!("SELECT * FROM \"{}\"", table_name.replace('"', "\"\""));
    let Ok(mut stmt) = conn.prepare(&query) else {
        return Vec::new();
    };

    let column_count = stmt.column_count();
    let rows_result = stmt.query_map([], |row| {
        let mut values = Vec::new();
        for i in 0..column_count {
            let value: rusqlite::types::Value = row.get(i).unwrap_or(rusqlite::types::Value::Null);
            values.push(format!("{value:?}"));
        }
        Ok(values)
    });

    let mut rows: Vec<Vec<String>> = match rows_result {
        Ok(mapped) => mapped.filter_map(Result::ok).collect(),
        Err(_) => Vec::new(),
    };

    // Sort for order-independent comparison
    rows.sort();
    rows
}

/// Compare statement-by-statement execution against SQLite's own batch
/// execution of the same script.
///
/// Returns silently for scripts where the two are not expected to agree:
/// backslash escapes and bracketed identifiers (SQLite has neither in the
/// same form), triggers (whose bodies contain bare `;`), scripts starting
/// with a delimiter directive (SQLite would see the directive line), scripts
/// the splitter rejects, and scripts that exercise the comment-marker
/// lookahead.
///
/// # Panics
///
/// Panics if one side succeeds where the other fails, or if the resulting
/// database contents differ.
pub fn run_differential_test(sql: &str) {
    if sql.contains(['\\', '['])
        || sql.to_ascii_lowercase().contains("trigger")
        || has_lookahead_hazard(sql)
    {
        return;
    }
    if sql.trim_start().starts_with(DELIMITER_DIRECTIVE) || split_statements(sql).is_err() {
        return;
    }

    let mut split_conn = Connection::open_in_memory().unwrap();
    let batch_conn = Connection::open_in_memory().unwrap();

    let split_result = execute_script(&mut split_conn, sql);
    let batch_result = batch_conn.execute_batch(sql);

    assert_eq!(
        split_result.is_ok(),
        batch_result.is_ok(),
        "Execution outcome mismatch!\n  split: {split_result:?}\n  batch: {batch_result:?}\n\nSQL:\n{sql}"
    );
    assert_eq!(
        dump_tables(&split_conn),
        dump_tables(&batch_conn),
        "Database state mismatch!\n\nSQL:\n{sql}"
    );
}
