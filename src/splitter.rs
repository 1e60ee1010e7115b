//! Statement splitter.
//!
//! [`Splitter`] scans a script one code point at a time and hands out each
//! statement as soon as an unquoted, uncommented, unnested delimiter is found.
//! Classification and extraction happen in the same forward pass; there is no
//! separate tokenization step.

mod cursor;

use alloc::vec::Vec;
use core::iter::FusedIterator;

use cursor::Cursor;

use crate::directive::Directive;
use crate::errors::SplitError;

/// Pull-based splitter over a single SQL script.
///
/// A splitter is built once per input and yields a finite, forward-only
/// sequence of statements. Statements borrow from the input and are returned
/// verbatim: the delimiter is never part of either neighbouring statement,
/// and no trimming happens beyond the outer trim of the whole script.
///
/// # Example
///
/// ```
/// use sql_stmt_splitter::Splitter;
///
/// let mut splitter = Splitter::new("CREATE TABLE t (a TEXT DEFAULT ';');INSERT INTO t VALUES ('x')")?;
/// assert_eq!(splitter.next_statement()?, Some("CREATE TABLE t (a TEXT DEFAULT ';')"));
/// assert_eq!(splitter.next_statement()?, Some("INSERT INTO t VALUES ('x')"));
/// assert_eq!(splitter.next_statement()?, None);
/// # Ok::<(), sql_stmt_splitter::SplitError>(())
/// ```
pub struct Splitter<'a> {
    cursor: Cursor<'a>,
    delimiter: &'a str,
    /// Offset of the scanned buffer within the raw input.
    base: usize,
    /// Start of the statement being accumulated.
    start: usize,
    /// Unmatched '(' since the last statement boundary.
    depth: usize,
    /// Start of the outermost unmatched '('.
    open_at: usize,
    finished: bool,
}

impl<'a> Splitter<'a> {
    /// Create a splitter, applying the optional leading delimiter directive.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the directive is malformed, see
    /// [`Directive::parse`].
    pub fn new(input: &'a str) -> Result<Self, SplitError> {
        Ok(Self::from(Directive::parse(input)?))
    }

    /// The active delimiter.
    #[must_use]
    pub fn delimiter(&self) -> &'a str {
        self.delimiter
    }

    /// Current scan position as a byte offset into the raw input.
    #[must_use]
    pub fn position(&self) -> usize {
        self.base + self.cursor.position()
    }

    /// Number of currently unmatched open parentheses.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Return the next statement, or `None` once the input is exhausted.
    ///
    /// After exhaustion or after an error the splitter keeps returning
    /// `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns the structural error that stopped the scan: unclosed
    /// parentheses, a stray `)`, an unclosed quote or an unclosed block
    /// comment.
    pub fn next_statement(&mut self) -> Result<Option<&'a str>, SplitError> {
        if self.finished {
            return Ok(None);
        }
        let result = self.scan();
        if !matches!(result, Ok(Some(_))) {
            self.finished = true;
        }
        result
    }

    fn scan(&mut self) -> Result<Option<&'a str>, SplitError> {
        loop {
            let Some(c) = self.cursor.bump() else {
                return self.finish();
            };
            let at = self.cursor.last_start();
            match c {
                '(' => {
                    if self.depth == 0 {
                        self.open_at = at;
                    }
                    self.depth += 1;
                }
                ')' => {
                    if self.depth == 0 {
                        return Err(SplitError::UnexpectedCloseParen {
                            offset: self.base + at,
                        });
                    }
                    self.depth -= 1;
                }
                '\'' | '"' | '`' => {
                    if !self.cursor.skip_quote(c) {
                        return Err(SplitError::UnclosedQuote {
                            quote: c,
                            offset: self.base + at,
                        });
                    }
                }
                // Two-character markers: the lookahead is consumed whether or
                // not it completes the marker, and is never examined again.
                '-' | '/' => match (c, self.cursor.bump()) {
                    ('-', Some('-')) => self.cursor.skip_line_comment(),
                    ('/', Some('*')) => {
                        if !self.cursor.skip_block_comment() {
                            return Err(SplitError::UnclosedComment {
                                offset: self.base + at,
                            });
                        }
                    }
                    _ => {
                        if let Some(statement) = self.match_delimiter(at) {
                            return Ok(Some(statement));
                        }
                    }
                },
                _ => {
                    if let Some(statement) = self.match_delimiter(at) {
                        return Ok(Some(statement));
                    }
                }
            }
        }
    }

    /// Close the current statement if the delimiter starts at `at`.
    fn match_delimiter(&mut self, at: usize) -> Option<&'a str> {
        let input = self.cursor.input();
        if self.depth > 0 || !input[at..].starts_with(self.delimiter) {
            return None;
        }
        let statement = &input[self.start..at];
        self.start = at + self.delimiter.len();
        self.cursor.set_position(self.start);
        tracing::trace!(
            offset = self.base + at,
            len = statement.len(),
            "statement boundary"
        );
        Some(statement)
    }

    fn finish(&mut self) -> Result<Option<&'a str>, SplitError> {
        if self.depth > 0 {
            return Err(SplitError::UnclosedParentheses {
                offset: self.base + self.open_at,
            });
        }
        let input = self.cursor.input();
        if self.start < input.len() {
            let statement = &input[self.start..];
            self.start = input.len();
            return Ok(Some(statement));
        }
        Ok(None)
    }
}

impl<'a> From<Directive<'a>> for Splitter<'a> {
    fn from(directive: Directive<'a>) -> Self {
        Self {
            cursor: Cursor::new(directive.body),
            delimiter: directive.delimiter,
            base: directive.offset,
            start: 0,
            depth: 0,
            open_at: 0,
            finished: false,
        }
    }
}

impl<'a> Iterator for Splitter<'a> {
    type Item = Result<&'a str, SplitError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_statement().transpose()
    }
}

impl FusedIterator for Splitter<'_> {}

/// Split `input` into its statements.
///
/// # Errors
///
/// Returns the first error the [`Splitter`] runs into. No statements are
/// returned in that case.
pub fn split_statements(input: &str) -> Result<Vec<&str>, SplitError> {
    Splitter::new(input)?.collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_default_delimiter() {
        assert_eq!(
            split_statements("SELECT 1;SELECT 2;").unwrap(),
            vec!["SELECT 1", "SELECT 2"]
        );
        assert_eq!(
            split_statements("SELECT 1;\nSELECT 2").unwrap(),
            vec!["SELECT 1", "\nSELECT 2"]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(split_statements("").unwrap().is_empty());
        assert!(split_statements(" \n\t ").unwrap().is_empty());
    }

    #[test]
    fn test_adjacent_delimiters() {
        assert_eq!(split_statements("a;;b").unwrap(), vec!["a", "", "b"]);
    }

    #[test]
    fn test_delimiter_in_quotes() {
        assert_eq!(
            split_statements("SELECT 'a;b'").unwrap(),
            vec!["SELECT 'a;b'"]
        );
        assert_eq!(
            split_statements(r#"SELECT "x;y", `z;w`;SELECT 2"#).unwrap(),
            vec![r#"SELECT "x;y", `z;w`"#, "SELECT 2"]
        );
    }

    #[test]
    fn test_escaped_quote() {
        assert_eq!(
            split_statements(r"SELECT 'it\'s; fine';SELECT 2").unwrap(),
            vec![r"SELECT 'it\'s; fine'", "SELECT 2"]
        );
    }

    #[test]
    fn test_delimiter_in_parentheses() {
        assert_eq!(
            split_statements("CREATE TRIGGER t (a; b);SELECT 1").unwrap(),
            vec!["CREATE TRIGGER t (a; b)", "SELECT 1"]
        );
    }

    #[test]
    fn test_delimiter_in_comments() {
        assert_eq!(
            split_statements("SELECT 1 -- a;b\n;SELECT 2").unwrap(),
            vec!["SELECT 1 -- a;b\n", "SELECT 2"]
        );
        assert_eq!(
            split_statements("SELECT /* a;b */ 1;SELECT 2").unwrap(),
            vec!["SELECT /* a;b */ 1", "SELECT 2"]
        );
    }

    #[test]
    fn test_line_comment_without_newline() {
        assert_eq!(
            split_statements("SELECT 1;-- trailing; comment").unwrap(),
            vec!["SELECT 1", "-- trailing; comment"]
        );
    }

    #[test]
    fn test_quote_inside_comment_is_ignored() {
        assert_eq!(
            split_statements("SELECT 1 /* it's */;-- don't\nSELECT 2").unwrap(),
            vec!["SELECT 1 /* it's */", "-- don't\nSELECT 2"]
        );
    }

    #[test]
    fn test_lookahead_is_consumed() {
        // The '(' after '-' is skipped structurally, so the ')' is unexpected.
        assert_eq!(
            split_statements("SELECT 1-(2)"),
            Err(SplitError::UnexpectedCloseParen { offset: 11 })
        );
        // The quote after '/' does not open a literal.
        assert_eq!(
            split_statements("SELECT 4/'2;SELECT 3").unwrap(),
            vec!["SELECT 4/'2", "SELECT 3"]
        );
        // The delimiter right after '-' is not a boundary.
        assert_eq!(split_statements("SELECT -;1").unwrap(), vec!["SELECT -;1"]);
    }

    #[test]
    fn test_unclosed_parentheses() {
        assert_eq!(
            split_statements("SELECT (1"),
            Err(SplitError::UnclosedParentheses { offset: 7 })
        );
        assert_eq!(
            split_statements("SELECT 1; SELECT ((2)"),
            Err(SplitError::UnclosedParentheses { offset: 17 })
        );
    }

    #[test]
    fn test_unexpected_close_paren() {
        assert_eq!(
            split_statements("SELECT )1"),
            Err(SplitError::UnexpectedCloseParen { offset: 7 })
        );
    }

    #[test]
    fn test_unclosed_quote() {
        assert_eq!(
            split_statements("SELECT 'abc"),
            Err(SplitError::UnclosedQuote {
                quote: '\'',
                offset: 7
            })
        );
        assert_eq!(
            split_statements("SELECT \"a\\\""),
            Err(SplitError::UnclosedQuote {
                quote: '"',
                offset: 7
            })
        );
    }

    #[test]
    fn test_unclosed_comment() {
        assert_eq!(
            split_statements("SELECT 1; /* never closed;"),
            Err(SplitError::UnclosedComment { offset: 10 })
        );
    }

    #[test]
    fn test_offsets_are_relative_to_raw_input() {
        assert_eq!(
            split_statements("\n\n  SELECT )"),
            Err(SplitError::UnexpectedCloseParen { offset: 11 })
        );
        let input = "//atlas:delimiter $$\nSELECT )$$";
        assert_eq!(
            split_statements(input),
            Err(SplitError::UnexpectedCloseParen {
                offset: input.find(')').unwrap()
            })
        );
    }

    #[test]
    fn test_custom_delimiter() {
        assert_eq!(
            split_statements("//atlas:delimiter $$\nSTMT1$$\nSTMT2$$").unwrap(),
            vec!["STMT1", "\nSTMT2"]
        );
        assert_eq!(
            split_statements("//atlas:delimiter $$\nSTMT1; STMT2$$").unwrap(),
            vec!["STMT1; STMT2"]
        );
    }

    #[test]
    fn test_custom_delimiter_starting_with_slash() {
        assert_eq!(
            split_statements("//atlas:delimiter //\nA // B /* c */// C").unwrap(),
            vec!["A ", " B /* c */", " C"]
        );
    }

    #[test]
    fn test_multibyte_delimiter() {
        assert_eq!(
            split_statements("//atlas:delimiter ¶\nSELECT 'é¶'¶SELECT 2¶").unwrap(),
            vec!["SELECT 'é¶'", "SELECT 2"]
        );
    }

    #[test]
    fn test_delimiter_adjacent_to_quote_and_comment() {
        assert_eq!(
            split_statements("SELECT 'a';/* c */;SELECT \"b\"").unwrap(),
            vec!["SELECT 'a'", "/* c */", "SELECT \"b\""]
        );
    }

    #[test]
    fn test_iterator_is_fused_after_error() {
        let mut splitter = Splitter::new("SELECT 1; SELECT )").unwrap();
        assert_eq!(splitter.next(), Some(Ok("SELECT 1")));
        assert_eq!(
            splitter.next(),
            Some(Err(SplitError::UnexpectedCloseParen { offset: 17 }))
        );
        assert_eq!(splitter.next(), None);
        assert_eq!(splitter.next_statement(), Ok(None));
    }

    #[test]
    fn test_accessors() {
        let mut splitter = Splitter::new("  //atlas:delimiter GO\nSELECT (1) GO").unwrap();
        assert_eq!(splitter.delimiter(), "GO");
        assert_eq!(splitter.position(), 23);
        assert_eq!(splitter.next_statement().unwrap(), Some("SELECT (1) "));
        assert_eq!(splitter.depth(), 0);
        assert_eq!(splitter.next_statement().unwrap(), None);
    }
}
