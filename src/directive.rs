//! Leading delimiter directive.
//!
//! A script may start with a line of the form
//!
//! ```text
//! //atlas:delimiter $$
//! ```
//!
//! which replaces the default `;` delimiter for the remainder of the file.

use crate::errors::SplitError;

/// Marker that opens a delimiter directive. Only recognized as an exact
/// prefix of the trimmed input.
pub const DELIMITER_DIRECTIVE: &str = "//atlas:delimiter ";

/// Delimiter used when the script carries no directive.
pub const DEFAULT_DELIMITER: &str = ";";

/// The outcome of parsing the optional directive line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive<'a> {
    /// The active statement delimiter.
    pub delimiter: &'a str,
    /// The text left to scan once the directive line has been removed.
    pub body: &'a str,
    /// Byte offset of `body` within the raw input.
    pub offset: usize,
}

impl<'a> Directive<'a> {
    /// Trim the input and strip a leading delimiter directive, if present.
    ///
    /// The delimiter is everything between the marker and the first newline,
    /// used verbatim except for the `\r` of a `\r\n` line ending.
    ///
    /// # Errors
    ///
    /// * [`SplitError::UnterminatedDirective`] if the marker is present but no
    ///   newline follows it.
    /// * [`SplitError::EmptyDelimiter`] if the declared delimiter is empty.
    pub fn parse(input: &'a str) -> Result<Self, SplitError> {
        let leading = input.len() - input.trim_start().len();
        let trimmed = input.trim();

        let Some(rest) = trimmed.strip_prefix(DELIMITER_DIRECTIVE) else {
            return Ok(Self {
                delimiter: DEFAULT_DELIMITER,
                body: trimmed,
                offset: leading,
            });
        };

        let newline = rest.find('\n').ok_or(SplitError::UnterminatedDirective)?;
        let line = &rest[..newline];
        let delimiter = line.strip_suffix('\r').unwrap_or(line);
        if delimiter.is_empty() {
            return Err(SplitError::EmptyDelimiter);
        }

        tracing::debug!(delimiter, "delimiter overridden by directive");

        Ok(Self {
            delimiter,
            body: &rest[newline + 1..],
            offset: leading + DELIMITER_DIRECTIVE.len() + newline + 1,
        })
    }

    /// Whether the delimiter differs from [`DEFAULT_DELIMITER`].
    #[must_use]
    pub fn is_custom(&self) -> bool {
        self.delimiter != DEFAULT_DELIMITER
    }
}
