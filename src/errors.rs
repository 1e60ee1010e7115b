//! Submodule defining the errors used across the crate.

/// Errors that can occur while splitting a SQL script into statements.
///
/// Every variant is fatal for the [`Splitter`](crate::Splitter) that produced
/// it: no partial statement is ever returned alongside an error. All offsets
/// are byte offsets into the raw input handed to
/// [`Splitter::new`](crate::Splitter::new).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SplitError {
    /// The delimiter directive is not followed by a newline.
    #[error("invalid delimiter directive: missing newline after the delimiter")]
    UnterminatedDirective,
    /// The delimiter directive declares an empty delimiter.
    #[error("invalid delimiter directive: empty delimiter")]
    EmptyDelimiter,
    /// Input ended while parentheses were still open.
    #[error("unclosed parentheses: '(' at position {offset} is never closed")]
    UnclosedParentheses {
        /// Position of the outermost unclosed '('.
        offset: usize,
    },
    /// A closing parenthesis appeared without a matching open one.
    #[error("unexpected ')' at position {offset}")]
    UnexpectedCloseParen {
        /// Position of the stray ')'.
        offset: usize,
    },
    /// A quoted literal or identifier never found its closing quote.
    #[error("unclosed quote {quote:?} starting at position {offset}")]
    UnclosedQuote {
        /// The opening quote character.
        quote: char,
        /// Position of the opening quote.
        offset: usize,
    },
    /// A block comment never found its closing `*/`.
    #[error("unclosed comment starting at position {offset}")]
    UnclosedComment {
        /// Position of the '/' opening the comment.
        offset: usize,
    },
}

impl SplitError {
    /// Whether the error comes from a malformed delimiter directive rather
    /// than from the structure of the statements themselves.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::UnterminatedDirective | Self::EmptyDelimiter)
    }

    /// Position in the raw input the error points at, if any.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::UnterminatedDirective | Self::EmptyDelimiter => None,
            Self::UnclosedParentheses { offset }
            | Self::UnexpectedCloseParen { offset }
            | Self::UnclosedQuote { offset, .. }
            | Self::UnclosedComment { offset } => Some(*offset),
        }
    }
}
