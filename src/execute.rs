//! Running split statements against a database.
//!
//! The splitter never talks to a database itself. [`Execute`] is the seam to
//! whatever does: statements are handed over one at a time, strictly in
//! order, and the batch stops at the first failure.

use alloc::string::String;

use crate::errors::SplitError;
use crate::splitter::Splitter;

/// Something that can run a single SQL statement.
pub trait Execute {
    /// Error returned when a statement fails.
    type Error;

    /// Execute one statement.
    ///
    /// # Errors
    ///
    /// Returns the executor's error if the statement fails.
    fn execute(&mut self, statement: &str) -> Result<(), Self::Error>;
}

impl<E: Execute + ?Sized> Execute for &mut E {
    type Error = E::Error;

    fn execute(&mut self, statement: &str) -> Result<(), Self::Error> {
        (**self).execute(statement)
    }
}

/// Errors returned by [`execute_script`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecuteError<E> {
    /// The script could not be split.
    #[error(transparent)]
    Split(#[from] SplitError),
    /// A statement failed to execute.
    #[error("statement {index} failed: {error}")]
    Statement {
        /// Zero-based position of the statement in split order.
        index: usize,
        /// The statement text, as handed to the executor.
        statement: String,
        /// The executor's error.
        error: E,
    },
}

/// Split `input` and execute its statements in order.
///
/// Statements that are empty once surrounding whitespace is trimmed are
/// skipped. Returns how many statements were executed.
///
/// Splitting is interleaved with execution, so a structural error late in the
/// script surfaces only after the statements before it have run.
///
/// # Errors
///
/// Stops at the first [`SplitError`] or at the first statement the executor
/// rejects.
pub fn execute_script<X: Execute + ?Sized>(
    executor: &mut X,
    input: &str,
) -> Result<usize, ExecuteError<X::Error>>
where
    X::Error: core::fmt::Display,
{
    let mut executed = 0;
    for (index, statement) in Splitter::new(input)?.enumerate() {
        let statement = statement?;
        if statement.trim().is_empty() {
            continue;
        }
        tracing::debug!(index, statement, "executing statement");
        if let Err(error) = executor.execute(statement) {
            tracing::warn!(index, %error, "statement failed");
            return Err(ExecuteError::Statement {
                index,
                statement: statement.into(),
                error,
            });
        }
        executed += 1;
    }
    Ok(executed)
}

#[cfg(feature = "rusqlite")]
impl Execute for rusqlite::Connection {
    type Error = rusqlite::Error;

    fn execute(&mut self, statement: &str) -> Result<(), Self::Error> {
        self.execute_batch(statement)
    }
}
