#![doc = include_str!("../README.md")]
#![no_std]
#![deny(clippy::mod_module_files)]

extern crate alloc;

pub mod directive;
pub mod errors;
pub mod execute;
pub mod splitter;
#[cfg(feature = "testing")]
pub mod testing;

// Re-export main types
pub use directive::{DEFAULT_DELIMITER, DELIMITER_DIRECTIVE, Directive};
pub use execute::{Execute, ExecuteError, execute_script};
pub use splitter::{Splitter, split_statements};

// Re-export errors
pub use errors::SplitError;
