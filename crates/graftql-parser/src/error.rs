//! Pipeline error types

use std::io;
use thiserror::Error;

/// A failure anywhere in the schema loading pipeline.
///
/// Every variant is fatal to the current run: nothing is retried and nothing
/// is downgraded to a warning. `Read` aborts before parsing, `Syntax` and
/// `NoSuchInterface` abort before validation, and `Validation` aborts after
/// the diagnostic dump of the rejected document has been written.
#[derive(Error, Debug)]
pub enum LoadError {
    /// A source locator could not be read.
    #[error("failed to read from {locator}")]
    Read {
        locator: String,
        #[source]
        source: io::Error,
    },

    /// A source was not syntactically valid SDL. Line and column are
    /// 1-indexed positions of the offending token.
    #[error("{locator}:{line}:{column}: {message}")]
    Syntax {
        locator: String,
        line: usize,
        column: usize,
        message: String,
    },

    /// An `implements` target did not resolve to an interface definition.
    #[error("no such interface: {0}")]
    NoSuchInterface(String),

    /// The merged document violates a type-system well-formedness rule. The
    /// message is the validator's text, not further elaborated.
    #[error("{0}")]
    Validation(String),
}

impl LoadError {
    /// Wrap a reader failure with the locator it came from.
    pub fn read(locator: impl Into<String>, source: io::Error) -> Self {
        LoadError::Read {
            locator: locator.into(),
            source,
        }
    }
}
