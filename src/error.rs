//! Error definitions.

use alloc::string::String;

use thiserror::Error;

/// Failure to read a map or set back from its textual form.
///
/// Produced by `parse`, `parse_with` and the [`FromStr`](core::str::FromStr)
/// implementations. Misuse of the collections themselves (an invalid load
/// factor, an out-of-range position) panics instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Brackets were expected but the text does not start with `{`.
    #[error("expected text to start with '{{'")]
    MissingOpenBracket,

    /// Brackets were expected but the text does not end with `}`.
    #[error("expected text to end with '}}'")]
    MissingCloseBracket,

    /// A map entry has no key/value separator.
    #[error("no key/value separator in entry {entry:?}")]
    MissingKeyValueSeparator {
        /// The offending entry.
        entry: String,
    },

    /// The key converter rejected a piece of text.
    #[error("invalid key {text:?}")]
    InvalidKey {
        /// The rejected text.
        text: String,
    },

    /// The value converter rejected a piece of text.
    #[error("invalid value {text:?}")]
    InvalidValue {
        /// The rejected text.
        text: String,
    },
}
