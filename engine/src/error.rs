//! Error types for the Quotesync engine.

use thiserror::Error;

/// All possible errors from the Quotesync engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Import errors
    #[error("import payload is not valid JSON: {0}")]
    ImportParse(String),

    #[error("import payload must be a JSON array of quote objects")]
    ImportNotAnArray,

    #[error("no valid quote items in import payload")]
    NoValidItems,

    // Persistence errors
    #[error("invalid collection payload: {0}")]
    InvalidCollection(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::NoValidItems;
        assert_eq!(err.to_string(), "no valid quote items in import payload");

        let err = Error::InvalidCollection("truncated".into());
        assert_eq!(err.to_string(), "invalid collection payload: truncated");
    }
}
