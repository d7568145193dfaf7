//! Error types for transaction construction
//!
//! Builder helpers on [`Transaction`](super::Transaction) never fail at the call
//! site. The first problem is stored on the transaction and surfaces when the
//! data is materialised through `Transaction::data()`.

use crate::types::ParseIdError;
use thiserror::Error;

/// Errors recorded while assembling a transaction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionBuilderError {
    /// A recipient or sender address could not be parsed
    #[error("invalid address '{value}': {source}")]
    InvalidAddress {
        value: String,
        #[source]
        source: ParseIdError,
    },

    /// An object id could not be parsed
    #[error("invalid object id '{value}': {source}")]
    InvalidObjectId {
        value: String,
        #[source]
        source: ParseIdError,
    },

    /// A command refers to an input or result that does not exist
    ///
    /// Results may only refer to commands that come earlier in the list.
    #[error("command {command} refers to missing {argument}")]
    DanglingArgument {
        /// Index of the offending command
        command: usize,
        /// Human readable form of the argument
        argument: String,
    },

    /// More inputs or commands than the u16 argument space allows
    #[error("too many {kind} (limit {limit})")]
    CapacityExceeded { kind: &'static str, limit: usize },
}

impl TransactionBuilderError {
    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidAddress { .. } => "address",
            Self::InvalidObjectId { .. } => "object_id",
            Self::DanglingArgument { .. } => "argument",
            Self::CapacityExceeded { .. } => "capacity",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TransactionBuilderError::DanglingArgument {
            command: 1,
            argument: "Input(3)".to_string(),
        };
        assert_eq!(err.to_string(), "command 1 refers to missing Input(3)");

        let err = TransactionBuilderError::InvalidAddress {
            value: "0xzz".to_string(),
            source: ParseIdError::InvalidHex("0xzz".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "invalid address '0xzz': '0xzz' is not valid hex"
        );
    }

    #[test]
    fn test_error_categories() {
        let err = TransactionBuilderError::CapacityExceeded {
            kind: "inputs",
            limit: 10,
        };
        assert_eq!(err.category(), "capacity");
    }
}
