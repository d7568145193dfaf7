//! Structural sanity check run before a transaction leaves the process

use crate::tx_builder::transaction::Transaction;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Check that the transaction can be materialised and declares at least one input
///
/// Never mutates the transaction.
pub fn validate_transaction(tx: &Transaction) -> ValidationResult {
    let mut errors = Vec::new();

    match tx.data() {
        Ok(data) if data.inputs.is_empty() => {
            errors.push("transaction has no inputs".to_string());
        }
        Ok(_) => {}
        Err(e) => {
            debug!(category = e.category(), error = %e, "Transaction data unreadable");
            errors.push(format!("transaction is malformed: {}", e));
        }
    }

    ValidationResult::from_errors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx_builder::transaction::Argument;

    #[test]
    fn test_empty_transaction_has_no_inputs() {
        let result = validate_transaction(&Transaction::new());
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("no inputs"));
    }

    #[test]
    fn test_commands_without_inputs_still_invalid() {
        let mut tx = Transaction::new();
        tx.merge_coins(Argument::GasCoin, vec![]);
        let result = validate_transaction(&tx);
        assert!(!result.valid);
        assert_eq!(result.errors, vec!["transaction has no inputs".to_string()]);
    }

    #[test]
    fn test_single_input_is_valid() {
        let mut tx = Transaction::new();
        tx.pure_u64(7);
        let result = validate_transaction(&tx);
        assert!(result.valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_malformed_transaction() {
        let mut tx = Transaction::new();
        tx.pure_u64(7);
        tx.pure_address("0xnothex");
        let result = validate_transaction(&tx);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("transaction is malformed"));
    }
}
