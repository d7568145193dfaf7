//! Error taxonomy of the journal-creation workflow

use crate::client::ProviderError;
use crate::units::{format_sui, Mist};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    /// Entry guard failed: no connected account, bad address or empty title
    #[error("Cannot submit: {0}")]
    Precondition(String),

    /// The account owns no fee-currency coins at all
    #[error("No SUI coins found for {address}; acquire funds from the faucet first")]
    NoFunds { address: String },

    /// Total balance is below the required minimum
    #[error("{}", insufficient_message(.available, .required))]
    InsufficientFunds { available: Mist, required: Mist },

    /// Structural validation failed
    #[error("Transaction validation failed: {}", .0.join(", "))]
    MalformedTransaction(Vec<String>),

    /// Network or transport failure
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The signer or the network rejected the transaction
    #[error("Transaction failed: {0}")]
    SigningOrExecution(String),

    /// The transaction succeeded but created no object
    #[error("Transaction {digest} succeeded but created no object")]
    MissingResult { digest: String },
}

fn insufficient_message(available: &Mist, required: &Mist) -> String {
    let deficit = available.shortfall_to(*required);
    format!(
        "Insufficient SUI balance: have {}, need {} (short by {} MIST, {} SUI)",
        available,
        required,
        deficit.as_u128(),
        format_sui(deficit)
    )
}

impl JournalError {
    /// Shortfall carried by `InsufficientFunds`
    pub fn deficit(&self) -> Option<Mist> {
        match self {
            Self::InsufficientFunds {
                available,
                required,
            } => Some(available.shortfall_to(*required)),
            _ => None,
        }
    }

    /// Check if resubmitting the same request might succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Provider(e) => e.is_retryable(),
            Self::Precondition(_) => false,
            Self::NoFunds { .. } => false,
            Self::InsufficientFunds { .. } => false,
            Self::MalformedTransaction(_) => false,
            Self::SigningOrExecution(_) => false,
            Self::MissingResult { .. } => false,
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Precondition(_) => "precondition",
            Self::NoFunds { .. } => "no_funds",
            Self::InsufficientFunds { .. } => "insufficient_funds",
            Self::MalformedTransaction(_) => "validation",
            Self::Provider(_) => "provider",
            Self::SigningOrExecution(_) => "execution",
            Self::MissingResult { .. } => "missing_result",
        }
    }
}
