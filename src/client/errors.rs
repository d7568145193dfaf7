use thiserror::Error;

/// Failures talking to the network's full node
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// Transport-level errors (network, connection, TLS)
    #[error("Transport error: {message} (endpoint: {endpoint})")]
    Transport { endpoint: String, message: String },

    /// Request or wait deadline exceeded
    #[error("Timeout after {timeout_ms}ms (endpoint: {endpoint})")]
    Timeout { endpoint: String, timeout_ms: u64 },

    /// Error object returned by the RPC server, or a non-success HTTP status
    #[error("RPC response error: {message} (endpoint: {endpoint}, code: {code:?})")]
    RpcResponse {
        endpoint: String,
        message: String,
        code: Option<i64>,
    },

    /// The response could not be decoded into the expected shape
    #[error("Decode error: {message} (endpoint: {endpoint})")]
    Decode { endpoint: String, message: String },
}

/// Message returned by full nodes for digests they have not indexed yet
const NOT_FOUND_MARKER: &str = "could not find the referenced transaction";

impl ProviderError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Transport { .. } => true,
            ProviderError::Timeout { .. } => true,
            ProviderError::Decode { .. } => false,
            ProviderError::RpcResponse { code, .. } => {
                // Retry on server errors (5xx)
                matches!(code, Some(c) if (500..600).contains(c))
            }
        }
    }

    /// True when the node does not know the transaction yet
    pub fn is_transaction_not_found(&self) -> bool {
        match self {
            ProviderError::RpcResponse { message, .. } => {
                message.to_lowercase().contains(NOT_FOUND_MARKER)
            }
            _ => false,
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            ProviderError::Transport { endpoint, .. }
            | ProviderError::Timeout { endpoint, .. }
            | ProviderError::RpcResponse { endpoint, .. }
            | ProviderError::Decode { endpoint, .. } => endpoint,
        }
    }

    /// Classify a reqwest failure
    pub fn from_reqwest(err: reqwest::Error, endpoint: &str, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout {
                endpoint: endpoint.to_string(),
                timeout_ms,
            }
        } else if err.is_decode() {
            ProviderError::Decode {
                endpoint: endpoint.to_string(),
                message: err.to_string(),
            }
        } else {
            ProviderError::Transport {
                endpoint: endpoint.to_string(),
                message: err.to_string(),
            }
        }
    }
}
