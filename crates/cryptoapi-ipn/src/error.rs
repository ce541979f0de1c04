use thiserror::Error;

/// Errors returned while processing an inbound notification.
#[derive(Debug, Error)]
pub enum IpnError {
    /// The claimed signature does not match the computed one.
    #[error("sign wrong")]
    SignatureMismatch,

    #[error("invalid amount {value:?}: {reason}")]
    InvalidAmount { value: String, reason: String },

    #[error("invalid label {value:?}: {reason}")]
    InvalidLabel { value: String, reason: String },

    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl IpnError {
    /// True for malformed caller input (400-class), false for authentication
    /// failures.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, IpnError::SignatureMismatch)
    }
}

/// Errors from a single provider call. Recovered by the aggregator.
///
/// Messages never include the request URL, which carries the API key.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("error code: {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("decode error: {0}")]
    Decode(String),
}
