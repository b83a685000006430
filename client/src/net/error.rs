//! Request-time error taxonomy.
//!
//! ERROR HANDLING
//! ==============
//! `AuthenticationExpired` is the only variant with a side effect (the
//! gateway has already cleared the stored credential and broadcast a logout
//! notice). `Network` means no response arrived. `Status` carries a non-2xx
//! response that a typed endpoint chose not to handle.

/// Message shown when the server rejects the stored token.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

/// Message shown when no response was received.
pub const NETWORK_ERROR_MESSAGE: &str = "A network error occurred.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("{}", SESSION_EXPIRED_MESSAGE)]
    AuthenticationExpired,
    #[error("network error: {0}")]
    Network(String),
    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("invalid request body: {0}")]
    Encode(String),
}

impl ApiError {
    /// HTTP status associated with the error; `0` when no response arrived.
    pub fn status(&self) -> u16 {
        match self {
            Self::AuthenticationExpired => 401,
            Self::Status { status, .. } => *status,
            Self::Network(_) | Self::Decode(_) | Self::Encode(_) => 0,
        }
    }

    /// Short text suitable for an inline form error.
    pub fn user_message(&self) -> String {
        match self {
            Self::AuthenticationExpired => SESSION_EXPIRED_MESSAGE.to_owned(),
            Self::Network(_) => NETWORK_ERROR_MESSAGE.to_owned(),
            Self::Status { message, .. } => message.clone(),
            Self::Decode(_) | Self::Encode(_) => "Unexpected response from the server.".to_owned(),
        }
    }
}
