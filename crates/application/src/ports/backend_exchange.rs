//! Backend exchange port

use async_trait::async_trait;
use parley_domain::{CodeA, CodeB, SsoUser};
use thiserror::Error;

/// Errors from the codeA → codeB exchange.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    /// The backend answered with a non-success status.
    #[error("SSO API error {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, kept as diagnostic text.
        body: String,
    },

    /// The request never produced a response.
    #[error("SSO exchange request failed: {0}")]
    Network(String),

    /// The backend answered with something that is not a usable codeB.
    #[error("invalid SSO exchange response: {0}")]
    InvalidResponse(String),

    /// The exchange is not configured well enough to be attempted.
    #[error("SSO exchange misconfigured: {0}")]
    Config(String),
}

/// Port for the backend that trades a codeA for a codeB.
///
/// The exchange must run where the long-lived access token is kept, never in
/// the client.
#[async_trait]
pub trait BackendExchange: Send + Sync {
    /// Exchange `code_a` for a codeB, registering `user` with the SSO backend.
    ///
    /// # Errors
    ///
    /// Returns an [`ExchangeError`] if the backend rejects the code or cannot
    /// be reached.
    async fn exchange(&self, code_a: &CodeA, user: &SsoUser) -> Result<CodeB, ExchangeError>;
}
