//! Application error types

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::ports::{ExchangeError, SdkError};

/// External calls made while authenticating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeStep {
    /// Requesting a codeA from the SDK.
    StartSso,
    /// Trading codeA for codeB with the backend.
    Exchange,
    /// Submitting codeB to the SDK.
    CompleteSso,
    /// Exchanging a third-party provider token.
    ProviderSso,
    /// Ending the SDK session.
    Logout,
    /// Querying the SDK for the current user.
    UserStatus,
}

impl HandshakeStep {
    /// Short name used in logs and error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::StartSso => "startSSO",
            Self::Exchange => "code exchange",
            Self::CompleteSso => "completeSSO",
            Self::ProviderSso => "ssoUsingProvider",
            Self::Logout => "logout",
            Self::UserStatus => "getUserStatus",
        }
    }
}

impl fmt::Display for HandshakeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised by coordinator operations.
///
/// The `Display` text is what ends up in `AuthState::error`.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The identity SDK rejected a call.
    #[error("{0}")]
    Sdk(#[from] SdkError),

    /// The backend could not exchange codeA for codeB.
    #[error("{0}")]
    Exchange(#[from] ExchangeError),

    /// An external call did not answer in time.
    #[error("{step} timed out after {}s", .after.as_secs())]
    Timeout {
        /// The call that stalled.
        step: HandshakeStep,
        /// The configured limit.
        after: Duration,
    },

    /// Another authentication or logout operation is still running.
    #[error("another authentication operation is in progress")]
    Busy,
}

/// Result type alias for coordinator operations.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_error_message_is_passed_through() {
        let error = AuthError::from(ExchangeError::Api {
            status: 403,
            body: "forbidden".to_string(),
        });
        assert_eq!(error.to_string(), "SSO API error 403: forbidden");
    }

    #[test]
    fn test_timeout_message() {
        let error = AuthError::Timeout {
            step: HandshakeStep::CompleteSso,
            after: Duration::from_secs(30),
        };
        assert_eq!(error.to_string(), "completeSSO timed out after 30s");
    }
}
