//! Identity SDK port

use async_trait::async_trait;
use parley_domain::{CodeA, CodeB, SsoProvider, UserStatus};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::auth::Completion;

/// Failure reported by the identity SDK.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SdkError {
    /// Message as reported by the SDK. May be empty.
    pub message: String,
}

impl SdkError {
    /// Creates an SDK error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Requests the SDK pushes to its host application.
#[derive(Debug)]
pub enum SdkEvent {
    /// The SDK wants the host to show its login UI.
    ///
    /// The completion must be invoked exactly once, when the UI interaction
    /// is over, whether or not the user logged in.
    DisplayAuthenticationFlow {
        /// Signals the SDK that the login UI is finished.
        completion: Completion,
    },
    /// The SDK wants the session renewed silently.
    RenewSso {
        /// User whose session is expiring.
        user_id: String,
        /// Signals the SDK that the renewal attempt is over.
        completion: Completion,
    },
}

/// Stream of SDK events delivered to a single subscriber.
pub type SdkEventReceiver = mpsc::UnboundedReceiver<SdkEvent>;

/// Port for the identity SDK.
///
/// Session durability and code validation belong to the SDK; the coordinator
/// only sequences calls.
#[async_trait]
pub trait IdentitySdk: Send + Sync {
    /// Begin a handshake and return the codeA to exchange.
    async fn start_sso(&self) -> Result<CodeA, SdkError>;

    /// Finish a handshake with the backend-issued codeB. Returns the user id.
    async fn complete_sso(&self, code_b: &CodeB) -> Result<String, SdkError>;

    /// Log in with a token issued by a third-party provider. Returns the user id.
    async fn sso_using_provider(
        &self,
        provider: SsoProvider,
        token: &str,
    ) -> Result<String, SdkError>;

    /// Query the current user status.
    async fn get_user_status(&self) -> Result<UserStatus, SdkError>;

    /// End the current session.
    async fn logout(&self) -> Result<(), SdkError>;

    /// Register for SDK events. A later subscription replaces the earlier one;
    /// dropping the receiver unsubscribes.
    fn subscribe(&self) -> SdkEventReceiver;

    /// Controls whether the SDK asks the host to show a login prompt on its own.
    fn set_should_display_login_prompt(&self, value: bool);

    /// Current value of the login prompt flag.
    fn should_display_login_prompt(&self) -> bool;
}
