//! Authentication state types

use serde::{Deserialize, Serialize};

/// Tri-state authentication status as observed by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthStatus {
    /// Status has not been resolved yet, or the SDK reported something unrecognized.
    #[default]
    Unknown,
    /// Browsing as a guest.
    Guest,
    /// Logged in through SSO.
    Authenticated,
}

impl AuthStatus {
    /// Get a user-friendly label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Guest => "Guest",
            Self::Authenticated => "Authenticated",
        }
    }
}

/// Snapshot of the authentication state.
///
/// The fields are private so the pairing of `status` and `user_id` cannot be
/// broken: a user id exists if and only if the status is
/// [`AuthStatus::Authenticated`]. Transitions consume the snapshot and return
/// a new one, so observers only ever see whole states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    status: AuthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    is_loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl AuthState {
    /// Initial state before the first status check.
    #[must_use]
    pub const fn unknown() -> Self {
        Self {
            status: AuthStatus::Unknown,
            user_id: None,
            is_loading: false,
            error: None,
        }
    }

    /// Settled guest state.
    #[must_use]
    pub const fn guest() -> Self {
        Self {
            status: AuthStatus::Guest,
            user_id: None,
            is_loading: false,
            error: None,
        }
    }

    /// Settled authenticated state for the given user.
    #[must_use]
    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self {
            status: AuthStatus::Authenticated,
            user_id: Some(user_id.into()),
            is_loading: false,
            error: None,
        }
    }

    /// Marks an operation as in flight and clears any previous error.
    #[must_use]
    pub fn loading(self) -> Self {
        Self {
            is_loading: true,
            error: None,
            ..self
        }
    }

    /// Ends an operation with a failure, leaving status and user untouched.
    #[must_use]
    pub fn failed(self, message: impl Into<String>) -> Self {
        Self {
            is_loading: false,
            error: Some(message.into()),
            ..self
        }
    }

    /// Ends an operation without changing anything else.
    #[must_use]
    pub fn settled(self) -> Self {
        Self {
            is_loading: false,
            ..self
        }
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> AuthStatus {
        self.status
    }

    /// Authenticated user id, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Whether an authentication or logout operation is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Error from the most recent failed attempt.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns true when logged in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self.status, AuthStatus::Authenticated)
    }
}

/// User status as reported by the identity SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserStatus {
    /// Logged in through SSO as the given user.
    SsoLoggedIn {
        /// SDK user id.
        user_id: String,
    },
    /// Guest session.
    Guest,
    /// Any status this coordinator does not recognize.
    Other(String),
}

impl From<UserStatus> for AuthState {
    fn from(status: UserStatus) -> Self {
        match status {
            UserStatus::SsoLoggedIn { user_id } => Self::authenticated(user_id),
            UserStatus::Guest => Self::guest(),
            // Indeterminate must never read as logged out.
            UserStatus::Other(_) => Self::unknown(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_is_unknown() {
        let state = AuthState::default();
        assert_eq!(state, AuthState::unknown());
        assert_eq!(state.status(), AuthStatus::Unknown);
        assert!(state.user_id().is_none());
        assert!(!state.is_loading());
    }

    #[test]
    fn test_failed_keeps_identity() {
        let state = AuthState::authenticated("user_1")
            .loading()
            .failed("boom");

        assert_eq!(state.status(), AuthStatus::Authenticated);
        assert_eq!(state.user_id(), Some("user_1"));
        assert_eq!(state.error(), Some("boom"));
        assert!(!state.is_loading());
    }

    #[test]
    fn test_loading_clears_error() {
        let state = AuthState::guest().failed("old error").loading();
        assert!(state.is_loading());
        assert!(state.error().is_none());
        assert_eq!(state.status(), AuthStatus::Guest);
    }

    #[test]
    fn test_settled_only_clears_loading() {
        let state = AuthState::guest().loading().settled();
        assert_eq!(state, AuthState::guest());
    }

    #[test]
    fn test_user_status_mapping() {
        assert_eq!(
            AuthState::from(UserStatus::SsoLoggedIn {
                user_id: "u".to_string()
            }),
            AuthState::authenticated("u")
        );
        assert_eq!(AuthState::from(UserStatus::Guest), AuthState::guest());
        assert_eq!(
            AuthState::from(UserStatus::Other("lockedOut".to_string())),
            AuthState::unknown()
        );
    }

    #[test]
    fn test_serialize_omits_absent_fields() {
        let json = serde_json::to_value(AuthState::guest()).unwrap_or_default();
        assert_eq!(
            json,
            serde_json::json!({ "status": "guest", "isLoading": false })
        );

        let json = serde_json::to_value(AuthState::authenticated("user_42")).unwrap_or_default();
        assert_eq!(json["userId"], "user_42");
        assert_eq!(json["status"], "authenticated");
    }
}
