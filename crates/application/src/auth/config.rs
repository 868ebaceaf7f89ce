//! Coordinator configuration

use std::time::Duration;

use parley_domain::SsoUser;

/// Settings for [`AuthCoordinator`](super::AuthCoordinator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Upper bound for each external call (SDK or backend).
    pub step_timeout: Duration,
    /// Value pushed to the SDK's login prompt flag on start.
    pub display_login_prompt: bool,
    /// User registered by `authenticate()` and by renewals before any login.
    pub default_user: SsoUser,
}

impl CoordinatorConfig {
    /// Set the per-step timeout.
    #[must_use]
    pub const fn with_step_timeout(mut self, step_timeout: Duration) -> Self {
        self.step_timeout = step_timeout;
        self
    }

    /// Set the default SSO user.
    #[must_use]
    pub fn with_default_user(mut self, user: SsoUser) -> Self {
        self.default_user = user;
        self
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            step_timeout: Duration::from_secs(30),
            display_login_prompt: true,
            default_user: SsoUser::default(),
        }
    }
}
