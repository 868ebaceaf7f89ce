//! Application configuration.
//!
//! Loaded from an optional TOML file, then overridden by `PARLEY__*`
//! environment variables (`PARLEY__EXCHANGE__ACCESS_TOKEN`, ...).

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use parley_application::{BackendExchange, Clock, CoordinatorConfig, ExchangeError};
use parley_domain::SsoUser;
use serde::Deserialize;
use thiserror::Error;

use crate::adapters::{MockBackendExchange, ReqwestBackendExchange};

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "parley";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum AppConfigError {
    /// The sources could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    /// HTTP exchange selected without a backend credential.
    #[error("exchange.access_token is required when exchange.mode is \"http\"")]
    MissingAccessToken,

    /// A timeout setting is zero.
    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Which backend exchange to wire up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeMode {
    /// Simulated backend that fabricates codes locally.
    #[default]
    Mock,
    /// Real backend reached over HTTP.
    Http,
}

/// Backend exchange settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExchangeSettings {
    /// Backend selection.
    pub mode: ExchangeMode,
    /// Base URL of the SSO backend.
    pub base_url: String,
    /// Backend credential. Never compiled in.
    pub access_token: Option<String>,
    /// HTTP request timeout.
    pub timeout_secs: u64,
    /// Simulated latency of the mock backend.
    pub mock_latency_ms: u64,
}

impl Default for ExchangeSettings {
    fn default() -> Self {
        Self {
            mode: ExchangeMode::Mock,
            base_url: "https://www.spot.im".to_string(),
            access_token: None,
            timeout_secs: 10,
            mock_latency_ms: 600,
        }
    }
}

impl ExchangeSettings {
    /// Build the configured exchange adapter.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::Config`] if the HTTP adapter cannot be built.
    pub fn build(&self, clock: Arc<dyn Clock>) -> Result<Arc<dyn BackendExchange>, ExchangeError> {
        match self.mode {
            ExchangeMode::Mock => Ok(Arc::new(MockBackendExchange::new(
                clock,
                Duration::from_millis(self.mock_latency_ms),
            ))),
            ExchangeMode::Http => {
                let token = self.access_token.as_deref().unwrap_or_default();
                Ok(Arc::new(ReqwestBackendExchange::new(
                    &self.base_url,
                    token,
                    Duration::from_secs(self.timeout_secs),
                )?))
            }
        }
    }
}

/// Coordinator settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoordinatorSettings {
    /// Upper bound for each SDK or backend call.
    pub step_timeout_secs: u64,
    /// Whether the SDK may ask for the login UI on its own.
    pub display_login_prompt: bool,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            step_timeout_secs: 30,
            display_login_prompt: true,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backend exchange.
    pub exchange: ExchangeSettings,
    /// User registered by the default SSO handshake.
    pub sso: SsoUser,
    /// Coordinator behavior.
    pub coordinator: CoordinatorSettings,
}

impl AppConfig {
    /// Load configuration from `path` (or `./parley.toml` if present) and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed, or if the HTTP exchange
    /// is selected without an access token.
    pub fn load(path: Option<&Path>) -> Result<Self, AppConfigError> {
        let file = match path {
            Some(path) => File::from(path),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config: Self = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("PARLEY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field requirements.
    ///
    /// # Errors
    ///
    /// Returns [`AppConfigError::MissingAccessToken`] when the HTTP exchange
    /// has no credential, and [`AppConfigError::ZeroTimeout`] when a timeout
    /// is zero.
    pub fn validate(&self) -> Result<(), AppConfigError> {
        if self.coordinator.step_timeout_secs == 0 {
            return Err(AppConfigError::ZeroTimeout("coordinator.step_timeout_secs"));
        }
        if self.exchange.timeout_secs == 0 {
            return Err(AppConfigError::ZeroTimeout("exchange.timeout_secs"));
        }

        let has_token = self
            .exchange
            .access_token
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty());
        if self.exchange.mode == ExchangeMode::Http && !has_token {
            return Err(AppConfigError::MissingAccessToken);
        }
        Ok(())
    }

    /// Coordinator configuration derived from these settings.
    #[must_use]
    pub fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            step_timeout: Duration::from_secs(self.coordinator.step_timeout_secs),
            display_login_prompt: self.coordinator.display_login_prompt,
            default_user: self.sso.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.exchange.mode, ExchangeMode::Mock);
        assert_eq!(config.sso, SsoUser::default());
        assert!(config.validate().is_ok());

        let coordinator = config.coordinator_config();
        assert_eq!(coordinator.step_timeout, Duration::from_secs(30));
        assert!(coordinator.display_login_prompt);
    }

    #[test]
    fn test_load_from_file() {
        let file = write_config(
            r#"
[exchange]
mode = "http"
base_url = "https://sso.example.com"
access_token = "from-file"
timeout_secs = 3

[sso]
primary_key = "key-7"
user_name = "Seven"

[coordinator]
step_timeout_secs = 12
display_login_prompt = false
"#,
        );

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.exchange.mode, ExchangeMode::Http);
        assert_eq!(config.exchange.access_token.as_deref(), Some("from-file"));
        assert_eq!(config.exchange.timeout_secs, 3);
        assert_eq!(config.exchange.mock_latency_ms, 600);
        assert_eq!(config.sso, SsoUser::new("key-7", "Seven").unwrap());

        let coordinator = config.coordinator_config();
        assert_eq!(coordinator.step_timeout, Duration::from_secs(12));
        assert!(!coordinator.display_login_prompt);
    }

    #[test]
    fn test_http_mode_requires_access_token() {
        let file = write_config("[exchange]\nmode = \"http\"\n");
        assert!(matches!(
            AppConfig::load(Some(file.path())),
            Err(AppConfigError::MissingAccessToken)
        ));
    }

    #[test]
    fn test_zero_timeouts_are_rejected() {
        let file = write_config("[coordinator]\nstep_timeout_secs = 0\n");
        assert!(matches!(
            AppConfig::load(Some(file.path())),
            Err(AppConfigError::ZeroTimeout("coordinator.step_timeout_secs"))
        ));

        let mut config = AppConfig::default();
        config.exchange.timeout_secs = 0;
        let error = config.validate().unwrap_err();
        assert_eq!(
            error.to_string(),
            "exchange.timeout_secs must be greater than zero"
        );
    }

    #[test]
    fn test_build_mock_exchange() {
        let settings = ExchangeSettings::default();
        assert!(settings.build(Arc::new(crate::SystemClock::new())).is_ok());
    }
}
