//! Backend exchange over HTTP using reqwest.
//!
//! Calls the SSO register endpoint with the codeA and the user to register,
//! and reads the codeB back as plain text.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use parley_application::{BackendExchange, ExchangeError};
use parley_domain::{CodeA, CodeB, SsoUser};
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

/// Path of the register endpoint, relative to the base URL.
pub const REGISTER_USER_PATH: &str = "sso/v1/register-user";

/// HTTP implementation of the [`BackendExchange`] port.
///
/// The access token is the long-lived backend credential. It comes from
/// configuration and should only be present where the exchange runs
/// server-side.
pub struct ReqwestBackendExchange {
    client: Client,
    endpoint: Url,
    access_token: String,
}

impl std::fmt::Debug for ReqwestBackendExchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestBackendExchange")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl ReqwestBackendExchange {
    /// Creates an exchange client.
    ///
    /// Default configuration:
    /// - Request timeout: `timeout`
    /// - User-Agent: "Parley/<version>"
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::Config`] if the base URL is invalid, the
    /// access token is blank, or the client cannot be created.
    pub fn new(
        base_url: &str,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ExchangeError> {
        let client = Client::builder()
            .user_agent(concat!("Parley/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| ExchangeError::Config(e.to_string()))?;

        Self::with_client(client, base_url, access_token)
    }

    /// Creates an exchange client around a custom reqwest client.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::Config`] if the base URL is invalid or the
    /// access token is blank.
    pub fn with_client(
        client: Client,
        base_url: &str,
        access_token: impl Into<String>,
    ) -> Result<Self, ExchangeError> {
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return Err(ExchangeError::Config("access token is empty".to_string()));
        }

        Ok(Self {
            client,
            endpoint: Self::endpoint(base_url)?,
            access_token,
        })
    }

    /// Resolve the register endpoint under `base_url`.
    fn endpoint(base_url: &str) -> Result<Url, ExchangeError> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Url::parse(&base)
            .and_then(|url| url.join(REGISTER_USER_PATH))
            .map_err(|e| ExchangeError::Config(format!("invalid base URL {base_url}: {e}")))
    }

    /// Full request URL for one exchange.
    fn request_url(&self, code_a: &CodeA, user: &SsoUser) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("access_token", &self.access_token)
            .append_pair("code_a", code_a.as_str())
            .append_pair("primary_key", &user.primary_key)
            .append_pair("user_name", &user.user_name);
        url
    }

    /// Maps reqwest errors to [`ExchangeError`].
    fn map_error(error: &reqwest::Error) -> ExchangeError {
        if error.is_timeout() {
            return ExchangeError::Network(format!("request timed out: {error}"));
        }
        if error.is_connect() {
            return ExchangeError::Network(format!("connection failed: {error}"));
        }
        ExchangeError::Network(error.to_string())
    }
}

#[async_trait]
impl BackendExchange for ReqwestBackendExchange {
    async fn exchange(&self, code_a: &CodeA, user: &SsoUser) -> Result<CodeB, ExchangeError> {
        debug!(
            endpoint = %self.endpoint,
            code_a = %code_a.preview(),
            primary_key = %user.primary_key,
            "requesting codeB"
        );
        let start = Instant::now();

        let response = self
            .client
            .get(self.request_url(code_a, user))
            .send()
            .await
            .map_err(|e| Self::map_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| {
                debug!(error = %e, "failed to read error response body");
                String::new()
            });
            warn!(status = status.as_u16(), %body, "SSO exchange rejected");
            return Err(ExchangeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ExchangeError::InvalidResponse(format!("failed to read body: {e}")))?;
        let code_b = body.trim();
        if code_b.is_empty() {
            return Err(ExchangeError::InvalidResponse(
                "response body is empty".to_string(),
            ));
        }

        debug!(elapsed_ms = start.elapsed().as_millis(), "received codeB");
        Ok(CodeB::new(code_b))
    }
}
