//! Simulated code exchange backend.
//!
//! Stands in for the real backend during local development: waits a little,
//! then hands back a fabricated codeB. A real identity SDK rejects these
//! codes, so end-to-end logins need the HTTP exchange or provider SSO.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parley_application::{BackendExchange, Clock, ExchangeError};
use parley_domain::{CodeA, CodeB, SsoUser};
use tracing::info;

/// Latency the simulated backend waits before answering.
pub const DEFAULT_MOCK_LATENCY: Duration = Duration::from_millis(600);

/// Backend exchange that fabricates `mock_codeB_<millis>` codes.
pub struct MockBackendExchange {
    clock: Arc<dyn Clock>,
    latency: Duration,
}

impl MockBackendExchange {
    /// Create a mock exchange answering after `latency`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, latency: Duration) -> Self {
        Self { clock, latency }
    }
}

#[async_trait]
impl BackendExchange for MockBackendExchange {
    async fn exchange(&self, code_a: &CodeA, user: &SsoUser) -> Result<CodeB, ExchangeError> {
        info!(
            code_a = %code_a.preview(),
            primary_key = %user.primary_key,
            "mock backend exchanging codeA"
        );
        tokio::time::sleep(self.latency).await;

        let code_b = CodeB::new(format!("mock_codeB_{}", self.clock.now().timestamp_millis()));
        info!(code_b = %code_b.preview(), "mock backend issued codeB");
        Ok(code_b)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_exchange_stamps_code_with_clock() {
        let clock = FixedClock(Utc.timestamp_millis_opt(1_700_000_000_123).unwrap());
        let exchange = MockBackendExchange::new(Arc::new(clock), DEFAULT_MOCK_LATENCY);

        let started = tokio::time::Instant::now();
        let code_b = exchange
            .exchange(&CodeA::new("codeA_1"), &SsoUser::default())
            .await
            .unwrap();

        assert_eq!(code_b.as_str(), "mock_codeB_1700000000123");
        assert!(started.elapsed() >= DEFAULT_MOCK_LATENCY);
    }
}
