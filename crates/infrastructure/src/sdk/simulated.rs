//! In-process identity SDK.
//!
//! Issues codeA values, accepts any non-blank codeB for an outstanding
//! handshake, keeps one session, and lets the host trigger the two SDK
//! requests (login UI, silent renewal) on demand.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use parley_application::{Completion, IdentitySdk, SdkError, SdkEvent, SdkEventReceiver};
use parley_domain::{CodeA, CodeB, SsoProvider, UserStatus};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Default)]
struct Session {
    /// codeA values issued and not yet consumed.
    issued: HashSet<String>,
    user_id: Option<String>,
    offline: bool,
}

/// Identity SDK simulated in process.
#[derive(Debug, Default)]
pub struct SimulatedIdentitySdk {
    session: Mutex<Session>,
    display_login_prompt: AtomicBool,
    events: Mutex<Option<mpsc::UnboundedSender<SdkEvent>>>,
}

impl SimulatedIdentitySdk {
    /// Create an SDK with a guest session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an SDK that already holds a session for `user_id`.
    #[must_use]
    pub fn logged_in(user_id: impl Into<String>) -> Self {
        let sdk = Self::default();
        sdk.session().user_id = Some(user_id.into());
        sdk
    }

    /// Make every call fail as if the identity service were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.session().offline = offline;
    }

    /// Ask the host to show its login UI, as the SDK does when a guest tries
    /// to interact.
    ///
    /// The returned receiver resolves when the host completes the flow.
    ///
    /// # Errors
    ///
    /// Fails if the login prompt is disabled or nobody is subscribed.
    pub fn request_authentication_flow(&self) -> Result<oneshot::Receiver<()>, SdkError> {
        if !self.display_login_prompt.load(Ordering::SeqCst) {
            return Err(SdkError::new("login prompt is disabled"));
        }
        let (completion, done) = Completion::channel();
        self.emit(SdkEvent::DisplayAuthenticationFlow { completion })?;
        Ok(done)
    }

    /// Ask the host to renew the current session silently.
    ///
    /// # Errors
    ///
    /// Fails if there is no session to renew or nobody is subscribed.
    pub fn request_renewal(&self) -> Result<oneshot::Receiver<()>, SdkError> {
        let user_id = self
            .session()
            .user_id
            .clone()
            .ok_or_else(|| SdkError::new("no session to renew"))?;
        let (completion, done) = Completion::channel();
        self.emit(SdkEvent::RenewSso {
            user_id,
            completion,
        })?;
        Ok(done)
    }

    fn emit(&self, event: SdkEvent) -> Result<(), SdkError> {
        let events = self
            .events
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let sender = events
            .as_ref()
            .ok_or_else(|| SdkError::new("no event subscriber"))?;
        sender
            .send(event)
            .map_err(|_| SdkError::new("event subscriber dropped"))
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Session guard that fails while offline.
    fn online_session(&self) -> Result<MutexGuard<'_, Session>, SdkError> {
        let session = self.session();
        if session.offline {
            return Err(SdkError::new("identity service unreachable"));
        }
        Ok(session)
    }
}

#[async_trait]
impl IdentitySdk for SimulatedIdentitySdk {
    async fn start_sso(&self) -> Result<CodeA, SdkError> {
        let mut session = self.online_session()?;
        let code_a = format!("codeA_{}", Uuid::now_v7().simple());
        session.issued.insert(code_a.clone());
        debug!(code_a = %parley_domain::preview(&code_a), "issued codeA");
        Ok(CodeA::new(code_a))
    }

    async fn complete_sso(&self, code_b: &CodeB) -> Result<String, SdkError> {
        let mut session = self.online_session()?;
        if code_b.as_str().trim().is_empty() {
            return Err(SdkError::new("codeB is required"));
        }
        if session.issued.is_empty() {
            return Err(SdkError::new("no SSO handshake in progress"));
        }
        session.issued.clear();

        let user_id = format!("sso_{}", Uuid::now_v7().simple());
        session.user_id = Some(user_id.clone());
        info!(%user_id, "SSO session established");
        Ok(user_id)
    }

    async fn sso_using_provider(
        &self,
        provider: SsoProvider,
        token: &str,
    ) -> Result<String, SdkError> {
        let mut session = self.online_session()?;
        if token.trim().is_empty() {
            return Err(SdkError::new(format!("invalid {} token", provider.label())));
        }

        let user_id = format!("{}_{}", provider.tag(), Uuid::now_v7().simple());
        session.user_id = Some(user_id.clone());
        info!(%provider, %user_id, "provider session established");
        Ok(user_id)
    }

    async fn get_user_status(&self) -> Result<UserStatus, SdkError> {
        let session = self.online_session()?;
        Ok(session
            .user_id
            .clone()
            .map_or(UserStatus::Guest, |user_id| UserStatus::SsoLoggedIn { user_id }))
    }

    async fn logout(&self) -> Result<(), SdkError> {
        let mut session = self.online_session()?;
        session.user_id = None;
        session.issued.clear();
        Ok(())
    }

    fn subscribe(&self) -> SdkEventReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.events.lock().unwrap_or_else(PoisonError::into_inner) = Some(tx);
        rx
    }

    fn set_should_display_login_prompt(&self, value: bool) {
        self.display_login_prompt.store(value, Ordering::SeqCst);
    }

    fn should_display_login_prompt(&self) -> bool {
        self.display_login_prompt.load(Ordering::SeqCst)
    }
}
