//! Authentication coordinator.
//!
//! Owns the single [`AuthState`] snapshot and sequences the calls that move
//! it: the three-step SSO handshake (codeA → backend exchange → codeB),
//! provider SSO, logout, and status refresh. It also answers the two
//! requests the identity SDK pushes: show the login UI, and renew silently.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use parley_domain::{AuthState, AuthStatus, SsoProvider, SsoUser};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::completion::{Completion, PendingCompletion};
use super::config::CoordinatorConfig;
use crate::error::{AuthError, AuthResult, HandshakeStep};
use crate::ports::{BackendExchange, IdentitySdk, SdkEvent, SdkEventReceiver};

/// Coordinates authentication between the UI, the identity SDK and the
/// code exchange backend.
///
/// Operations that start while another authenticate or logout call is in
/// flight are rejected without touching the state.
pub struct AuthCoordinator {
    sdk: Arc<dyn IdentitySdk>,
    exchange: Arc<dyn BackendExchange>,
    config: CoordinatorConfig,
    state: watch::Sender<AuthState>,
    auth_modal: watch::Sender<bool>,
    pending: Mutex<PendingCompletion>,
    /// User registered by the last successful handshake; renewals reuse it.
    last_user: Mutex<SsoUser>,
}

impl AuthCoordinator {
    /// Create a coordinator in the `Unknown` state.
    #[must_use]
    pub fn new(
        sdk: Arc<dyn IdentitySdk>,
        exchange: Arc<dyn BackendExchange>,
        config: CoordinatorConfig,
    ) -> Self {
        let last_user = Mutex::new(config.default_user.clone());
        Self {
            sdk,
            exchange,
            config,
            state: watch::Sender::new(AuthState::unknown()),
            auth_modal: watch::Sender::new(false),
            pending: Mutex::new(PendingCompletion::None),
            last_user,
        }
    }

    /// Push the login prompt flag, subscribe to SDK events and run the
    /// initial status refresh.
    ///
    /// Aborting the returned handle unsubscribes from SDK events.
    pub async fn start(self: &Arc<Self>) -> JoinHandle<()> {
        self.sdk
            .set_should_display_login_prompt(self.config.display_login_prompt);
        let listener = self.spawn_event_listener(self.sdk.subscribe());
        let status = self.refresh_status().await;
        info!(status = status.label(), "authentication coordinator started");
        listener
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Watch state snapshots as they are replaced.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Whether the login UI should be visible.
    #[must_use]
    pub fn show_auth_modal(&self) -> bool {
        *self.auth_modal.borrow()
    }

    /// Watch login UI visibility.
    #[must_use]
    pub fn subscribe_auth_modal(&self) -> watch::Receiver<bool> {
        self.auth_modal.subscribe()
    }

    /// Show or hide the login UI.
    ///
    /// Hiding it resolves any login flow the SDK is still waiting on, whether
    /// or not the user logged in.
    pub fn set_show_auth_modal(&self, show: bool) {
        self.auth_modal.send_replace(show);
        if !show {
            self.complete_auth_flow();
        }
    }

    /// Whether the SDK is waiting for the login UI to finish.
    #[must_use]
    pub fn has_pending_completion(&self) -> bool {
        lock(&self.pending).is_awaiting()
    }

    /// Run the SSO handshake for the configured default user.
    ///
    /// Returns true only if the user ended up authenticated.
    pub async fn authenticate(&self) -> bool {
        let user = self.config.default_user.clone();
        self.authenticate_as(&user).await
    }

    /// Run the SSO handshake, registering `user` with the backend.
    pub async fn authenticate_as(&self, user: &SsoUser) -> bool {
        let Some(operation) = self.begin_operation("authenticate") else {
            return false;
        };
        info!(primary_key = %user.primary_key, "starting SSO handshake");

        let result = self.run_handshake(user).await;
        if result.is_ok() {
            *lock(&self.last_user) = user.clone();
        }
        self.finish_login(operation, result, "SSO authentication failed")
    }

    /// Log in with a token issued by a third-party provider.
    ///
    /// The token is passed through untouched; callers reject blank tokens.
    pub async fn authenticate_with_provider(&self, provider: SsoProvider, token: &str) -> bool {
        let Some(operation) = self.begin_operation("authenticate_with_provider") else {
            return false;
        };
        info!(%provider, "starting provider SSO");

        let result = self
            .step(
                HandshakeStep::ProviderSso,
                self.sdk.sso_using_provider(provider, token),
            )
            .await;
        self.finish_login(operation, result, "Provider authentication failed")
    }

    /// End the SDK session.
    ///
    /// On failure the user stays authenticated and the error is surfaced.
    pub async fn logout(&self) {
        let Some(operation) = self.begin_operation("logout") else {
            return;
        };
        info!("logging out");

        match self.step(HandshakeStep::Logout, self.sdk.logout()).await {
            Ok(()) => {
                info!("logged out");
                self.state.send_replace(AuthState::guest());
            }
            Err(e) => self.fail(&e, "Logout failed"),
        }
        operation.disarm();
    }

    /// Re-read the user status from the SDK.
    ///
    /// Never fails: an unreadable or unrecognized status maps to `Unknown`.
    pub async fn refresh_status(&self) -> AuthStatus {
        let next = match self
            .step(HandshakeStep::UserStatus, self.sdk.get_user_status())
            .await
        {
            Ok(status) => {
                debug!(?status, "user status");
                AuthState::from(status)
            }
            Err(e) => {
                warn!(error = %e, "user status query failed");
                AuthState::unknown()
            }
        };

        let status = next.status();
        self.state.send_modify(|state| {
            // Keep the busy flag of an operation still in flight.
            *state = if state.is_loading() {
                next.loading()
            } else {
                next
            };
        });
        status
    }

    /// Drain SDK events on a background task.
    pub fn spawn_event_listener(self: &Arc<Self>, mut events: SdkEventReceiver) -> JoinHandle<()> {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                coordinator.handle_event(event);
            }
            debug!("SDK event stream closed");
        })
    }

    /// Dispatch one SDK event. Renewals run on their own task.
    pub fn handle_event(self: &Arc<Self>, event: SdkEvent) {
        match event {
            SdkEvent::DisplayAuthenticationFlow { completion } => {
                self.on_display_auth_flow(completion);
            }
            SdkEvent::RenewSso {
                user_id,
                completion,
            } => {
                let coordinator = Arc::clone(self);
                tokio::spawn(async move {
                    coordinator.on_renew_sso(&user_id, completion).await;
                });
            }
        }
    }

    /// The SDK asked for the login UI.
    pub fn on_display_auth_flow(&self, completion: Completion) {
        info!("SDK requested the authentication flow");
        let displaced = lock(&self.pending).replace(completion);
        if let Some(previous) = displaced {
            warn!("authentication flow requested while another was pending, completing the older one");
            previous.complete();
        }
        self.auth_modal.send_replace(true);
    }

    /// The SDK asked for a silent renewal.
    ///
    /// Leaves the state alone and always invokes `completion`.
    pub async fn on_renew_sso(&self, user_id: &str, completion: Completion) {
        info!(user_id, "SDK requested SSO renewal");
        let user = lock(&self.last_user).clone();

        match self.run_handshake(&user).await {
            Ok(renewed) => info!(user_id = %renewed, "SSO renewal complete"),
            Err(e) => error!(error = %e, "SSO renewal failed"),
        }
        completion.complete();
    }

    async fn run_handshake(&self, user: &SsoUser) -> AuthResult<String> {
        let code_a = self
            .step(HandshakeStep::StartSso, self.sdk.start_sso())
            .await?;
        debug!(code_a = %code_a.preview(), "received codeA");

        let code_b = self
            .step(HandshakeStep::Exchange, self.exchange.exchange(&code_a, user))
            .await?;
        debug!(code_b = %code_b.preview(), "received codeB");

        self.step(HandshakeStep::CompleteSso, self.sdk.complete_sso(&code_b))
            .await
    }

    /// Run one external call under the step timeout.
    async fn step<T, E>(
        &self,
        step: HandshakeStep,
        call: impl Future<Output = Result<T, E>> + Send,
    ) -> AuthResult<T>
    where
        AuthError: From<E>,
    {
        let after = self.config.step_timeout;
        match tokio::time::timeout(after, call).await {
            Ok(result) => result.map_err(AuthError::from),
            Err(_) => Err(AuthError::Timeout { step, after }),
        }
    }

    /// Atomically check the busy flag and mark an operation as started.
    fn begin_operation(&self, operation: &'static str) -> Option<OperationGuard<'_>> {
        match self.try_begin() {
            Ok(guard) => Some(guard),
            Err(e) => {
                warn!(operation, error = %e, "operation rejected");
                None
            }
        }
    }

    fn try_begin(&self) -> AuthResult<OperationGuard<'_>> {
        let started = self.state.send_if_modified(|state| {
            if state.is_loading() {
                return false;
            }
            *state = std::mem::take(state).loading();
            true
        });
        if started {
            Ok(OperationGuard {
                state: &self.state,
                armed: true,
            })
        } else {
            Err(AuthError::Busy)
        }
    }

    fn finish_login(
        &self,
        operation: OperationGuard<'_>,
        result: AuthResult<String>,
        fallback: &str,
    ) -> bool {
        let authenticated = match result {
            Ok(user_id) => {
                info!(%user_id, "authenticated");
                self.state.send_replace(AuthState::authenticated(user_id));
                self.complete_auth_flow();
                true
            }
            Err(e) => {
                self.fail(&e, fallback);
                false
            }
        };
        operation.disarm();
        authenticated
    }

    fn fail(&self, error: &AuthError, fallback: &str) {
        let mut message = error.to_string();
        if message.trim().is_empty() {
            fallback.clone_into(&mut message);
        }
        error!(error = %message, "authentication operation failed");
        self.state
            .send_modify(|state| *state = std::mem::take(state).failed(message));
    }

    fn complete_auth_flow(&self) {
        let pending = lock(&self.pending).take();
        if let Some(completion) = pending {
            debug!("completing SDK authentication flow");
            completion.complete();
        }
    }
}

/// Busy flag held by an in-flight operation.
///
/// Dropped without [`OperationGuard::disarm`] (the caller's future was
/// cancelled), it clears `is_loading` so later operations are accepted.
struct OperationGuard<'a> {
    state: &'a watch::Sender<AuthState>,
    armed: bool,
}

impl OperationGuard<'_> {
    /// The operation wrote its final state.
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!("operation cancelled before completion");
            self.state
                .send_modify(|state| *state = std::mem::take(state).settled());
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
