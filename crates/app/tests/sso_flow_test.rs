//! End-to-end tests for the SSO login flow.
//!
//! These tests wire the coordinator to the simulated identity SDK and to
//! real exchange adapters (mock backend, or reqwest against a wiremock
//! server) and drive it the way the login UI does.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use parley_application::{
    AuthCoordinator, BackendExchange, CoordinatorConfig, IdentitySdk,
};
use parley_domain::{AuthState, AuthStatus, SsoProvider, UserStatus};
use parley_infrastructure::{
    MockBackendExchange, ReqwestBackendExchange, SimulatedIdentitySdk, SystemClock,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_exchange() -> Arc<dyn BackendExchange> {
    Arc::new(MockBackendExchange::new(
        Arc::new(SystemClock::new()),
        Duration::from_millis(10),
    ))
}

fn wire(
    sdk: &Arc<SimulatedIdentitySdk>,
    exchange: Arc<dyn BackendExchange>,
) -> Arc<AuthCoordinator> {
    Arc::new(AuthCoordinator::new(
        Arc::clone(sdk) as Arc<dyn IdentitySdk>,
        exchange,
        CoordinatorConfig::default().with_step_timeout(Duration::from_secs(5)),
    ))
}

fn assert_consistent(state: &AuthState) {
    assert_eq!(
        state.user_id().is_some(),
        state.status() == AuthStatus::Authenticated
    );
}

#[tokio::test]
async fn test_handshake_with_mock_backend() {
    let sdk = Arc::new(SimulatedIdentitySdk::new());
    let coordinator = wire(&sdk, mock_exchange());

    let listener = coordinator.start().await;
    assert_eq!(coordinator.state(), AuthState::guest());
    assert!(sdk.should_display_login_prompt());

    assert!(coordinator.authenticate().await);
    let state = coordinator.state();
    assert_consistent(&state);
    assert_eq!(state.status(), AuthStatus::Authenticated);
    assert!(!state.is_loading());

    let user_id = state.user_id().unwrap().to_string();
    assert!(user_id.starts_with("sso_"));
    assert_eq!(
        sdk.get_user_status().await.unwrap(),
        UserStatus::SsoLoggedIn { user_id }
    );

    coordinator.logout().await;
    assert_eq!(coordinator.state(), AuthState::guest());
    assert_eq!(sdk.get_user_status().await.unwrap(), UserStatus::Guest);

    listener.abort();
}

#[tokio::test]
async fn test_handshake_with_http_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sso/v1/register-user"))
        .and(query_param("access_token", "backend-secret"))
        .and(query_param("user_name", "Demo User One"))
        .respond_with(ResponseTemplate::new(200).set_body_string("codeB-from-backend"))
        .expect(1)
        .mount(&server)
        .await;

    let sdk = Arc::new(SimulatedIdentitySdk::new());
    let exchange = ReqwestBackendExchange::new(
        &server.uri(),
        "backend-secret",
        Duration::from_secs(5),
    )
    .unwrap();
    let coordinator = wire(&sdk, Arc::new(exchange));
    coordinator.refresh_status().await;

    assert!(coordinator.authenticate().await);
    assert!(coordinator.state().is_authenticated());
}

#[tokio::test]
async fn test_backend_rejection_surfaces_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sso/v1/register-user"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let sdk = Arc::new(SimulatedIdentitySdk::new());
    let exchange =
        ReqwestBackendExchange::new(&server.uri(), "wrong", Duration::from_secs(5)).unwrap();
    let coordinator = wire(&sdk, Arc::new(exchange));
    coordinator.refresh_status().await;

    assert!(!coordinator.authenticate().await);
    let state = coordinator.state();
    assert_eq!(state.status(), AuthStatus::Guest);
    assert!(!state.is_loading());
    assert_eq!(state.error(), Some("SSO API error 403: forbidden"));
    assert_consistent(&state);
}

#[tokio::test]
async fn test_sdk_login_request_resolved_by_dismissal() {
    let sdk = Arc::new(SimulatedIdentitySdk::new());
    let coordinator = wire(&sdk, mock_exchange());
    let listener = coordinator.start().await;

    let done = sdk.request_authentication_flow().unwrap();
    let mut modal = coordinator.subscribe_auth_modal();
    modal.wait_for(|shown| *shown).await.unwrap();
    assert!(coordinator.has_pending_completion());

    coordinator.set_show_auth_modal(false);
    assert!(done.await.is_ok());
    assert!(!coordinator.has_pending_completion());
    assert_eq!(coordinator.state(), AuthState::guest());

    listener.abort();
}

#[tokio::test]
async fn test_sdk_login_request_resolved_by_provider_login() {
    let sdk = Arc::new(SimulatedIdentitySdk::new());
    let coordinator = wire(&sdk, mock_exchange());
    let listener = coordinator.start().await;

    let done = sdk.request_authentication_flow().unwrap();
    let mut modal = coordinator.subscribe_auth_modal();
    modal.wait_for(|shown| *shown).await.unwrap();

    assert!(
        coordinator
            .authenticate_with_provider(SsoProvider::Janrain, "janrain-token")
            .await
    );
    assert!(done.await.is_ok());
    assert!(coordinator.state().user_id().unwrap().starts_with("janrain_"));

    listener.abort();
}

#[tokio::test]
async fn test_provider_rejection_is_surfaced() {
    let sdk = Arc::new(SimulatedIdentitySdk::new());
    let coordinator = wire(&sdk, mock_exchange());
    coordinator.refresh_status().await;

    assert!(
        !coordinator
            .authenticate_with_provider(SsoProvider::Auth0, "")
            .await
    );
    let state = coordinator.state();
    assert_eq!(state.status(), AuthStatus::Guest);
    assert_eq!(state.error(), Some("invalid Auth0 token"));
}

#[tokio::test]
async fn test_silent_renewal_leaves_state_alone() {
    let sdk = Arc::new(SimulatedIdentitySdk::logged_in("user_42"));
    let coordinator = wire(&sdk, mock_exchange());
    let listener = coordinator.start().await;
    assert_eq!(coordinator.state(), AuthState::authenticated("user_42"));

    let done = sdk.request_renewal().unwrap();
    assert!(done.await.is_ok());
    assert_eq!(coordinator.state(), AuthState::authenticated("user_42"));
    assert!(!coordinator.show_auth_modal());

    listener.abort();
}

#[tokio::test]
async fn test_failed_renewal_still_completes() {
    let sdk = Arc::new(SimulatedIdentitySdk::logged_in("user_42"));
    let coordinator = wire(&sdk, mock_exchange());
    let listener = coordinator.start().await;

    // Queue the request first; the SDK refuses calls once offline.
    let done = sdk.request_renewal().unwrap();
    sdk.set_offline(true);
    assert!(done.await.is_ok());
    assert_eq!(coordinator.state(), AuthState::authenticated("user_42"));

    listener.abort();
}

#[tokio::test]
async fn test_unreachable_sdk_starts_unknown() {
    let sdk = Arc::new(SimulatedIdentitySdk::new());
    sdk.set_offline(true);
    let coordinator = wire(&sdk, mock_exchange());

    let listener = coordinator.start().await;
    let state = coordinator.state();
    assert_eq!(state.status(), AuthStatus::Unknown);
    assert!(state.error().is_none());

    listener.abort();
}
