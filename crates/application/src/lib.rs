//! Parley Application - Authentication coordinator and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for the identity SDK, the code exchange backend and the clock)
//! - The authentication coordinator that drives the SSO handshake
//! - Application-level error handling

pub mod auth;
pub mod error;
pub mod ports;

pub use auth::{AuthCoordinator, Completion, CoordinatorConfig};
pub use error::{AuthError, HandshakeStep};
pub use ports::{
    BackendExchange, Clock, ExchangeError, IdentitySdk, SdkError, SdkEvent, SdkEventReceiver,
};
