//! Parley Domain - Core authentication types
//!
//! This crate defines the domain model for the Parley SSO coordinator.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod error;
pub mod sso;

pub use auth::{AuthState, AuthStatus, SsoProvider, UserStatus};
pub use error::{DomainError, DomainResult};
pub use sso::{CodeA, CodeB, SsoUser, preview};
