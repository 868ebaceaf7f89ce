//! Authentication module for Parley.
//!
//! This module provides:
//! - The coordinator that owns `AuthState` and drives the SSO handshake
//! - One-shot completion callbacks handed over by the identity SDK
//! - Coordinator configuration

mod completion;
mod config;
mod coordinator;

pub use completion::Completion;
pub use config::CoordinatorConfig;
pub use coordinator::AuthCoordinator;
