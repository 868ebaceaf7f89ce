//! Authentication domain types

mod provider;
mod types;

pub use provider::SsoProvider;
pub use types::{AuthState, AuthStatus, UserStatus};
