//! SSO handshake values
//!
//! `codeA` and `codeB` are opaque single-use tokens. Their structure is owned
//! by the identity SDK and the exchange backend; this crate only carries them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{DomainError, DomainResult};

/// Shorten a secret-ish value for logs (first 8 chars + ...).
#[must_use]
pub fn preview(value: &str) -> String {
    if value.chars().count() > 12 {
        let head: String = value.chars().take(8).collect();
        format!("{head}...")
    } else {
        value.to_string()
    }
}

/// Code issued by the identity SDK when a handshake starts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodeA(String);

/// Code issued by the backend in exchange for a [`CodeA`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodeB(String);

macro_rules! opaque_code {
    ($ty:ident) => {
        impl $ty {
            /// Wrap a raw code.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Raw code value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Log-safe preview of the code.
            #[must_use]
            pub fn preview(&self) -> String {
                preview(&self.0)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $ty {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

opaque_code!(CodeA);
opaque_code!(CodeB);

/// Identity the backend registers when exchanging a code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SsoUser {
    /// Stable key of the user in the first-party system.
    pub primary_key: String,
    /// Display name shown next to comments.
    pub user_name: String,
}

impl SsoUser {
    /// Creates a user, rejecting blank fields.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidIdentifier`] when either field is blank.
    pub fn new(primary_key: impl Into<String>, user_name: impl Into<String>) -> DomainResult<Self> {
        let primary_key = primary_key.into();
        let user_name = user_name.into();
        if primary_key.trim().is_empty() {
            return Err(DomainError::InvalidIdentifier("primary key is empty".to_string()));
        }
        if user_name.trim().is_empty() {
            return Err(DomainError::InvalidIdentifier("user name is empty".to_string()));
        }
        Ok(Self {
            primary_key,
            user_name,
        })
    }

    /// Demo accounts offered by the login modal.
    #[must_use]
    pub fn test_users() -> Vec<Self> {
        [
            ("demo-user-1", "Demo User One"),
            ("demo-user-2", "Demo User Two"),
            ("demo-user-3", "Demo User Three"),
        ]
        .into_iter()
        .map(|(primary_key, user_name)| Self {
            primary_key: primary_key.to_string(),
            user_name: user_name.to_string(),
        })
        .collect()
    }
}

impl Default for SsoUser {
    fn default() -> Self {
        Self {
            primary_key: "demo-user-1".to_string(),
            user_name: "Demo User One".to_string(),
        }
    }
}

impl fmt::Display for SsoUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.user_name, self.primary_key)
    }
}
