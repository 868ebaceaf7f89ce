//! Third-party identity providers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Identity providers whose tokens the SDK can exchange directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SsoProvider {
    /// Janrain.
    Janrain,
    /// Gigya.
    Gigya,
    /// Piano.
    Piano,
    /// Auth0.
    Auth0,
}

impl SsoProvider {
    /// Every supported provider, in display order.
    pub const ALL: [Self; 4] = [Self::Janrain, Self::Gigya, Self::Piano, Self::Auth0];

    /// Wire tag understood by the SDK.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Janrain => "janrain",
            Self::Gigya => "gigya",
            Self::Piano => "piano",
            Self::Auth0 => "auth0",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Janrain => "Janrain",
            Self::Gigya => "Gigya",
            Self::Piano => "Piano",
            Self::Auth0 => "Auth0",
        }
    }
}

impl fmt::Display for SsoProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for SsoProvider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.tag().eq_ignore_ascii_case(tag))
            .ok_or_else(|| DomainError::UnknownProvider(tag.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider_tags() {
        assert_eq!("janrain".parse::<SsoProvider>(), Ok(SsoProvider::Janrain));
        assert_eq!(" Auth0 ".parse::<SsoProvider>(), Ok(SsoProvider::Auth0));
        assert_eq!(
            "okta".parse::<SsoProvider>(),
            Err(DomainError::UnknownProvider("okta".to_string()))
        );
    }

    #[test]
    fn test_display_round_trips_tag() {
        for provider in SsoProvider::ALL {
            assert_eq!(provider.to_string().parse::<SsoProvider>(), Ok(provider));
        }
    }
}
