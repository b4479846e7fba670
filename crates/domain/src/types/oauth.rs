//! OAuth flow types: providers, integration kinds, exchange payloads

use serde::{Deserialize, Serialize};

use crate::errors::SlotbookError;

/// OAuth providers the connect flow supports.
///
/// Integration rows may carry provider tags outside this set (e.g. an
/// `apple` calendar synced from a device); this enum covers only the
/// providers the OAuth initiate/callback flow can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Google,
    Outlook,
    Zoom,
}

impl Provider {
    /// Human-readable provider name used in API messages.
    pub fn display_name(self) -> &'static str {
        match self {
            Provider::Google => "Google",
            Provider::Outlook => "Outlook",
            Provider::Zoom => "Zoom",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Google => write!(f, "google"),
            Provider::Outlook => write!(f, "outlook"),
            Provider::Zoom => write!(f, "zoom"),
        }
    }
}

impl std::str::FromStr for Provider {
    type Err = SlotbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(Provider::Google),
            "outlook" => Ok(Provider::Outlook),
            "zoom" => Ok(Provider::Zoom),
            other => Err(SlotbookError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Which kind of integration an OAuth flow is connecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationType {
    Calendar,
    Video,
}

impl std::fmt::Display for IntegrationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrationType::Calendar => write!(f, "calendar"),
            IntegrationType::Video => write!(f, "video"),
        }
    }
}

impl std::str::FromStr for IntegrationType {
    type Err = SlotbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "calendar" => Ok(IntegrationType::Calendar),
            "video" => Ok(IntegrationType::Video),
            other => {
                Err(SlotbookError::Validation(format!("unknown integration type: {other}")))
            }
        }
    }
}

/// Provider response to the authorization-code exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenExchange {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
}

/// Provider-side identity of the connected account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderIdentity {
    pub id: String,
    pub email: String,
}

/// Request body of `POST /integrations/oauth/initiate`.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthInitiateRequest {
    pub provider: String,
    pub integration_type: String,
    pub redirect_uri: String,
}

/// Response body of `POST /integrations/oauth/initiate`.
#[derive(Debug, Clone, Serialize)]
pub struct OAuthInitiateResponse {
    pub authorization_url: String,
    pub provider: String,
    pub integration_type: String,
    pub state: String,
}

/// Request body of `POST /integrations/oauth/callback`.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthCallbackRequest {
    pub provider: String,
    pub integration_type: String,
    pub code: String,
    pub state: Option<String>,
    pub redirect_uri: String,
}

/// Response body of `POST /integrations/oauth/callback`.
#[derive(Debug, Clone, Serialize)]
pub struct OAuthCallbackResponse {
    pub message: String,
    pub provider: String,
    pub integration_type: String,
    pub provider_email: String,
    pub created: bool,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn provider_parses_known_names() {
        assert_eq!(Provider::from_str("google").unwrap(), Provider::Google);
        assert_eq!(Provider::from_str("outlook").unwrap(), Provider::Outlook);
        assert_eq!(Provider::from_str("zoom").unwrap(), Provider::Zoom);
    }

    #[test]
    fn provider_rejects_unknown_names() {
        let err = Provider::from_str("slack").unwrap_err();
        assert!(matches!(err, SlotbookError::UnsupportedProvider(p) if p == "slack"));
    }

    #[test]
    fn provider_display_round_trips() {
        for provider in [Provider::Google, Provider::Outlook, Provider::Zoom] {
            assert_eq!(Provider::from_str(&provider.to_string()).unwrap(), provider);
        }
    }
}
