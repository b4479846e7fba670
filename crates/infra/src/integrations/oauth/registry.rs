//! Provider descriptor table
//!
//! Each supported provider is described once; the descriptor is selected
//! per request and reused for authorize-URL building, token exchange, and
//! identity fetch. The per-provider differences below are contracts, not
//! defaults: google needs `access_type=offline&prompt=consent` to issue a
//! refresh token, outlook embeds the directory tenant in its endpoint
//! paths, and zoom's authorize URL must not carry a `scope` parameter.

use slotbook_domain::{IntegrationType, Provider, ProvidersConfig};

/// Endpoints, credentials, and authorize-URL contract for one provider.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub provider: Provider,
    pub client_id: String,
    pub client_secret: String,
    pub authorize_endpoint: String,
    pub token_endpoint: String,
    pub userinfo_endpoint: String,
    pub calendar_scopes: Vec<String>,
    pub video_scopes: Vec<String>,
    pub extra_authorize_params: Vec<(String, String)>,
    pub send_scope_in_authorize: bool,
}

impl ProviderSettings {
    /// Google settings with production endpoints.
    pub fn google(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            provider: Provider::Google,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            authorize_endpoint: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_endpoint: "https://oauth2.googleapis.com/token".to_string(),
            userinfo_endpoint: "https://www.googleapis.com/oauth2/v2/userinfo".to_string(),
            calendar_scopes: vec![
                "https://www.googleapis.com/auth/calendar".to_string(),
                "https://www.googleapis.com/auth/userinfo.email".to_string(),
                "https://www.googleapis.com/auth/userinfo.profile".to_string(),
            ],
            video_scopes: vec![
                "https://www.googleapis.com/auth/calendar.events".to_string(),
                "https://www.googleapis.com/auth/userinfo.email".to_string(),
            ],
            extra_authorize_params: vec![
                ("access_type".to_string(), "offline".to_string()),
                ("prompt".to_string(), "consent".to_string()),
            ],
            send_scope_in_authorize: true,
        }
    }

    /// Microsoft settings; endpoints are scoped to the given tenant.
    pub fn outlook(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        tenant_id: &str,
    ) -> Self {
        Self {
            provider: Provider::Outlook,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            authorize_endpoint: format!(
                "https://login.microsoftonline.com/{tenant_id}/oauth2/v2.0/authorize"
            ),
            token_endpoint: format!(
                "https://login.microsoftonline.com/{tenant_id}/oauth2/v2.0/token"
            ),
            userinfo_endpoint: "https://graph.microsoft.com/v1.0/me".to_string(),
            calendar_scopes: vec![
                "openid".to_string(),
                "email".to_string(),
                "offline_access".to_string(),
                "https://graph.microsoft.com/Calendars.ReadWrite".to_string(),
                "https://graph.microsoft.com/User.Read".to_string(),
            ],
            video_scopes: vec![
                "openid".to_string(),
                "email".to_string(),
                "offline_access".to_string(),
                "https://graph.microsoft.com/OnlineMeetings.ReadWrite".to_string(),
                "https://graph.microsoft.com/User.Read".to_string(),
            ],
            extra_authorize_params: Vec::new(),
            send_scope_in_authorize: true,
        }
    }

    /// Zoom settings. Zoom scopes are fixed on the app registration, so
    /// the authorize URL carries none.
    pub fn zoom(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            provider: Provider::Zoom,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            authorize_endpoint: "https://zoom.us/oauth/authorize".to_string(),
            token_endpoint: "https://zoom.us/oauth/token".to_string(),
            userinfo_endpoint: "https://api.zoom.us/v2/users/me".to_string(),
            calendar_scopes: Vec::new(),
            video_scopes: Vec::new(),
            extra_authorize_params: Vec::new(),
            send_scope_in_authorize: false,
        }
    }

    /// Scope set for the given integration kind.
    pub fn scopes_for(&self, integration_type: IntegrationType) -> &[String] {
        match integration_type {
            IntegrationType::Calendar => &self.calendar_scopes,
            IntegrationType::Video => &self.video_scopes,
        }
    }
}

/// Static provider table, built once at startup from configuration.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    google: ProviderSettings,
    outlook: ProviderSettings,
    zoom: ProviderSettings,
}

impl ProviderRegistry {
    /// Build the registry from application config with production endpoints.
    pub fn from_config(config: &ProvidersConfig) -> Self {
        Self::new(
            ProviderSettings::google(&config.google.client_id, &config.google.client_secret),
            ProviderSettings::outlook(
                &config.outlook.client_id,
                &config.outlook.client_secret,
                &config.outlook.tenant_id,
            ),
            ProviderSettings::zoom(&config.zoom.client_id, &config.zoom.client_secret),
        )
    }

    /// Assemble a registry from explicit settings (tests point endpoints at
    /// a local mock server this way).
    pub fn new(
        google: ProviderSettings,
        outlook: ProviderSettings,
        zoom: ProviderSettings,
    ) -> Self {
        Self { google, outlook, zoom }
    }

    /// Look up the descriptor for a provider.
    pub fn settings(&self, provider: Provider) -> &ProviderSettings {
        match provider {
            Provider::Google => &self.google,
            Provider::Outlook => &self.outlook,
            Provider::Zoom => &self.zoom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outlook_endpoints_embed_the_tenant() {
        let settings = ProviderSettings::outlook("cid", "secret", "tenant-42");
        assert!(settings.authorize_endpoint.contains("/tenant-42/oauth2/v2.0/authorize"));
        assert!(settings.token_endpoint.contains("/tenant-42/oauth2/v2.0/token"));
    }

    #[test]
    fn zoom_sends_no_scope() {
        let settings = ProviderSettings::zoom("cid", "secret");
        assert!(!settings.send_scope_in_authorize);
        assert!(settings.scopes_for(IntegrationType::Video).is_empty());
    }

    #[test]
    fn google_requires_offline_consent_params() {
        let settings = ProviderSettings::google("cid", "secret");
        assert!(settings
            .extra_authorize_params
            .contains(&("access_type".to_string(), "offline".to_string())));
        assert!(settings
            .extra_authorize_params
            .contains(&("prompt".to_string(), "consent".to_string())));
    }
}
