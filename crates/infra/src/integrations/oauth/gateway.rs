//! HTTP implementation of the OAuthProviderGateway port
//!
//! Provider calls are single-shot with a 30 second timeout; failures
//! surface immediately to the caller with the provider's raw response body.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use slotbook_core::OAuthProviderGateway;
use slotbook_domain::constants::PROVIDER_TIMEOUT_SECS;
use slotbook_domain::{
    IntegrationType, Provider, ProviderIdentity, Result, SlotbookError, TokenExchange,
};
use tracing::{debug, instrument};
use url::Url;

use super::registry::ProviderRegistry;
use crate::errors::InfraError;

/// Gateway performing the authorization-code exchange and identity fetch
/// against the configured providers.
pub struct HttpProviderGateway {
    registry: ProviderRegistry,
    client: Client,
}

impl HttpProviderGateway {
    /// Create a gateway over the given provider registry.
    pub fn new(registry: ProviderRegistry) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(PROVIDER_TIMEOUT_SECS))
            .build()
            .map_err(|err| SlotbookError::Network(format!("failed to build HTTP client: {err}")))?;

        Ok(Self { registry, client })
    }
}

#[async_trait]
impl OAuthProviderGateway for HttpProviderGateway {
    fn authorization_url(
        &self,
        provider: Provider,
        integration_type: IntegrationType,
        redirect_uri: &str,
        state: &str,
    ) -> Result<String> {
        let settings = self.registry.settings(provider);

        let mut url = Url::parse(&settings.authorize_endpoint).map_err(|err| {
            SlotbookError::Config(format!("invalid authorize endpoint for {provider}: {err}"))
        })?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("client_id", &settings.client_id);
            query.append_pair("redirect_uri", redirect_uri);
            if settings.send_scope_in_authorize {
                query.append_pair("scope", &settings.scopes_for(integration_type).join(" "));
            }
            query.append_pair("response_type", "code");
            for (key, value) in &settings.extra_authorize_params {
                query.append_pair(key, value);
            }
            query.append_pair("state", state);
        }

        Ok(url.into())
    }

    #[instrument(skip(self, code, redirect_uri))]
    async fn exchange_code(
        &self,
        provider: Provider,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenExchange> {
        let settings = self.registry.settings(provider);

        let response = self
            .client
            .post(&settings.token_endpoint)
            .form(&[
                ("client_id", settings.client_id.as_str()),
                ("client_secret", settings.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await
            .map_err(InfraError::from)?;

        if !response.status().is_success() {
            let error_text =
                response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SlotbookError::TokenExchange(error_text));
        }

        let tokens: TokenExchange = response.json().await.map_err(|err| {
            SlotbookError::TokenExchange(format!("failed to parse token response: {err}"))
        })?;

        debug!(%provider, has_refresh_token = tokens.refresh_token.is_some(), "exchanged code");

        Ok(tokens)
    }

    #[instrument(skip(self, access_token))]
    async fn fetch_identity(
        &self,
        provider: Provider,
        access_token: &str,
    ) -> Result<ProviderIdentity> {
        let settings = self.registry.settings(provider);

        let response = self
            .client
            .get(&settings.userinfo_endpoint)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(InfraError::from)?;

        if !response.status().is_success() {
            let error_text =
                response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SlotbookError::IdentityFetch(error_text));
        }

        let identity = match provider {
            Provider::Google => {
                let info: GoogleUserInfo = response.json().await.map_err(parse_identity_error)?;
                ProviderIdentity { id: info.id, email: info.email }
            }
            Provider::Outlook => {
                let info: GraphUser = response.json().await.map_err(parse_identity_error)?;
                let email = info.mail.or(info.user_principal_name).unwrap_or_default();
                ProviderIdentity { id: info.id, email }
            }
            Provider::Zoom => {
                let info: ZoomUser = response.json().await.map_err(parse_identity_error)?;
                ProviderIdentity { id: info.id, email: info.email }
            }
        };

        debug!(%provider, provider_user_id = %identity.id, "fetched provider identity");

        Ok(identity)
    }
}

fn parse_identity_error(err: reqwest::Error) -> SlotbookError {
    SlotbookError::IdentityFetch(format!("failed to parse userinfo response: {err}"))
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    id: String,
    email: String,
}

#[derive(Debug, Deserialize)]
struct GraphUser {
    id: String,
    mail: Option<String>,
    #[serde(rename = "userPrincipalName")]
    user_principal_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ZoomUser {
    id: String,
    email: String,
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use slotbook_domain::ProvidersConfig;
    use wiremock::matchers::{bearer_token, body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::super::registry::ProviderSettings;
    use super::*;

    fn registry_against(server_uri: &str) -> ProviderRegistry {
        let mut google = ProviderSettings::google("google-cid", "google-secret");
        google.token_endpoint = format!("{server_uri}/google/token");
        google.userinfo_endpoint = format!("{server_uri}/google/userinfo");

        let mut outlook = ProviderSettings::outlook("ms-cid", "ms-secret", "tenant-1");
        outlook.token_endpoint = format!("{server_uri}/ms/token");
        outlook.userinfo_endpoint = format!("{server_uri}/ms/me");

        let mut zoom = ProviderSettings::zoom("zoom-cid", "zoom-secret");
        zoom.token_endpoint = format!("{server_uri}/zoom/token");
        zoom.userinfo_endpoint = format!("{server_uri}/zoom/me");

        ProviderRegistry::new(google, outlook, zoom)
    }

    fn production_gateway() -> HttpProviderGateway {
        let config = ProvidersConfig {
            google: slotbook_domain::OAuthClientConfig {
                client_id: "google-cid".into(),
                client_secret: "google-secret".into(),
            },
            outlook: slotbook_domain::OutlookClientConfig {
                client_id: "ms-cid".into(),
                client_secret: "ms-secret".into(),
                tenant_id: "tenant-1".into(),
            },
            zoom: slotbook_domain::OAuthClientConfig {
                client_id: "zoom-cid".into(),
                client_secret: "zoom-secret".into(),
            },
        };
        HttpProviderGateway::new(ProviderRegistry::from_config(&config)).unwrap()
    }

    fn query_map(url: &str) -> HashMap<String, String> {
        Url::parse(url)
            .unwrap()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn google_authorize_url_carries_offline_consent_params() {
        let gateway = production_gateway();
        let url = gateway
            .authorization_url(
                Provider::Google,
                IntegrationType::Calendar,
                "https://app.example.com/done",
                "google:calendar:abc",
            )
            .unwrap();

        let query = query_map(&url);
        assert_eq!(query.get("client_id").map(String::as_str), Some("google-cid"));
        assert_eq!(
            query.get("redirect_uri").map(String::as_str),
            Some("https://app.example.com/done")
        );
        assert_eq!(query.get("response_type").map(String::as_str), Some("code"));
        assert_eq!(query.get("access_type").map(String::as_str), Some("offline"));
        assert_eq!(query.get("prompt").map(String::as_str), Some("consent"));
        assert_eq!(query.get("state").map(String::as_str), Some("google:calendar:abc"));
        assert!(query.get("scope").is_some_and(|s| s.contains("auth/calendar")));
    }

    #[test]
    fn outlook_authorize_url_is_tenant_scoped_without_google_extras() {
        let gateway = production_gateway();
        let url = gateway
            .authorization_url(
                Provider::Outlook,
                IntegrationType::Calendar,
                "https://app.example.com/done",
                "outlook:calendar:abc",
            )
            .unwrap();

        assert!(url.starts_with("https://login.microsoftonline.com/tenant-1/oauth2/v2.0/authorize"));
        let query = query_map(&url);
        assert!(query.get("access_type").is_none());
        assert!(query.get("prompt").is_none());
        assert!(query.get("scope").is_some_and(|s| s.contains("Calendars.ReadWrite")));
    }

    #[test]
    fn zoom_authorize_url_omits_scope() {
        let gateway = production_gateway();
        let url = gateway
            .authorization_url(
                Provider::Zoom,
                IntegrationType::Video,
                "https://app.example.com/done",
                "zoom:video:abc",
            )
            .unwrap();

        let query = query_map(&url);
        assert!(query.get("scope").is_none());
        assert_eq!(query.get("client_id").map(String::as_str), Some("zoom-cid"));
        assert_eq!(query.get("response_type").map(String::as_str), Some("code"));
    }

    #[tokio::test]
    async fn exchange_parses_token_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/google/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=auth-code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok",
                "refresh_token": "refresh",
                "expires_in": 3600,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = HttpProviderGateway::new(registry_against(&server.uri())).unwrap();
        let tokens = gateway
            .exchange_code(Provider::Google, "auth-code", "https://app.example.com/done")
            .await
            .unwrap();

        assert_eq!(tokens.access_token, "tok");
        assert_eq!(tokens.refresh_token.as_deref(), Some("refresh"));
        assert_eq!(tokens.expires_in, Some(3600));
    }

    #[tokio::test]
    async fn exchange_failure_carries_provider_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/google/token"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_string(r#"{"error":"invalid_grant"}"#),
            )
            .mount(&server)
            .await;

        let gateway = HttpProviderGateway::new(registry_against(&server.uri())).unwrap();
        let err = gateway
            .exchange_code(Provider::Google, "bad-code", "https://app.example.com/done")
            .await
            .unwrap_err();

        match err {
            SlotbookError::TokenExchange(body) => assert!(body.contains("invalid_grant")),
            other => panic!("expected token exchange error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn identity_fetch_uses_bearer_token_per_provider() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/google/userinfo"))
            .and(bearer_token("tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "u1",
                "email": "a@b.com",
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ms/me"))
            .and(bearer_token("tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "ms-1",
                "mail": null,
                "userPrincipalName": "user@contoso.com",
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/zoom/me"))
            .and(bearer_token("tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "z1",
                "email": "host@example.com",
            })))
            .mount(&server)
            .await;

        let gateway = HttpProviderGateway::new(registry_against(&server.uri())).unwrap();

        let google = gateway.fetch_identity(Provider::Google, "tok").await.unwrap();
        assert_eq!(google.email, "a@b.com");

        // Graph users without a mailbox fall back to the UPN.
        let outlook = gateway.fetch_identity(Provider::Outlook, "tok").await.unwrap();
        assert_eq!(outlook.email, "user@contoso.com");

        let zoom = gateway.fetch_identity(Provider::Zoom, "tok").await.unwrap();
        assert_eq!(zoom.id, "z1");
    }

    #[tokio::test]
    async fn identity_fetch_failure_carries_provider_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/google/userinfo"))
            .respond_with(ResponseTemplate::new(401).set_body_string("token revoked"))
            .mount(&server)
            .await;

        let gateway = HttpProviderGateway::new(registry_against(&server.uri())).unwrap();
        let err = gateway.fetch_identity(Provider::Google, "tok").await.unwrap_err();

        match err {
            SlotbookError::IdentityFetch(body) => assert!(body.contains("token revoked")),
            other => panic!("expected identity fetch error, got {:?}", other),
        }
    }
}
