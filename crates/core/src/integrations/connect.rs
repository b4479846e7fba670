//! OAuth connect orchestration
//!
//! Drives the initiate/callback flow: state issuance, state validation,
//! code exchange, identity fetch, integration upsert, and audit logging.
//! All side effects go through ports, so the service itself stays pure
//! enough to test against in-memory fakes.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::RngCore;
use slotbook_domain::constants::{DEFAULT_TOKEN_TTL_SECS, STATE_TOKEN_BYTES};
use slotbook_domain::{
    IntegrationType, IntegrationUpsert, LogType, NewIntegrationLog, OAuthCallbackRequest,
    OAuthCallbackResponse, OAuthInitiateRequest, OAuthInitiateResponse, Organizer, Provider,
    Result, SlotbookError,
};
use tracing::{info, instrument, warn};

use super::ports::{
    CalendarIntegrationRepository, IntegrationLogRepository, OAuthProviderGateway,
    OAuthStateStore, VideoIntegrationRepository,
};

/// Service implementing the OAuth initiate/callback flow.
pub struct ConnectService {
    gateway: Arc<dyn OAuthProviderGateway>,
    states: Arc<dyn OAuthStateStore>,
    calendars: Arc<dyn CalendarIntegrationRepository>,
    videos: Arc<dyn VideoIntegrationRepository>,
    logs: Arc<dyn IntegrationLogRepository>,
}

impl ConnectService {
    /// Create a new connect service over the given ports.
    pub fn new(
        gateway: Arc<dyn OAuthProviderGateway>,
        states: Arc<dyn OAuthStateStore>,
        calendars: Arc<dyn CalendarIntegrationRepository>,
        videos: Arc<dyn VideoIntegrationRepository>,
        logs: Arc<dyn IntegrationLogRepository>,
    ) -> Self {
        Self { gateway, states, calendars, videos, logs }
    }

    /// Begin an OAuth flow: issue a state token and build the provider's
    /// authorization URL.
    ///
    /// Nothing is stored when the provider is unsupported or the request
    /// fails validation.
    #[instrument(skip(self, organizer), fields(organizer_id = %organizer.id))]
    pub async fn initiate(
        &self,
        organizer: &Organizer,
        request: &OAuthInitiateRequest,
    ) -> Result<OAuthInitiateResponse> {
        let provider = Provider::from_str(&request.provider)?;
        let integration_type = IntegrationType::from_str(&request.integration_type)?;

        if request.redirect_uri.trim().is_empty() {
            return Err(SlotbookError::Validation("redirect_uri must not be empty".into()));
        }

        let state = generate_state(provider, integration_type);
        let authorization_url = self.gateway.authorization_url(
            provider,
            integration_type,
            &request.redirect_uri,
            &state,
        )?;

        // Stored last so a failed URL build leaves no pending state behind.
        self.states.put(organizer.id, provider, integration_type, &state).await?;

        info!(%provider, %integration_type, "issued OAuth state");

        Ok(OAuthInitiateResponse {
            authorization_url,
            provider: provider.to_string(),
            integration_type: integration_type.to_string(),
            state,
        })
    }

    /// Complete an OAuth flow: validate state (single use), exchange the
    /// code, fetch the provider identity, and upsert the integration.
    ///
    /// The upsert is the only mutating step, and it runs last; a failed
    /// exchange or identity fetch leaves no integration record created or
    /// altered. Every completion, success or failure, appends an audit
    /// entry.
    #[instrument(skip(self, organizer, request), fields(organizer_id = %organizer.id))]
    pub async fn callback(
        &self,
        organizer: &Organizer,
        request: &OAuthCallbackRequest,
    ) -> Result<OAuthCallbackResponse> {
        let provider = Provider::from_str(&request.provider)?;
        let integration_type = IntegrationType::from_str(&request.integration_type)?;

        let presented = request.state.as_deref().unwrap_or_default();
        let valid = self
            .states
            .consume(organizer.id, provider, integration_type, presented)
            .await?;
        if !valid {
            return Err(SlotbookError::InvalidState(format!(
                "no matching pending state for {provider}/{integration_type}"
            )));
        }

        match self.complete(organizer, provider, integration_type, request).await {
            Ok((provider_email, created)) => {
                self.log_connected(organizer, provider, integration_type, &provider_email, created)
                    .await;

                Ok(OAuthCallbackResponse {
                    message: format!(
                        "{} {} integration connected successfully",
                        provider.display_name(),
                        integration_type
                    ),
                    provider: provider.to_string(),
                    integration_type: integration_type.to_string(),
                    provider_email,
                    created,
                })
            }
            Err(err) => {
                self.log_failure(organizer, provider, integration_type, &err).await;
                Err(err)
            }
        }
    }

    /// Exchange, identity fetch, and upsert. Split out so the callback can
    /// audit-log both outcomes in one place.
    async fn complete(
        &self,
        organizer: &Organizer,
        provider: Provider,
        integration_type: IntegrationType,
        request: &OAuthCallbackRequest,
    ) -> Result<(String, bool)> {
        let tokens = self
            .gateway
            .exchange_code(provider, &request.code, &request.redirect_uri)
            .await?;
        let identity = self.gateway.fetch_identity(provider, &tokens.access_token).await?;

        let ttl = tokens.expires_in.unwrap_or(DEFAULT_TOKEN_TTL_SECS);
        let upsert = IntegrationUpsert {
            provider: provider.to_string(),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_expires_at: Utc::now() + Duration::seconds(ttl),
            provider_user_id: identity.id,
            provider_email: identity.email.clone(),
        };

        let created = match integration_type {
            IntegrationType::Calendar => {
                let (_, created) =
                    self.calendars.upsert_from_oauth(organizer.id, &upsert).await?;
                created
            }
            IntegrationType::Video => {
                let (_, created) = self.videos.upsert_from_oauth(organizer.id, &upsert).await?;
                created
            }
        };

        Ok((identity.email, created))
    }

    async fn log_connected(
        &self,
        organizer: &Organizer,
        provider: Provider,
        integration_type: IntegrationType,
        provider_email: &str,
        created: bool,
    ) {
        let entry = NewIntegrationLog {
            organizer_id: organizer.id,
            log_type: LogType::OauthConnected,
            integration_type: provider.to_string(),
            booking_id: None,
            message: format!(
                "{} {} integration {}",
                provider.display_name(),
                integration_type,
                if created { "created" } else { "updated" }
            ),
            details: serde_json::json!({
                "provider_email": provider_email,
                "created": created,
            }),
            success: true,
        };

        if let Err(err) = self.logs.append(&entry).await {
            warn!(%provider, error = %err, "failed to append connect audit entry");
        }
    }

    async fn log_failure(
        &self,
        organizer: &Organizer,
        provider: Provider,
        integration_type: IntegrationType,
        failure: &SlotbookError,
    ) {
        let entry = NewIntegrationLog {
            organizer_id: organizer.id,
            log_type: LogType::Error,
            integration_type: provider.to_string(),
            booking_id: None,
            message: format!(
                "{} {} integration connection failed: {}",
                provider.display_name(),
                integration_type,
                failure
            ),
            details: serde_json::json!({ "error": failure.to_string() }),
            success: false,
        };

        if let Err(err) = self.logs.append(&entry).await {
            warn!(%provider, error = %err, "failed to append failure audit entry");
        }
    }
}

/// Build a state token of the form `provider:type:<32 hex chars>`.
fn generate_state(provider: Provider, integration_type: IntegrationType) -> String {
    let mut nonce = [0u8; STATE_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut nonce);
    format!("{provider}:{integration_type}:{}", hex::encode(nonce))
}
