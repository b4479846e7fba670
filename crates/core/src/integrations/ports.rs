//! Port interfaces for the integrations module
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use slotbook_domain::{
    BusyBlock, BusyBlockSource, CalendarIntegration, CalendarIntegrationSettings,
    IntegrationLog, IntegrationType, IntegrationUpsert, LogFilter, NewIntegrationLog,
    NewWebhookIntegration, Organizer, Provider, ProviderIdentity, Result, SyncJob,
    TokenExchange, VideoIntegration, VideoIntegrationSettings, WebhookIntegration,
    WebhookIntegrationUpdate,
};
use uuid::Uuid;

/// Trait for resolving and persisting organizer accounts
#[async_trait]
pub trait OrganizerRepository: Send + Sync {
    /// Resolve an organizer from an API bearer token.
    async fn find_by_api_token(&self, token: &str) -> Result<Option<Organizer>>;

    /// Fetch an organizer by id.
    async fn find(&self, id: Uuid) -> Result<Option<Organizer>>;

    /// Create an organizer with the given bearer token.
    async fn create(&self, organizer: &Organizer, api_token: &str) -> Result<()>;
}

/// Trait for calendar integration persistence
#[async_trait]
pub trait CalendarIntegrationRepository: Send + Sync {
    /// List all calendar integrations owned by the organizer.
    async fn list(&self, organizer_id: Uuid) -> Result<Vec<CalendarIntegration>>;

    /// Fetch one integration; `None` when absent or owned by someone else.
    async fn find(&self, organizer_id: Uuid, id: Uuid) -> Result<Option<CalendarIntegration>>;

    /// Apply settings changes. Fails with `NotFound` when the row is absent.
    async fn update_settings(
        &self,
        organizer_id: Uuid,
        id: Uuid,
        settings: &CalendarIntegrationSettings,
    ) -> Result<CalendarIntegration>;

    /// Delete the integration. Fails with `NotFound` when the row is absent.
    async fn delete(&self, organizer_id: Uuid, id: Uuid) -> Result<()>;

    /// Insert or update the `(organizer, provider)` row from an OAuth
    /// completion. Returns the stored row and whether it was created.
    async fn upsert_from_oauth(
        &self,
        organizer_id: Uuid,
        upsert: &IntegrationUpsert,
    ) -> Result<(CalendarIntegration, bool)>;
}

/// Trait for video integration persistence
#[async_trait]
pub trait VideoIntegrationRepository: Send + Sync {
    async fn list(&self, organizer_id: Uuid) -> Result<Vec<VideoIntegration>>;

    async fn find(&self, organizer_id: Uuid, id: Uuid) -> Result<Option<VideoIntegration>>;

    async fn update_settings(
        &self,
        organizer_id: Uuid,
        id: Uuid,
        settings: &VideoIntegrationSettings,
    ) -> Result<VideoIntegration>;

    async fn delete(&self, organizer_id: Uuid, id: Uuid) -> Result<()>;

    async fn upsert_from_oauth(
        &self,
        organizer_id: Uuid,
        upsert: &IntegrationUpsert,
    ) -> Result<(VideoIntegration, bool)>;
}

/// Trait for webhook integration persistence
#[async_trait]
pub trait WebhookIntegrationRepository: Send + Sync {
    async fn list(&self, organizer_id: Uuid) -> Result<Vec<WebhookIntegration>>;

    async fn find(&self, organizer_id: Uuid, id: Uuid) -> Result<Option<WebhookIntegration>>;

    async fn create(
        &self,
        organizer_id: Uuid,
        webhook: &NewWebhookIntegration,
    ) -> Result<WebhookIntegration>;

    async fn update(
        &self,
        organizer_id: Uuid,
        id: Uuid,
        update: &WebhookIntegrationUpdate,
    ) -> Result<WebhookIntegration>;

    async fn delete(&self, organizer_id: Uuid, id: Uuid) -> Result<()>;
}

/// Trait for the append-only activity log
#[async_trait]
pub trait IntegrationLogRepository: Send + Sync {
    /// Append one audit entry.
    async fn append(&self, entry: &NewIntegrationLog) -> Result<IntegrationLog>;

    /// List entries newest-first, honoring the optional filters.
    async fn list(&self, organizer_id: Uuid, filter: &LogFilter) -> Result<Vec<IntegrationLog>>;
}

/// Trait for busy block lookups used by conflict detection
#[async_trait]
pub trait BusyBlockRepository: Send + Sync {
    /// Active blocks from the given sources, ordered by start time.
    async fn active_by_sources(
        &self,
        organizer_id: Uuid,
        sources: &[BusyBlockSource],
    ) -> Result<Vec<BusyBlock>>;

    /// Insert a block (device sync and manual entry both land here).
    async fn insert(&self, block: &BusyBlock) -> Result<()>;
}

/// Trait for issuing and consuming anti-forgery state tokens.
///
/// The store is keyed by `(organizer, provider, integration_type)`; putting
/// a new token overwrites any pending one for the same key.
#[async_trait]
pub trait OAuthStateStore: Send + Sync {
    /// Store a pending state token, replacing any prior token for the key.
    async fn put(
        &self,
        organizer_id: Uuid,
        provider: Provider,
        integration_type: IntegrationType,
        state: &str,
    ) -> Result<()>;

    /// Single-use validation: returns `true` and deletes the stored token
    /// only when one exists for the key and byte-equals `presented`.
    async fn consume(
        &self,
        organizer_id: Uuid,
        provider: Provider,
        integration_type: IntegrationType,
        presented: &str,
    ) -> Result<bool>;
}

/// Trait for talking to OAuth providers
#[async_trait]
pub trait OAuthProviderGateway: Send + Sync {
    /// Build the provider's consent-screen URL with the exact query
    /// parameters that provider mandates.
    fn authorization_url(
        &self,
        provider: Provider,
        integration_type: IntegrationType,
        redirect_uri: &str,
        state: &str,
    ) -> Result<String>;

    /// Exchange an authorization code for tokens. One POST, no retry.
    async fn exchange_code(
        &self,
        provider: Provider,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenExchange>;

    /// Fetch the provider-side identity of the connected account.
    async fn fetch_identity(
        &self,
        provider: Provider,
        access_token: &str,
    ) -> Result<ProviderIdentity>;
}

/// Trait for the fire-and-forget background job queue
#[async_trait]
pub trait SyncJobQueue: Send + Sync {
    /// Enqueue a job for the external worker.
    async fn enqueue(&self, job: &SyncJob) -> Result<()>;

    /// Fetch up to `limit` pending jobs, oldest first.
    async fn dequeue_batch(&self, limit: usize) -> Result<Vec<SyncJob>>;

    /// Transition a job to completed.
    async fn mark_completed(&self, id: Uuid) -> Result<()>;

    /// Record a failed attempt with its error text.
    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<()>;
}
