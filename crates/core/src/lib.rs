//! # Slotbook Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for storage and provider gateways
//! - The OAuth connect service (initiate/callback orchestration)
//! - Conflict detection and health report building
//!
//! ## Architecture Principles
//! - Only depends on `slotbook-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod integrations;
pub mod scheduling;

// Re-export specific items to avoid ambiguity
pub use integrations::connect::ConnectService;
pub use integrations::health::build_health_report;
pub use integrations::ports::{
    BusyBlockRepository, CalendarIntegrationRepository, IntegrationLogRepository,
    OAuthProviderGateway, OAuthStateStore, OrganizerRepository, SyncJobQueue,
    VideoIntegrationRepository, WebhookIntegrationRepository,
};
pub use scheduling::conflicts::detect_conflicts;
