//! Integration health report builder

use chrono::{DateTime, Utc};
use slotbook_domain::constants::SYNC_ERROR_HEALTH_THRESHOLD;
use slotbook_domain::{
    CalendarIntegration, CalendarIntegrationHealth, HealthStatus, IntegrationHealthReport,
    Organizer, OverallHealth, VideoIntegration, VideoIntegrationHealth,
};

/// Build the health report for an organizer's integrations.
///
/// A calendar integration is healthy while it is active, sync is enabled,
/// the token is fresh, and the error counter is below the threshold. A
/// video integration is healthy while active with a fresh token. One
/// unhealthy integration degrades the overall status.
pub fn build_health_report(
    organizer: &Organizer,
    now: DateTime<Utc>,
    calendars: &[CalendarIntegration],
    videos: &[VideoIntegration],
) -> IntegrationHealthReport {
    let calendar_integrations: Vec<CalendarIntegrationHealth> = calendars
        .iter()
        .map(|integration| {
            let token_expired = integration.is_token_expired(now);
            let healthy = integration.is_active
                && integration.sync_enabled
                && !token_expired
                && integration.sync_errors < SYNC_ERROR_HEALTH_THRESHOLD;

            CalendarIntegrationHealth {
                provider: integration.provider.clone(),
                is_active: integration.is_active,
                sync_enabled: integration.sync_enabled,
                token_expired,
                last_sync: integration.last_sync_at,
                sync_errors: integration.sync_errors,
                health: if healthy { HealthStatus::Healthy } else { HealthStatus::Unhealthy },
            }
        })
        .collect();

    let video_integrations: Vec<VideoIntegrationHealth> = videos
        .iter()
        .map(|integration| {
            let token_expired = integration.is_token_expired(now);
            let healthy = integration.is_active && !token_expired;

            VideoIntegrationHealth {
                provider: integration.provider.clone(),
                is_active: integration.is_active,
                auto_generate_links: integration.auto_generate_links,
                token_expired,
                api_calls_today: integration.api_calls_today,
                health: if healthy { HealthStatus::Healthy } else { HealthStatus::Unhealthy },
            }
        })
        .collect();

    let any_unhealthy = calendar_integrations
        .iter()
        .map(|c| c.health)
        .chain(video_integrations.iter().map(|v| v.health))
        .any(|health| health == HealthStatus::Unhealthy);

    IntegrationHealthReport {
        organizer_email: organizer.email.clone(),
        timestamp: now,
        calendar_integrations,
        video_integrations,
        overall_health: if any_unhealthy { OverallHealth::Degraded } else { OverallHealth::Healthy },
    }
}
