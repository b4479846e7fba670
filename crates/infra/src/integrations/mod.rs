//! External service integrations

pub mod oauth;

pub use oauth::{HttpProviderGateway, ProviderRegistry, ProviderSettings};
