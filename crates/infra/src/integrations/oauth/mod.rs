//! OAuth provider descriptors and the HTTP gateway that talks to them

pub mod gateway;
pub mod registry;

pub use gateway::HttpProviderGateway;
pub use registry::{ProviderRegistry, ProviderSettings};
