//! # Slotbook API
//!
//! The HTTP application: router, authentication extractor, handlers, and
//! error-to-status mapping. All business logic lives behind the
//! `slotbook-core` services and ports wired up in [`state::AppState`].

pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
