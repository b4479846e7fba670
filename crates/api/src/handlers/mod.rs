//! Request handlers, one module per resource

pub mod calendar;
pub mod conflicts;
pub mod health;
pub mod logs;
pub mod oauth;
pub mod video;
pub mod webhooks;
