//! Infrastructure-side error handling

mod conversions;

pub use conversions::InfraError;
