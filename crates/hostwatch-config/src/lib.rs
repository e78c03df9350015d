//! # hostwatch Config
//!
//! Typed, validated configuration for the hostwatch monitor. A [`Config`] is
//! loaded once at startup and shared read-only for the rest of the process.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::{ConfigFormat, ConfigLoader};
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
