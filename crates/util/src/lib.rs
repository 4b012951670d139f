//! Utility functions and helpers shared by the rentals admin crates.
//!
//! - [`validation`]: field validators and their failure sets
//! - [`error_message`]: human-readable messages for validation failures
//! - [`config`]: JSON + environment configuration loading

pub mod config;
pub mod error_message;
mod path_processing;
pub mod validation;

pub use config::{AppConfig, ConfigError};
pub use error_message::{ErrorMessageFormatter, FieldErrorFormatter, generate_error_message};
pub use path_processing::expand_tilde;
pub use validation::{ValidationError, ValidationErrors, Validator, field_validators, is_valid_email, validate_value};
