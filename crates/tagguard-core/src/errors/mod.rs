//! Error taxonomy. One enum per failure family, plus the umbrella
//! [`TagguardError`] that every fallible entry point returns.

mod backend_error;
mod config_error;
mod enumeration_error;
pub mod error_code;
mod fetch_error;
mod setup_error;
mod tagguard_error;
mod write_error;

pub use backend_error::BackendError;
pub use config_error::ConfigError;
pub use enumeration_error::EnumerationError;
pub use error_code::ErrorCode;
pub use fetch_error::FetchError;
pub use setup_error::SetupError;
pub use tagguard_error::{TagguardError, TagguardResult};
pub use write_error::WriteError;
