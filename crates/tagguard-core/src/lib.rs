//! # tagguard-core
//!
//! Foundation crate for the tagguard tag compliance engine.
//! Defines the data model, errors, configuration, backend traits,
//! cancellation, tag validation, and tracing setup.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod tracing;
pub mod traits;
pub mod validation;

// Re-export the most commonly used types at the crate root.
pub use config::TagguardConfig;
pub use errors::{TagguardError, TagguardResult};
pub use models::{
    BatchState, CompliancePolicy, ComplianceResult, RemediationError, RemediationOutcome,
    ResourceDescriptor, ResourcePage, ResourceType, TagPayload, TagSet,
};
pub use traits::{CancellationToken, ResourceHandler, TaggingBackend};
