//! Concrete [`TaggingBackend`] implementations.

#[cfg(feature = "http")]
mod http;
mod inventory;
#[cfg(feature = "http")]
pub mod wire;

use std::path::Path;
use std::sync::Arc;

use tagguard_core::config::BackendKind;
use tagguard_core::errors::SetupError;
use tagguard_core::{TaggingBackend, TagguardConfig};

#[cfg(feature = "http")]
pub use http::HttpBackend;
pub use inventory::{InventoryBackend, InventoryResource, InventorySnapshot};

/// Build the backend selected by `config.backend.kind`.
pub fn build_backend(config: &TagguardConfig) -> Result<Arc<dyn TaggingBackend>, SetupError> {
    match config.backend.kind {
        BackendKind::Inventory => Ok(Arc::new(build_inventory(config)?)),
        BackendKind::Http => build_http(config),
    }
}

/// Load the configured inventory snapshot.
pub fn build_inventory(config: &TagguardConfig) -> Result<InventoryBackend, SetupError> {
    let path = inventory_path(config)?;
    Ok(InventoryBackend::load(path)?
        .with_page_size(config.backend.page_size)
        .with_max_tags(config.remediation.max_tags_per_resource))
}

pub fn inventory_path(config: &TagguardConfig) -> Result<&Path, SetupError> {
    config
        .backend
        .inventory_path
        .as_deref()
        .map(Path::new)
        .ok_or_else(|| SetupError::Backend {
            reason: "inventory backend selected but no inventory path configured".to_string(),
        })
}

#[cfg(feature = "http")]
fn build_http(config: &TagguardConfig) -> Result<Arc<dyn TaggingBackend>, SetupError> {
    let endpoint = config
        .backend
        .endpoint
        .as_deref()
        .ok_or_else(|| SetupError::Backend {
            reason: "no gateway endpoint configured: pass --endpoint or set TAGGUARD_ENDPOINT"
                .to_string(),
        })?;
    let token = config
        .backend
        .api_token
        .clone()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| SetupError::MissingCredentials {
            hint: "set TAGGUARD_API_TOKEN or backend.api_token".to_string(),
        })?;
    Ok(Arc::new(HttpBackend::new(
        endpoint,
        token,
        config.backend.call_timeout(),
        config.backend.page_size,
    )?))
}

#[cfg(not(feature = "http"))]
fn build_http(_config: &TagguardConfig) -> Result<Arc<dyn TaggingBackend>, SetupError> {
    Err(SetupError::Backend {
        reason: "built without the `http` feature; use the inventory backend".to_string(),
    })
}
