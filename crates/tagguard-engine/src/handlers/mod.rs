//! Dispatch table from resource type to its handler.

mod backend_handler;

use std::collections::BTreeMap;
use std::sync::Arc;

use tagguard_core::errors::EnumerationError;
use tagguard_core::{ResourceHandler, ResourceType, TaggingBackend};

use crate::retry::RetryPolicy;

pub use backend_handler::BackendHandler;

/// Maps each supported [`ResourceType`] to the handler that enumerates,
/// reads, and writes it.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: BTreeMap<ResourceType, Arc<dyn ResourceHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with a [`BackendHandler`] for every resource type.
    pub fn standard(backend: Arc<dyn TaggingBackend>, retry: RetryPolicy) -> Self {
        let mut registry = Self::new();
        for resource_type in ResourceType::ALL {
            registry.register(Arc::new(BackendHandler::new(
                resource_type,
                Arc::clone(&backend),
                retry.clone(),
            )));
        }
        registry
    }

    /// Register (or replace) the handler for its resource type.
    pub fn register(&mut self, handler: Arc<dyn ResourceHandler>) {
        self.handlers.insert(handler.resource_type(), handler);
    }

    pub fn get(&self, resource_type: ResourceType) -> Result<Arc<dyn ResourceHandler>, EnumerationError> {
        self.handlers
            .get(&resource_type)
            .cloned()
            .ok_or_else(|| EnumerationError::Unsupported {
                resource_type: resource_type.to_string(),
            })
    }

    pub fn resource_types(&self) -> Vec<ResourceType> {
        self.handlers.keys().copied().collect()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("resource_types", &self.resource_types())
            .finish()
    }
}
