//! Lazy, paginated resource enumeration.

use std::collections::VecDeque;
use std::sync::Arc;

use tagguard_core::errors::{BackendError, EnumerationError};
use tagguard_core::{CancellationToken, ResourceDescriptor, ResourceHandler, ResourceType};

use crate::handlers::HandlerRegistry;

/// Yields every resource of one type, fetching pages on demand.
///
/// A page is requested only once the previous one is drained. The first
/// error is yielded once, after which the iterator is exhausted. Once the
/// run is cancelled no further page is requested; resources already
/// buffered are still yielded.
pub struct ResourceEnumerator {
    handler: Arc<dyn ResourceHandler>,
    region: String,
    cancel: CancellationToken,
    buffer: VecDeque<ResourceDescriptor>,
    next_token: Option<String>,
    started: bool,
    finished: bool,
    pages: usize,
}

impl ResourceEnumerator {
    pub fn new(handler: Arc<dyn ResourceHandler>, region: impl Into<String>, cancel: CancellationToken) -> Self {
        Self {
            handler,
            region: region.into(),
            cancel,
            buffer: VecDeque::new(),
            next_token: None,
            started: false,
            finished: false,
            pages: 0,
        }
    }

    /// Look up the handler for `resource_type` and start enumerating.
    pub fn for_type(
        registry: &HandlerRegistry,
        resource_type: ResourceType,
        region: &str,
        cancel: CancellationToken,
    ) -> Result<Self, EnumerationError> {
        Ok(Self::new(registry.get(resource_type)?, region, cancel))
    }

    pub fn resource_type(&self) -> ResourceType {
        self.handler.resource_type()
    }

    /// Pages fetched so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    fn has_more_pages(&self) -> bool {
        !self.started || self.next_token.is_some()
    }

    fn fetch_page(&mut self) -> Result<(), EnumerationError> {
        let token = self.next_token.take();
        let page = self.handler.list_page(&self.region, token.as_deref())?;
        self.started = true;
        self.pages += 1;
        if page.next_token.is_some() && page.next_token == token {
            return Err(EnumerationError::Backend {
                resource_type: self.resource_type(),
                cause: BackendError::Protocol {
                    reason: "pagination token did not advance".to_string(),
                },
            });
        }
        tracing::trace!(
            resource_type = %self.resource_type(),
            page = self.pages,
            count = page.resources.len(),
            "fetched listing page"
        );
        self.buffer.extend(page.resources);
        self.next_token = page.next_token;
        Ok(())
    }
}

impl Iterator for ResourceEnumerator {
    type Item = Result<ResourceDescriptor, EnumerationError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(resource) = self.buffer.pop_front() {
                return Some(Ok(resource));
            }
            if self.finished || !self.has_more_pages() || self.cancel.is_cancelled() {
                self.finished = true;
                return None;
            }
            if let Err(e) = self.fetch_page() {
                self.finished = true;
                return Some(Err(e));
            }
        }
    }
}
