//! Audit mode: enumerate, fetch, evaluate, report.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::iter::{ParallelBridge, ParallelIterator};
use tagguard_core::config::defaults;
use tagguard_core::errors::{EnumerationError, ErrorCode, SetupError};
use tagguard_core::tracing::events;
use tagguard_core::{
    CancellationToken, CompliancePolicy, ResourceDescriptor, ResourceType, TaggingBackend, TagguardConfig,
    TagguardResult,
};

use crate::enumerator::ResourceEnumerator;
use crate::evaluator::evaluate;
use crate::fetcher::TagFetcher;
use crate::handlers::HandlerRegistry;
use crate::report::{AuditSummary, ReportHandle, ReportSink};
use crate::retry::RetryPolicy;

/// Audits every resource of the selected types against a policy.
///
/// Resource types are enumerated one after another; the resources of each
/// type are fetched and evaluated on a bounded rayon pool. A listing failure
/// for one type is recorded and the run moves on to the next type. A tag
/// read failure skips that resource only.
#[derive(Debug, Clone)]
pub struct Auditor {
    registry: HandlerRegistry,
    policy: CompliancePolicy,
    region: String,
    resource_types: Vec<ResourceType>,
    concurrency: usize,
    cancel: CancellationToken,
}

impl Auditor {
    pub fn new(registry: HandlerRegistry, policy: CompliancePolicy, region: impl Into<String>) -> Self {
        let resource_types = registry.resource_types();
        Self {
            registry,
            policy,
            region: region.into(),
            resource_types,
            concurrency: defaults::DEFAULT_CONCURRENCY,
            cancel: CancellationToken::new(),
        }
    }

    /// Build from a loaded config. Fails when no region is configured.
    pub fn from_config(
        config: &TagguardConfig,
        backend: Arc<dyn TaggingBackend>,
        cancel: CancellationToken,
    ) -> TagguardResult<Self> {
        let region = require_region(config)?;
        let retry = RetryPolicy::from_config(&config.retry, cancel.clone());
        let registry = HandlerRegistry::standard(backend, retry);
        Ok(Self::new(registry, CompliancePolicy::from_config(&config.policy), region)
            .with_resource_types(config.runtime.effective_resource_types()?)
            .with_concurrency(config.runtime.concurrency)
            .with_cancellation(cancel))
    }

    pub fn with_resource_types(mut self, resource_types: Vec<ResourceType>) -> Self {
        self.resource_types = resource_types;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, defaults::MAX_CONCURRENCY);
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn policy(&self) -> &CompliancePolicy {
        &self.policy
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Run the audit, streaming results into `sink`, and return the summary.
    ///
    /// On cancellation no new resources are started; results already
    /// gathered are still written and the summary is marked cancelled.
    pub fn run(&self, sink: ReportSink) -> TagguardResult<AuditSummary> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.concurrency)
            .thread_name(|i| format!("tagguard-audit-{i}"))
            .build()
            .map_err(|e| SetupError::Backend {
                reason: format!("failed to build worker pool: {e}"),
            })?;
        let fetcher = TagFetcher::new(self.registry.clone());
        let processed = AtomicUsize::new(0);

        tracing::info!(
            region = %self.region,
            types = self.resource_types.len(),
            concurrency = self.concurrency,
            "audit started"
        );

        for &resource_type in &self.resource_types {
            if self.cancel.is_cancelled() {
                break;
            }
            let enumerator = match ResourceEnumerator::for_type(
                &self.registry,
                resource_type,
                &self.region,
                self.cancel.clone(),
            ) {
                Ok(enumerator) => enumerator,
                Err(e) => {
                    events::enumeration_failed(&e.resource_type_name(), e.error_code(), &e.to_string());
                    sink.record_enumeration_failure(e);
                    continue;
                }
            };

            let handle = sink.handle();
            pool.install(|| {
                enumerator.par_bridge().for_each_with(handle, |handle, item| {
                    self.audit_one(&fetcher, handle, item, &processed)
                })
            });
        }

        if self.cancel.is_cancelled() {
            events::run_cancelled("audit", processed.load(Ordering::Relaxed));
            sink.mark_cancelled();
        }
        let summary = sink.finish()?;
        tracing::info!(
            audited = summary.total_audited,
            compliant = summary.compliant,
            skipped = summary.skipped_count(),
            failed_types = summary.enumeration_failures.len(),
            "audit finished"
        );
        Ok(summary)
    }

    fn audit_one(
        &self,
        fetcher: &TagFetcher,
        handle: &mut ReportHandle,
        item: Result<ResourceDescriptor, EnumerationError>,
        processed: &AtomicUsize,
    ) {
        let resource = match item {
            Ok(resource) => resource,
            Err(e) => {
                events::enumeration_failed(&e.resource_type_name(), e.error_code(), &e.to_string());
                handle.record_enumeration_failure(e);
                return;
            }
        };
        if self.cancel.is_cancelled() {
            return;
        }
        match fetcher.fetch(&resource) {
            Ok(tags) => {
                let result = evaluate(&resource, tags, &self.policy);
                events::resource_audited(&result);
                handle.record(result);
                processed.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                events::resource_skipped(&resource, e.error_code(), &e.to_string());
                handle.record_skipped(resource, e);
            }
        }
    }
}

pub(crate) fn require_region(config: &TagguardConfig) -> Result<String, SetupError> {
    config
        .runtime
        .region
        .clone()
        .filter(|r| !r.trim().is_empty())
        .ok_or(SetupError::MissingRegion)
}
