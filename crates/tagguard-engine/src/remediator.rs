//! Remediation mode: write missing required tags back to resources.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rayon::iter::{ParallelBridge, ParallelIterator};
use serde::Serialize;
use tagguard_core::config::defaults;
use tagguard_core::errors::{EnumerationError, ErrorCode, SetupError};
use tagguard_core::models::{BatchState, RemediationError};
use tagguard_core::tracing::events;
use tagguard_core::validation;
use tagguard_core::{
    CancellationToken, CompliancePolicy, ComplianceResult, RemediationOutcome, ResourceDescriptor,
    ResourceType, TagSet, TaggingBackend, TagguardConfig, TagguardResult,
};

use crate::auditor::require_region;
use crate::enumerator::ResourceEnumerator;
use crate::evaluator::evaluate;
use crate::fetcher::TagFetcher;
use crate::handlers::HandlerRegistry;
use crate::report::EnumerationFailure;
use crate::retry::RetryPolicy;
use crate::writer::TagWriter;

/// Result of a remediation run.
#[derive(Debug, Clone, Serialize)]
pub struct RemediationReport {
    pub generated_at: DateTime<Utc>,
    pub region: String,
    pub dry_run: bool,
    /// Write set before placeholder expansion.
    pub tag_template: TagSet,
    /// One outcome per processed resource, sorted by type then id.
    pub outcomes: Vec<RemediationOutcome>,
    pub enumeration_failures: Vec<EnumerationFailure>,
    pub cancelled: bool,
}

impl RemediationReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Resources that received (or on a dry run would receive) at least one tag.
    pub fn tagged(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.success && !o.applied_tags.is_empty())
            .count()
    }

    /// Resources that needed no write.
    pub fn unchanged(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.success && o.applied_tags.is_empty())
            .count()
    }

    pub fn write_failures(&self) -> impl Iterator<Item = &RemediationOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.error.as_ref().is_some_and(RemediationError::is_write_error))
    }

    /// True when any resource failed to write. Drives the CLI exit code.
    pub fn has_write_errors(&self) -> bool {
        self.write_failures().next().is_some()
    }
}

/// Per-resource batch state, advanced along the legal transitions only.
struct Batch {
    state: BatchState,
}

impl Batch {
    fn new() -> Self {
        Self {
            state: BatchState::Pending,
        }
    }

    fn advance(&mut self, resource: &ResourceDescriptor, next: BatchState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state.as_str(),
            next.as_str()
        );
        tracing::trace!(
            resource = %resource,
            from = self.state.as_str(),
            to = next.as_str(),
            "batch transition"
        );
        self.state = next;
    }
}

enum Processed {
    Outcome(RemediationOutcome),
    EnumerationFailed(EnumerationError),
    Skipped,
}

/// Applies a tag template to every non-compliant resource of the selected
/// types.
///
/// Only keys the policy reports missing are written, unless
/// `overwrite_existing` is set, in which case the whole template is
/// written to every non-compliant resource. Template values may contain
/// `{resource_type}`, `{resource_id}` and `{region}`.
#[derive(Debug, Clone)]
pub struct Remediator {
    registry: HandlerRegistry,
    policy: CompliancePolicy,
    tag_template: TagSet,
    overwrite_existing: bool,
    max_tags_per_resource: usize,
    region: String,
    resource_types: Vec<ResourceType>,
    concurrency: usize,
    cancel: CancellationToken,
    dry_run: bool,
}

impl Remediator {
    pub fn new(
        registry: HandlerRegistry,
        policy: CompliancePolicy,
        tag_template: TagSet,
        region: impl Into<String>,
    ) -> Self {
        let resource_types = registry.resource_types();
        Self {
            registry,
            policy,
            tag_template,
            overwrite_existing: defaults::DEFAULT_OVERWRITE_EXISTING,
            max_tags_per_resource: defaults::DEFAULT_MAX_TAGS_PER_RESOURCE,
            region: region.into(),
            resource_types,
            concurrency: defaults::DEFAULT_CONCURRENCY,
            cancel: CancellationToken::new(),
            dry_run: false,
        }
    }

    /// Build from a loaded config. The template is the configured
    /// `default_tags` overlaid by `cli_tags`.
    pub fn from_config(
        config: &TagguardConfig,
        backend: Arc<dyn TaggingBackend>,
        cli_tags: &TagSet,
        cancel: CancellationToken,
    ) -> TagguardResult<Self> {
        let region = require_region(config)?;
        let template = TagSet::from(config.remediation.default_tags.clone()).merged(cli_tags);
        validate_template(&template)?;
        let retry = RetryPolicy::from_config(&config.retry, cancel.clone());
        let registry = HandlerRegistry::standard(backend, retry);
        Ok(
            Self::new(registry, CompliancePolicy::from_config(&config.policy), template, region)
                .with_overwrite(config.remediation.overwrite_existing)
                .with_max_tags(config.remediation.max_tags_per_resource)
                .with_resource_types(config.runtime.effective_resource_types()?)
                .with_concurrency(config.runtime.concurrency)
                .with_cancellation(cancel),
        )
    }

    pub fn with_overwrite(mut self, overwrite_existing: bool) -> Self {
        self.overwrite_existing = overwrite_existing;
        self
    }

    pub fn with_max_tags(mut self, max_tags_per_resource: usize) -> Self {
        self.max_tags_per_resource = max_tags_per_resource;
        self
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

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn tag_template(&self) -> &TagSet {
        &self.tag_template
    }

    /// Tags to write to the resource behind `result`: empty for compliant
    /// resources, otherwise the expanded template restricted to the missing
    /// keys (or the whole template when overwriting).
    pub fn derive_write_set(&self, result: &ComplianceResult) -> TagSet {
        if result.compliant {
            return TagSet::new();
        }
        self.tag_template
            .iter()
            .filter(|(key, _)| {
                self.overwrite_existing || result.missing_tags.iter().any(|m| m == *key)
            })
            .map(|(key, value)| {
                (
                    key.to_string(),
                    expand_placeholders(value, &result.resource, &self.region),
                )
            })
            .collect()
    }

    /// Remediate one resource: fetch, evaluate, write.
    pub fn remediate_one(
        &self,
        fetcher: &TagFetcher,
        writer: &TagWriter,
        resource: ResourceDescriptor,
    ) -> RemediationOutcome {
        let mut batch = Batch::new();
        batch.advance(&resource, BatchState::Fetching);
        let current = match fetcher.fetch(&resource) {
            Ok(tags) => tags,
            Err(e) => {
                events::resource_skipped(&resource, e.error_code(), &e.to_string());
                batch.advance(&resource, BatchState::Failed);
                return RemediationOutcome::failed(resource, TagSet::new(), e.into(), self.dry_run);
            }
        };

        let result = evaluate(&resource, current, &self.policy);
        let write_set = self.derive_write_set(&result);
        if write_set.is_empty() {
            batch.advance(&resource, BatchState::Done);
            return RemediationOutcome::done(resource, write_set, self.dry_run);
        }

        if self.cancel.is_cancelled() {
            batch.advance(&resource, BatchState::Failed);
            let error = RemediationError::Cancelled {
                resource_id: resource.resource_id.clone(),
            };
            return RemediationOutcome::failed(resource, write_set, error, self.dry_run);
        }

        batch.advance(&resource, BatchState::Writing);
        let outcome = writer.apply(&resource, write_set, Some(&result.existing_tags), self.dry_run);
        batch.advance(&resource, outcome.state);
        outcome
    }

    /// Remediate every resource of the selected types.
    pub fn run(&self) -> TagguardResult<RemediationReport> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.concurrency)
            .thread_name(|i| format!("tagguard-remediate-{i}"))
            .build()
            .map_err(|e| SetupError::Backend {
                reason: format!("failed to build worker pool: {e}"),
            })?;
        let fetcher = TagFetcher::new(self.registry.clone());
        let writer = TagWriter::new(self.registry.clone(), self.max_tags_per_resource);
        let processed = AtomicUsize::new(0);

        tracing::info!(
            region = %self.region,
            dry_run = self.dry_run,
            overwrite = self.overwrite_existing,
            tags = %self.tag_template,
            "remediation started"
        );

        let mut outcomes = Vec::new();
        let mut enumeration_failures = Vec::new();
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
                    enumeration_failures.push(EnumerationFailure::from_error(&e));
                    continue;
                }
            };

            let processed_items: Vec<Processed> = pool.install(|| {
                enumerator
                    .par_bridge()
                    .map(|item| match item {
                        Ok(_) if self.cancel.is_cancelled() => Processed::Skipped,
                        Ok(resource) => {
                            processed.fetch_add(1, Ordering::Relaxed);
                            Processed::Outcome(self.remediate_one(&fetcher, &writer, resource))
                        }
                        Err(e) => Processed::EnumerationFailed(e),
                    })
                    .collect()
            });

            for item in processed_items {
                match item {
                    Processed::Outcome(outcome) => outcomes.push(outcome),
                    Processed::EnumerationFailed(e) => {
                        events::enumeration_failed(&e.resource_type_name(), e.error_code(), &e.to_string());
                        enumeration_failures.push(EnumerationFailure::from_error(&e));
                    }
                    Processed::Skipped => {}
                }
            }
        }

        let cancelled = self.cancel.is_cancelled();
        if cancelled {
            events::run_cancelled("remediate", processed.load(Ordering::Relaxed));
        }
        outcomes.sort_by(|a, b| a.resource.sort_key().cmp(&b.resource.sort_key()));

        let report = RemediationReport {
            generated_at: Utc::now(),
            region: self.region.clone(),
            dry_run: self.dry_run,
            tag_template: self.tag_template.clone(),
            outcomes,
            enumeration_failures,
            cancelled,
        };
        tracing::info!(
            processed = report.outcomes.len(),
            tagged = report.tagged(),
            failed = report.failed(),
            "remediation finished"
        );
        Ok(report)
    }
}

/// Substitute `{resource_type}`, `{resource_id}` and `{region}` in a
/// template value.
pub fn expand_placeholders(template: &str, resource: &ResourceDescriptor, region: &str) -> String {
    if !template.contains('{') {
        return template.to_string();
    }
    template
        .replace("{resource_type}", resource.resource_type.as_str())
        .replace("{resource_id}", &resource.resource_id)
        .replace("{region}", region)
}

/// Reject a tag template that could never be written.
pub fn validate_template(template: &TagSet) -> Result<(), SetupError> {
    for (key, value) in template.iter() {
        validation::validate_template_tag(key, value).map_err(|reason| SetupError::InvalidTagArgument {
            argument: format!("{key}={value}"),
            reason,
        })?;
    }
    Ok(())
}
