use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tagguard_core::errors::{EnumerationError, ErrorCode, FetchError};
use tagguard_core::{ComplianceResult, ResourceDescriptor, ResourceType};

/// `compliant / total`, or 0 when nothing was audited.
pub fn compliance_rate(compliant: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        compliant as f64 / total as f64
    }
}

/// Per-type counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeStats {
    pub total: usize,
    pub compliant: usize,
}

impl TypeStats {
    pub fn compliance_rate(&self) -> f64 {
        compliance_rate(self.compliant, self.total)
    }
}

/// A resource whose tags could not be read.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedResource {
    pub resource: ResourceDescriptor,
    pub code: String,
    pub reason: String,
}

/// A resource type whose listing failed.
#[derive(Debug, Clone, Serialize)]
pub struct EnumerationFailure {
    pub resource_type: String,
    pub code: String,
    pub reason: String,
}

impl EnumerationFailure {
    pub fn from_error(error: &EnumerationError) -> Self {
        Self {
            resource_type: error.resource_type_name(),
            code: error.error_code().to_string(),
            reason: error.to_string(),
        }
    }
}

/// Aggregate statistics of one audit run.
///
/// Skipped resources and failed listings are kept apart from
/// non-compliant ones: "could not check" is not "checked and failed".
#[derive(Debug, Clone, Serialize)]
pub struct AuditSummary {
    pub generated_at: DateTime<Utc>,
    pub region: String,
    pub required_tags: Vec<String>,
    pub report_path: Option<String>,
    pub total_audited: usize,
    pub compliant: usize,
    pub compliance_rate: f64,
    pub by_type: BTreeMap<ResourceType, TypeStats>,
    pub missing_tag_counts: BTreeMap<String, usize>,
    pub skipped: Vec<SkippedResource>,
    pub enumeration_failures: Vec<EnumerationFailure>,
    pub cancelled: bool,
}

impl AuditSummary {
    pub fn new(region: impl Into<String>, required_tags: Vec<String>, report_path: Option<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            region: region.into(),
            required_tags,
            report_path,
            total_audited: 0,
            compliant: 0,
            compliance_rate: 0.0,
            by_type: BTreeMap::new(),
            missing_tag_counts: BTreeMap::new(),
            skipped: Vec::new(),
            enumeration_failures: Vec::new(),
            cancelled: false,
        }
    }

    pub fn record(&mut self, result: &ComplianceResult) {
        self.total_audited += 1;
        let stats = self.by_type.entry(result.resource.resource_type).or_default();
        stats.total += 1;
        if result.compliant {
            self.compliant += 1;
            stats.compliant += 1;
        }
        for key in &result.missing_tags {
            *self.missing_tag_counts.entry(key.clone()).or_insert(0) += 1;
        }
        self.compliance_rate = compliance_rate(self.compliant, self.total_audited);
    }

    pub fn record_skipped(&mut self, resource: ResourceDescriptor, error: &FetchError) {
        self.skipped.push(SkippedResource {
            resource,
            code: error.error_code().to_string(),
            reason: error.to_string(),
        });
    }

    pub fn record_enumeration_failure(&mut self, error: &EnumerationError) {
        self.enumeration_failures
            .push(EnumerationFailure::from_error(error));
    }

    pub fn non_compliant(&self) -> usize {
        self.total_audited - self.compliant
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Missing tag keys by how many resources lack them, most common first.
    pub fn most_common_missing(&self) -> Vec<(&str, usize)> {
        let mut counts: Vec<(&str, usize)> = self
            .missing_tag_counts
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_is_zero_without_resources() {
        assert_eq!(compliance_rate(0, 0), 0.0);
    }

    #[test]
    fn rate_is_fraction_of_total() {
        assert_eq!(compliance_rate(3, 4), 0.75);
        assert_eq!(compliance_rate(4, 4), 1.0);
    }
}
