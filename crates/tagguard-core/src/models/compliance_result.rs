use serde::Serialize;

use super::{ResourceDescriptor, TagSet};

/// Outcome of evaluating one resource against the policy. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceResult {
    pub resource: ResourceDescriptor,
    /// Required keys absent or blank, in policy order.
    pub missing_tags: Vec<String>,
    /// True iff `missing_tags` is empty.
    pub compliant: bool,
    pub existing_tags: TagSet,
    /// Number of keys the policy required when this result was built.
    pub required_count: usize,
}

impl ComplianceResult {
    /// Fraction of required tags present, 1.0 for an empty policy.
    pub fn compliance_score(&self) -> f64 {
        if self.required_count == 0 {
            return 1.0;
        }
        let present = self.required_count.saturating_sub(self.missing_tags.len());
        present as f64 / self.required_count as f64
    }

    /// `missing_tags` joined with `;` as it appears in the report.
    pub fn missing_tags_joined(&self) -> String {
        self.missing_tags.join(";")
    }
}
