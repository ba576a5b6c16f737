use serde::{Deserialize, Serialize};
use tagguard_core::ComplianceResult;

/// One CSV row of the audit report, in header order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRow {
    pub resource_type: String,
    pub resource_id: String,
    pub resource_arn: String,
    pub compliant: bool,
    /// `;`-joined.
    pub missing_tags: String,
    /// `key=value;key=value`.
    pub existing_tags: String,
}

impl From<&ComplianceResult> for AuditRow {
    fn from(result: &ComplianceResult) -> Self {
        Self {
            resource_type: result.resource.resource_type.to_string(),
            resource_id: result.resource.resource_id.clone(),
            resource_arn: result.resource.resource_arn.clone(),
            compliant: result.compliant,
            missing_tags: result.missing_tags_joined(),
            existing_tags: result.existing_tags.to_report_string(),
        }
    }
}
