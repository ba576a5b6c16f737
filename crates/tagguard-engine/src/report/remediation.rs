use std::path::Path;

use serde::Serialize;
use tagguard_core::constants::REMEDIATION_REPORT_HEADER;
use tagguard_core::errors::TagguardError;
use tagguard_core::{RemediationOutcome, TagguardResult};

/// One CSV row of the remediation outcome report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemediationRow {
    pub resource_type: String,
    pub resource_id: String,
    pub resource_arn: String,
    pub state: String,
    pub applied_tags: String,
    pub error: String,
}

impl From<&RemediationOutcome> for RemediationRow {
    fn from(outcome: &RemediationOutcome) -> Self {
        Self {
            resource_type: outcome.resource.resource_type.to_string(),
            resource_id: outcome.resource.resource_id.clone(),
            resource_arn: outcome.resource.resource_arn.clone(),
            state: outcome.state.as_str().to_string(),
            applied_tags: outcome.applied_tags.to_report_string(),
            error: outcome.error_string(),
        }
    }
}

/// Write remediation outcomes as CSV, sorted by resource type then id.
pub fn write_outcomes(path: &Path, outcomes: &[RemediationOutcome]) -> TagguardResult<()> {
    let report_err = |e: csv::Error| TagguardError::Report {
        reason: format!("{}: {e}", path.display()),
    };
    let mut sorted: Vec<&RemediationOutcome> = outcomes.iter().collect();
    sorted.sort_by(|a, b| a.resource.sort_key().cmp(&b.resource.sort_key()));

    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(report_err)?;
    csv.write_record(REMEDIATION_REPORT_HEADER).map_err(report_err)?;
    for outcome in sorted {
        csv.serialize(RemediationRow::from(outcome)).map_err(report_err)?;
    }
    csv.flush()?;
    Ok(())
}
