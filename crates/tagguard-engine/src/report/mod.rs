//! Audit and remediation reports.

mod remediation;
mod row;
mod sink;
mod summary;

pub use remediation::{write_outcomes, RemediationRow};
pub use row::AuditRow;
pub use sink::{ReportHandle, ReportSink};
pub use summary::{compliance_rate, AuditSummary, EnumerationFailure, SkippedResource, TypeStats};
