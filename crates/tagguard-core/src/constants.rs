/// Tag key length limits (characters).
pub const MAX_TAG_KEY_LEN: usize = 128;

/// Tag value length limit (characters). Empty values are allowed.
pub const MAX_TAG_VALUE_LEN: usize = 256;

/// Prefix reserved by the provider for system tags.
pub const RESERVED_TAG_PREFIX: &str = "aws:";

/// Separator between entries of `missing_tags` and `existing_tags` in reports.
pub const REPORT_LIST_SEPARATOR: char = ';';

/// Column header of the audit report.
pub const AUDIT_REPORT_HEADER: [&str; 6] = [
    "resource_type",
    "resource_id",
    "resource_arn",
    "compliant",
    "missing_tags",
    "existing_tags",
];

/// Column header of the remediation outcome report.
pub const REMEDIATION_REPORT_HEADER: [&str; 6] = [
    "resource_type",
    "resource_id",
    "resource_arn",
    "state",
    "applied_tags",
    "error",
];

/// Compliance rate under which the printed summary lists recommendations.
pub const RECOMMENDATION_THRESHOLD: f64 = 0.95;

/// Placeholders a remediation tag value may contain, expanded per resource.
pub const TAG_PLACEHOLDERS: [&str; 3] = ["{resource_type}", "{resource_id}", "{region}"];
