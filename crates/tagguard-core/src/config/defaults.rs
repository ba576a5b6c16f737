// Single source of truth for all default values.

// --- Policy ---
pub const DEFAULT_REQUIRED_TAGS: [&str; 4] = ["Environment", "Owner", "CostCenter", "Application"];
pub const DEFAULT_TREAT_EMPTY_AS_MISSING: bool = true;

// --- Remediation ---
pub const DEFAULT_OWNER_TAG: (&str, &str) = ("Owner", "platform-team");
pub const DEFAULT_COST_CENTER_TAG: (&str, &str) = ("CostCenter", "eng-001");
pub const DEFAULT_OVERWRITE_EXISTING: bool = false;
pub const DEFAULT_MAX_TAGS_PER_RESOURCE: usize = 50;

// --- Retry ---
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY_MS: u64 = 1_000;
pub const DEFAULT_MAX_DELAY_MS: u64 = 30_000;
pub const DEFAULT_JITTER: bool = true;

// --- Backend ---
pub const DEFAULT_CALL_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const DEFAULT_API_TOKEN_ENV: &str = "TAGGUARD_API_TOKEN";

// --- Runtime ---
pub const DEFAULT_CONCURRENCY: usize = 5;
pub const MAX_CONCURRENCY: usize = 10;

// --- Report ---
pub const DEFAULT_REPORT_PATH: &str = "tag_audit_report.csv";
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1_024;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;

// --- Files ---
pub const PROJECT_CONFIG_FILENAME: &str = "tagguard.toml";
pub const USER_CONFIG_DIR: &str = ".tagguard";
