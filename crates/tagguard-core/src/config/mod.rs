pub mod backend_config;
pub mod defaults;
pub mod observability_config;
pub mod policy_config;
pub mod remediation_config;
pub mod report_config;
pub mod retry_config;
pub mod runtime_config;
pub mod tagguard_config;

pub use backend_config::{BackendConfig, BackendKind};
pub use observability_config::ObservabilityConfig;
pub use policy_config::PolicyConfig;
pub use remediation_config::RemediationConfig;
pub use report_config::ReportConfig;
pub use retry_config::RetryConfig;
pub use runtime_config::RuntimeConfig;
pub use tagguard_config::{CliOverrides, TagguardConfig};
