//! Top-level configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{
    defaults, BackendConfig, BackendKind, ObservabilityConfig, PolicyConfig, RemediationConfig,
    ReportConfig, RetryConfig, RuntimeConfig,
};
use crate::errors::ConfigError;
use crate::validation;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`TAGGUARD_*`)
/// 3. Project config (`--config` path, else `tagguard.toml` in the working directory)
/// 4. User config (`~/.tagguard/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TagguardConfig {
    pub policy: PolicyConfig,
    pub remediation: RemediationConfig,
    pub retry: RetryConfig,
    pub backend: BackendConfig,
    pub runtime: RuntimeConfig,
    pub report: ReportConfig,
    pub observability: ObservabilityConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub inventory_path: Option<String>,
    pub concurrency: Option<usize>,
    pub resource_types: Option<Vec<String>>,
    pub output_path: Option<String>,
    pub overwrite_existing: Option<bool>,
    pub log_level: Option<String>,
}

impl TagguardConfig {
    /// Load configuration from the user config, an optional project config,
    /// the process environment, and CLI overrides.
    pub fn load(
        project_config: Option<&Path>,
        cli_overrides: Option<&CliOverrides>,
    ) -> Result<Self, ConfigError> {
        let project = match project_config {
            Some(path) => Some(path.to_path_buf()),
            None => {
                let candidate = PathBuf::from(defaults::PROJECT_CONFIG_FILENAME);
                candidate.exists().then_some(candidate)
            }
        };
        Self::load_layers(
            Self::user_config_path().as_deref(),
            project.as_deref(),
            |key| std::env::var(key).ok(),
            cli_overrides,
        )
    }

    /// Load with explicit layers. `env` looks up an environment variable.
    ///
    /// A missing user config is skipped, a missing project config is an error.
    pub fn load_layers(
        user_config: Option<&Path>,
        project_config: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
        cli_overrides: Option<&CliOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut merged = toml::Value::try_from(Self::default()).map_err(|e| {
            ConfigError::ParseError {
                path: "<defaults>".to_string(),
                message: e.to_string(),
            }
        })?;

        // Layer 4 (lowest priority): user config
        if let Some(path) = user_config.filter(|p| p.exists()) {
            merge_values(&mut merged, read_toml_file(path)?);
        }

        // Layer 3: project config
        if let Some(path) = project_config {
            merge_values(&mut merged, read_toml_file(path)?);
        }

        let mut config: TagguardConfig =
            merged.try_into().map_err(|e: toml::de::Error| ConfigError::ParseError {
                path: "<merged>".to_string(),
                message: e.to_string(),
            })?;

        // Layer 2: environment variables
        config.apply_env_overrides(env);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            config.apply_cli_overrides(cli);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.policy.required_tags.is_empty() {
            return Err(invalid("policy.required_tags", "must list at least one tag"));
        }
        if self.policy.required_tags.iter().any(|k| k.trim().is_empty()) {
            return Err(invalid("policy.required_tags", "tag keys must not be blank"));
        }
        for (key, value) in &self.remediation.default_tags {
            validation::validate_template_tag(key, value)
                .map_err(|reason| invalid("remediation.default_tags", &reason))?;
        }
        if self.remediation.max_tags_per_resource == 0 {
            return Err(invalid("remediation.max_tags_per_resource", "must be greater than 0"));
        }
        if self.retry.max_attempts == 0 {
            return Err(invalid("retry.max_attempts", "must be at least 1"));
        }
        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            return Err(invalid("retry.base_delay_ms", "must not exceed retry.max_delay_ms"));
        }
        if self.backend.call_timeout_secs == 0 {
            return Err(invalid("backend.call_timeout_secs", "must be greater than 0"));
        }
        if self.backend.page_size == 0 {
            return Err(invalid("backend.page_size", "must be greater than 0"));
        }
        if !(1..=defaults::MAX_CONCURRENCY).contains(&self.runtime.concurrency) {
            return Err(invalid(
                "runtime.concurrency",
                &format!("must be between 1 and {}", defaults::MAX_CONCURRENCY),
            ));
        }
        if let Err(e) = self.runtime.effective_resource_types() {
            return Err(invalid("runtime.resource_types", &e.to_string()));
        }
        if self.report.channel_capacity == 0 {
            return Err(invalid("report.channel_capacity", "must be greater than 0"));
        }
        Ok(())
    }

    /// Returns the user config path: `~/.tagguard/config.toml`.
    pub fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(defaults::USER_CONFIG_DIR).join("config.toml"))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(val) = env("TAGGUARD_REGION") {
            self.runtime.region = Some(val);
        }
        if let Some(val) = env("TAGGUARD_ENDPOINT") {
            self.backend.endpoint = Some(val);
        }
        if let Some(val) = env(defaults::DEFAULT_API_TOKEN_ENV) {
            self.backend.api_token = Some(val);
        }
        if let Some(val) = env("TAGGUARD_CONCURRENCY") {
            if let Ok(v) = val.parse::<usize>() {
                self.runtime.concurrency = v;
            }
        }
        if let Some(val) = env("TAGGUARD_LOG_LEVEL") {
            self.observability.log_level = val;
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(&mut self, cli: &CliOverrides) {
        if let Some(ref v) = cli.region {
            self.runtime.region = Some(v.clone());
        }
        if let Some(ref v) = cli.endpoint {
            self.backend.endpoint = Some(v.clone());
            self.backend.kind = BackendKind::Http;
        }
        if let Some(ref v) = cli.inventory_path {
            self.backend.inventory_path = Some(v.clone());
            self.backend.kind = BackendKind::Inventory;
        }
        if let Some(v) = cli.concurrency {
            self.runtime.concurrency = v;
        }
        if let Some(ref v) = cli.resource_types {
            self.runtime.resource_types = v.clone();
        }
        if let Some(ref v) = cli.output_path {
            self.report.output_path = v.clone();
        }
        if let Some(v) = cli.overwrite_existing {
            self.remediation.overwrite_existing = v;
        }
        if let Some(ref v) = cli.log_level {
            self.observability.log_level = v.clone();
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
            message: e.to_string(),
        })
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn read_toml_file(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => ConfigError::Unreadable {
            path: path.display().to_string(),
            source: e,
        },
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Deep-merge `overlay` into `base`. Tables merge key by key, every other
/// value in `overlay` replaces the one in `base`.
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
