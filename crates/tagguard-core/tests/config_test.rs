use std::collections::HashMap;

use tagguard_core::config::*;
use tagguard_core::errors::ConfigError;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = TagguardConfig::from_toml("").unwrap();

    // Policy defaults
    assert_eq!(
        config.policy.required_tags,
        vec!["Environment", "Owner", "CostCenter", "Application"]
    );
    assert!(config.policy.treat_empty_as_missing);

    // Remediation defaults
    assert_eq!(
        config.remediation.default_tags.get("Owner").map(String::as_str),
        Some("platform-team")
    );
    assert_eq!(
        config.remediation.default_tags.get("CostCenter").map(String::as_str),
        Some("eng-001")
    );
    assert!(!config.remediation.overwrite_existing);
    assert_eq!(config.remediation.max_tags_per_resource, 50);

    // Retry defaults
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.retry.base_delay_ms, 1_000);
    assert!(config.retry.jitter);

    // Backend defaults
    assert_eq!(config.backend.kind, BackendKind::Http);
    assert_eq!(config.backend.call_timeout_secs, 30);
    assert!(config.backend.endpoint.is_none());

    // Runtime defaults
    assert!(config.runtime.region.is_none());
    assert_eq!(config.runtime.concurrency, 5);
    assert_eq!(config.runtime.effective_resource_types().unwrap().len(), 6);

    // Report & observability defaults
    assert_eq!(config.report.output_path, "tag_audit_report.csv");
    assert_eq!(config.observability.log_level, "info");
    assert!(!config.observability.json_logs);

    assert!(config.validate().is_ok());
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[policy]
required_tags = ["Owner", "Team"]

[runtime]
region = "eu-west-1"
resource_types = ["cluster", "log-group"]
"#;
    let config = TagguardConfig::from_toml(toml).unwrap();
    assert_eq!(config.policy.required_tags, vec!["Owner", "Team"]);
    assert_eq!(config.runtime.region.as_deref(), Some("eu-west-1"));
    assert_eq!(config.runtime.effective_resource_types().unwrap().len(), 2);
    // Non-overridden fields keep defaults
    assert!(config.policy.treat_empty_as_missing);
    assert_eq!(config.runtime.concurrency, 5);
}

#[test]
fn config_serde_roundtrip() {
    let mut config = TagguardConfig::default();
    config.runtime.region = Some("us-east-1".to_string());
    let toml_str = config.to_toml().unwrap();
    let roundtripped = TagguardConfig::from_toml(&toml_str).unwrap();
    assert_eq!(roundtripped.runtime.region, config.runtime.region);
    assert_eq!(roundtripped.remediation.default_tags, config.remediation.default_tags);
    assert_eq!(roundtripped.retry.max_delay_ms, config.retry.max_delay_ms);
}

// ─── Layering ───

#[test]
fn project_file_overrides_user_file_and_merges_tables() {
    let dir = tempfile::tempdir().unwrap();
    let user = dir.path().join("user.toml");
    let project = dir.path().join("project.toml");
    std::fs::write(
        &user,
        "[runtime]\nregion = \"us-west-2\"\nconcurrency = 2\n[remediation.default_tags]\nTeam = \"core\"\n",
    )
    .unwrap();
    std::fs::write(&project, "[runtime]\nconcurrency = 8\n").unwrap();

    let config = TagguardConfig::load_layers(Some(&user), Some(&project), no_env, None).unwrap();
    assert_eq!(config.runtime.region.as_deref(), Some("us-west-2"));
    assert_eq!(config.runtime.concurrency, 8);
    // default_tags merge key by key with compiled defaults
    assert_eq!(
        config.remediation.default_tags.get("Team").map(String::as_str),
        Some("core")
    );
    assert!(config.remediation.default_tags.contains_key("Owner"));
}

#[test]
fn env_overrides_file_and_cli_overrides_env() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("tagguard.toml");
    std::fs::write(&project, "[runtime]\nregion = \"from-file\"\n").unwrap();
    let env: HashMap<&str, &str> = [
        ("TAGGUARD_REGION", "from-env"),
        ("TAGGUARD_CONCURRENCY", "7"),
        ("TAGGUARD_API_TOKEN", "secret"),
    ]
    .into_iter()
    .collect();
    let lookup = |key: &str| env.get(key).map(|v| v.to_string());

    let config = TagguardConfig::load_layers(None, Some(&project), lookup, None).unwrap();
    assert_eq!(config.runtime.region.as_deref(), Some("from-env"));
    assert_eq!(config.runtime.concurrency, 7);
    assert_eq!(config.backend.api_token.as_deref(), Some("secret"));

    let cli = CliOverrides {
        region: Some("from-cli".to_string()),
        inventory_path: Some("inventory.json".to_string()),
        ..Default::default()
    };
    let config = TagguardConfig::load_layers(None, Some(&project), lookup, Some(&cli)).unwrap();
    assert_eq!(config.runtime.region.as_deref(), Some("from-cli"));
    assert_eq!(config.backend.kind, BackendKind::Inventory);
    assert_eq!(config.backend.inventory_path.as_deref(), Some("inventory.json"));
}

#[test]
fn missing_user_file_is_skipped_but_missing_project_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let absent = dir.path().join("absent.toml");
    assert!(TagguardConfig::load_layers(Some(&absent), None, no_env, None).is_ok());
    let err = TagguardConfig::load_layers(None, Some(&absent), no_env, None).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound { .. }));
}

#[test]
fn malformed_file_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("bad.toml");
    std::fs::write(&project, "[runtime\nregion = ").unwrap();
    let err = TagguardConfig::load_layers(None, Some(&project), no_env, None).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

// ─── Validation ───

fn validation_field(config: &TagguardConfig) -> String {
    match config.validate() {
        Err(ConfigError::ValidationFailed { field, .. }) => field,
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn concurrency_must_be_in_range() {
    let mut config = TagguardConfig::default();
    config.runtime.concurrency = 0;
    assert_eq!(validation_field(&config), "runtime.concurrency");
    config.runtime.concurrency = 11;
    assert_eq!(validation_field(&config), "runtime.concurrency");
    config.runtime.concurrency = 10;
    assert!(config.validate().is_ok());
}

#[test]
fn empty_policy_is_rejected() {
    let mut config = TagguardConfig::default();
    config.policy.required_tags.clear();
    assert_eq!(validation_field(&config), "policy.required_tags");
}

#[test]
fn unknown_resource_type_is_rejected() {
    let mut config = TagguardConfig::default();
    config.runtime.resource_types = vec!["bucket".to_string()];
    assert_eq!(validation_field(&config), "runtime.resource_types");
}

#[test]
fn reserved_default_tag_is_rejected_but_placeholders_are_fine() {
    let mut config = TagguardConfig::default();
    config
        .remediation
        .default_tags
        .insert("Name".to_string(), "{resource_type}-{resource_id}".to_string());
    assert!(config.validate().is_ok());
    config
        .remediation
        .default_tags
        .insert("aws:owner".to_string(), "x".to_string());
    assert_eq!(validation_field(&config), "remediation.default_tags");
}

#[test]
fn retry_delays_must_be_ordered() {
    let mut config = TagguardConfig::default();
    config.retry.base_delay_ms = 60_000;
    assert_eq!(validation_field(&config), "retry.base_delay_ms");
}

#[test]
fn invalid_env_concurrency_is_ignored() {
    let config = TagguardConfig::load_layers(
        None,
        None,
        |key| (key == "TAGGUARD_CONCURRENCY").then(|| "lots".to_string()),
        None,
    )
    .unwrap();
    assert_eq!(config.runtime.concurrency, 5);
}
