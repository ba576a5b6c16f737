use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use tagguard_core::config::BackendKind;
use tagguard_core::errors::SetupError;
use tagguard_core::{CancellationToken, TagSet, TaggingBackend};
use tagguard_engine::backends::{build_inventory, inventory_path};
use tagguard_engine::report::write_outcomes;
use tagguard_engine::{build_backend, Remediator};

use crate::cli::{Cli, ScopeArgs};
use crate::output;

pub struct RemediateArgs<'a> {
    pub tags: Option<&'a str>,
    pub dry_run: bool,
    pub overwrite: bool,
    pub output: Option<&'a Path>,
}

/// Exits with [`super::EXIT_WRITE_FAILURES`] when any resource failed to write.
pub fn run(cli: &Cli, scope: &ScopeArgs, args: RemediateArgs<'_>) -> anyhow::Result<ExitCode> {
    let cli_tags = match args.tags {
        Some(raw) => TagSet::parse_assignments(raw)?,
        None => TagSet::new(),
    };
    let mut overrides = super::overrides(cli, scope);
    overrides.overwrite_existing = args.overwrite.then_some(true);
    let config = super::load_config(cli, &overrides)?;

    // The inventory is kept as a concrete type so the result can be saved.
    let inventory = match config.backend.kind {
        BackendKind::Inventory => Some(Arc::new(build_inventory(&config)?)),
        BackendKind::Http => None,
    };
    let backend: Arc<dyn TaggingBackend> = match &inventory {
        Some(inventory) => inventory.clone(),
        None => build_backend(&config)?,
    };

    let cancel = CancellationToken::new();
    let remediator = Remediator::from_config(&config, backend, &cli_tags, cancel.clone())?
        .with_dry_run(args.dry_run);
    if remediator.tag_template().is_empty() {
        return Err(SetupError::InvalidTagArgument {
            argument: String::new(),
            reason: "no tags to apply: pass --tags or configure remediation.default_tags"
                .to_string(),
        }
        .into());
    }

    super::cancel_on_interrupt(cancel);
    let report = remediator.run()?;

    if let Some(path) = args.output {
        write_outcomes(path, &report.outcomes)?;
    }
    if let (Some(inventory), false) = (&inventory, args.dry_run) {
        let path = inventory_path(&config)?;
        inventory.save(path)?;
        tracing::debug!(path = %path.display(), "inventory saved");
    }

    output::print_remediation(cli.json, &report)?;
    Ok(if report.has_write_errors() {
        ExitCode::from(super::EXIT_WRITE_FAILURES)
    } else {
        ExitCode::SUCCESS
    })
}
