use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tagguard_core::CancellationToken;
use tagguard_engine::{build_backend, Auditor, ReportSink};

use crate::cli::{Cli, ScopeArgs};
use crate::output;

/// Completes with success whatever the compliance rate; only setup
/// failures are errors.
pub fn run(cli: &Cli, scope: &ScopeArgs, report_path: Option<&Path>) -> anyhow::Result<ExitCode> {
    let mut overrides = super::overrides(cli, scope);
    overrides.output_path = report_path.map(|p| p.display().to_string());
    let config = super::load_config(cli, &overrides)?;

    let cancel = CancellationToken::new();
    let backend = build_backend(&config)?;
    let auditor = Auditor::from_config(&config, backend, cancel.clone())?;
    let path = PathBuf::from(&config.report.output_path);
    let sink = ReportSink::create(
        Some(&path),
        config.report.channel_capacity,
        auditor.region(),
        auditor.policy(),
    )?;

    super::cancel_on_interrupt(cancel);
    let summary = auditor.run(sink)?;
    output::print_audit_summary(cli.json, &summary)?;
    Ok(ExitCode::SUCCESS)
}
