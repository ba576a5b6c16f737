mod audit;
mod remediate;

use std::process::ExitCode;

use anyhow::Context;
use tagguard_core::config::CliOverrides;
use tagguard_core::tracing::init_tracing;
use tagguard_core::{CancellationToken, TagguardConfig};

use crate::cli::{Cli, Commands, ScopeArgs};

/// At least one resource failed to write.
pub const EXIT_WRITE_FAILURES: u8 = 1;
/// Configuration or setup failed before any resource was processed.
pub const EXIT_SETUP_ERROR: u8 = 2;

pub fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    match &cli.command {
        Commands::Audit { scope, output } => audit::run(cli, scope, output.as_deref()),
        Commands::Remediate {
            scope,
            tags,
            dry_run,
            overwrite,
            output,
        } => remediate::run(
            cli,
            scope,
            remediate::RemediateArgs {
                tags: tags.as_deref(),
                dry_run: *dry_run,
                overwrite: *overwrite,
                output: output.as_deref(),
            },
        ),
    }
}

fn overrides(cli: &Cli, scope: &ScopeArgs) -> CliOverrides {
    CliOverrides {
        region: scope.region.clone(),
        endpoint: scope.endpoint.clone(),
        inventory_path: scope.inventory.as_ref().map(|p| p.display().to_string()),
        concurrency: scope.concurrency,
        resource_types: (!scope.types.is_empty()).then(|| scope.types.clone()),
        log_level: match cli.verbose {
            0 => None,
            1 => Some("debug".to_string()),
            _ => Some("trace".to_string()),
        },
        ..Default::default()
    }
}

fn load_config(cli: &Cli, overrides: &CliOverrides) -> anyhow::Result<TagguardConfig> {
    let config = TagguardConfig::load(cli.config.as_deref(), Some(overrides))
        .context("failed to load configuration")?;
    init_tracing(&config.observability);
    tracing::debug!(backend = ?config.backend.kind, "configuration loaded");
    Ok(config)
}

/// Cancel `token` on Ctrl-C. In-flight calls finish; no new work starts.
fn cancel_on_interrupt(token: CancellationToken) {
    let spawned = std::thread::Builder::new()
        .name("tagguard-signal".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    tracing::warn!(error = %e, "interrupt handler unavailable");
                    return;
                }
            };
            runtime.block_on(async {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("interrupt received, finishing in-flight work");
                    token.cancel();
                }
            });
        });
    if let Err(e) = spawned {
        tracing::warn!(error = %e, "interrupt handler unavailable");
    }
}
