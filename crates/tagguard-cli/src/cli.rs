use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tagguard", version, about = "Audit and remediate required resource tags")]
pub struct Cli {
    #[arg(long, global = true, help = "Config file (default: ./tagguard.toml when present)")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        short,
        long,
        global = true,
        action = ArgAction::Count,
        help = "More log output (-v debug, -vv trace)"
    )]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report which resources lack required tags.
    Audit {
        #[command(flatten)]
        scope: ScopeArgs,
        #[arg(long, help = "CSV report path (default: tag_audit_report.csv)")]
        output: Option<PathBuf>,
    },
    /// Write missing required tags to non-compliant resources.
    Remediate {
        #[command(flatten)]
        scope: ScopeArgs,
        #[arg(long, help = "Tags to apply, as key=value pairs separated by commas")]
        tags: Option<String>,
        #[arg(long, default_value_t = false, help = "Compute the writes without applying them")]
        dry_run: bool,
        #[arg(long, default_value_t = false, help = "Write every given tag, not only missing ones")]
        overwrite: bool,
        #[arg(long, help = "CSV path for per-resource outcomes")]
        output: Option<PathBuf>,
    },
}

/// Where to look and how hard to work.
#[derive(Args, Debug, Clone)]
pub struct ScopeArgs {
    #[arg(long, help = "Region to audit (or TAGGUARD_REGION)")]
    pub region: Option<String>,
    #[arg(long, value_delimiter = ',', help = "Resource types, comma separated (default: all)")]
    pub types: Vec<String>,
    #[arg(long, conflicts_with = "endpoint", help = "Inventory snapshot to use as the backend")]
    pub inventory: Option<PathBuf>,
    #[arg(long, help = "Tagging gateway URL (or TAGGUARD_ENDPOINT)")]
    pub endpoint: Option<String>,
    #[arg(long, help = "Concurrent per-resource calls, 1-10")]
    pub concurrency: Option<usize>,
}
