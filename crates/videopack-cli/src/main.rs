mod cmd_assemble;
mod cmd_hash;
mod cmd_inspect;
mod cmd_upgrade;
mod cmd_validate;
mod config;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use videopack_core::{UpgradePolicy, ValidationMode};

#[derive(Parser)]
#[command(name = "videopack", version, about = "Validate and manage VideoPack documents")]
struct Cli {
    /// Config file (defaults to $VIDEOPACK_CONFIG, then ./.videopack.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check one or more pack files; prints OK on success
    Validate {
        /// Pack JSON files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Report every violation instead of stopping at the first
        #[arg(long)]
        all: bool,
        /// Upgrade older documents before checking
        #[arg(long)]
        upgrade: bool,
    },
    /// Summarize a pack
    Inspect {
        path: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the stable content hash of any JSON file
    Hash { path: PathBuf },
    /// Rewrite an older document in the current format
    Upgrade {
        path: PathBuf,
        /// Destination (defaults to rewriting PATH in place)
        #[arg(long)]
        out: Option<PathBuf>,
        /// hard_fail or best_effort (defaults to the configured policy)
        #[arg(long)]
        policy: Option<UpgradePolicy>,
    },
    /// Build a pack from transcript/metadata JSON
    Assemble {
        /// Source JSON shaped like {video_id, transcript, ...}
        source: PathBuf,
        /// Where to write the pack
        #[arg(short, long)]
        out: PathBuf,
        /// Tool version to record in provenance, NAME=VERSION (repeatable)
        #[arg(long = "tool", value_parser = cmd_assemble::parse_tool)]
        tools: Vec<(String, String)>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("VIDEOPACK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;
    let config = config::load(cli.config.as_deref(), &cwd)?;

    match cli.cmd {
        Command::Validate {
            paths,
            all,
            upgrade,
        } => cmd_validate::execute(&cmd_validate::ValidateParams {
            paths: &paths,
            mode: if all {
                ValidationMode::CollectAll
            } else {
                config.validation
            },
            upgrade: upgrade.then_some(config.upgrade_policy),
        }),
        Command::Inspect { path, json } => cmd_inspect::execute(&path, json),
        Command::Hash { path } => cmd_hash::execute(&path),
        Command::Upgrade { path, out, policy } => cmd_upgrade::execute(
            &path,
            out.as_deref(),
            policy.unwrap_or(config.upgrade_policy),
        ),
        Command::Assemble { source, out, tools } => {
            cmd_assemble::execute(&source, &out, &config.tool_versions, &tools)
        }
    }
}
