//! protoc-gen-authz: protoc plugin and CLI.
//!
//! Usage:
//! ```bash
//! protoc --authz_out=gen --authz_opt=format=rust -I proto proto/foo/v1/foo.proto
//! protoc-gen-authz extract --descriptor-set foo.pb --source-root proto
//! protoc-gen-authz init
//! ```
//!
//! Without a subcommand the binary speaks the protoc plugin protocol on
//! stdin/stdout, so logs always go to stderr.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "PROTOC_AUTHZ_LOG";

/// Extracts HTTP authorization rules from proto service definitions
#[derive(Parser)]
#[command(name = "protoc-gen-authz")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract rules from a serialized FileDescriptorSet and print a report
    Extract(commands::extract::ExtractArgs),

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for extraction reports.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One line per rule or skip.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let source =
        config_resolver::Resolver::from_env().resolve(Path::new("."), cli.config.as_deref());

    match cli.command {
        None => commands::plugin::run(&source),
        Some(Commands::Extract(args)) => commands::extract::run(args, &source),
        Some(Commands::Init { force }) => commands::init::run(force),
    }
}
