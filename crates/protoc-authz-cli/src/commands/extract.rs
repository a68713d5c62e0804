//! Extract command implementation.

use anyhow::{bail, Context, Result};
use protoc_authz_core::prost_reflect::DescriptorPool;
use protoc_authz_core::{pool_from_descriptor_set, Config, ExtractionReport, Extractor};
use std::path::PathBuf;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Arguments of `protoc-gen-authz extract`.
#[derive(Debug, clap::Args)]
pub struct ExtractArgs {
    /// Serialized FileDescriptorSet (`protoc --include_imports -o`)
    #[arg(short, long)]
    pub descriptor_set: PathBuf,

    /// Proto files to extract (default: every file declaring a service)
    #[arg(long = "file")]
    pub files: Vec<String>,

    /// Directories holding the proto sources (can be specified multiple times)
    #[arg(short = 'I', long = "source-root")]
    pub source_roots: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Exit with an error when any method is skipped for a hard reason
    #[arg(long)]
    pub strict: bool,
}

/// Runs the extract command.
pub fn run(args: ExtractArgs, source: &ConfigSource) -> Result<()> {
    let mut config = super::load_config(source)?;
    if !args.source_roots.is_empty() {
        config.extractor.source_roots = args.source_roots;
    }
    config.extractor.strict |= args.strict;

    let bytes = std::fs::read(&args.descriptor_set).with_context(|| {
        format!(
            "Failed to read descriptor set: {}",
            args.descriptor_set.display()
        )
    })?;
    let pool = pool_from_descriptor_set(&bytes).context("Failed to decode descriptor set")?;

    let report = extract(&pool, &args.files, &config)?;

    super::output::print(&report, args.format)?;

    if config.extractor.strict && report.has_hard_failures() {
        std::process::exit(1);
    }

    Ok(())
}

/// Extracts rules from the named files, or from every file with a service.
pub fn extract(pool: &DescriptorPool, files: &[String], config: &Config) -> Result<ExtractionReport> {
    let mut extractor = Extractor::builder()
        .config(&config.extractor)
        .build(pool)
        .context("Failed to build extractor")?;

    let targets = if files.is_empty() {
        pool.files()
            .filter(|f| f.services().next().is_some())
            .collect::<Vec<_>>()
    } else {
        let mut targets = Vec::with_capacity(files.len());
        for name in files {
            let Some(file) = pool.get_file_by_name(name) else {
                bail!("{name} is not in the descriptor set");
            };
            targets.push(file);
        }
        targets
    };

    tracing::info!("Extracting from {} file(s)", targets.len());

    let mut report = ExtractionReport::new();
    for file in &targets {
        report.extend(extractor.extract_file(file));
    }
    Ok(report)
}
