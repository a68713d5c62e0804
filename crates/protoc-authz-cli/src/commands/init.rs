//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# protoc-authz configuration
# Plugin parameters (--authz_opt=key=value,...) override these values.

[extractor]
# Method option carrying the authz block, read from the .proto source text
authz_option = "proto.v1.authz"

# Extension carrying the HTTP binding, read from compiled method options
http_extension = "google.api.http"

# Directories searched for the .proto sources named in descriptors.
# Usually the same as protoc's -I paths.
source_roots = ["."]

# Fail generation when a method is skipped for anything other than a
# missing authz block
strict = false

[output]
# "json" writes <stem>.authz.json, "rust" writes <stem>_authz.rs
format = "json"

# Generate a file even when a proto file yields no rules
emit_empty = false
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("protoc-authz.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created protoc-authz.toml");
    println!("\nNext steps:");
    println!("  1. Edit protoc-authz.toml to match your proto layout");
    println!("  2. Run: protoc --authz_out=gen -I proto proto/**/*.proto");

    Ok(())
}
