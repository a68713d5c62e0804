//! protoc plugin mode.
//!
//! Reads a `CodeGeneratorRequest` from stdin and writes a
//! `CodeGeneratorResponse` to stdout. Problems with the input protos are
//! reported through the response's `error` field; only undecodable input
//! makes the process fail.

use anyhow::{Context, Result};
use prost::Message;
use prost_types::compiler::code_generator_response::{Feature, File};
use prost_types::compiler::CodeGeneratorResponse;
use protoc_authz_core::{Config, Extractor, PluginRequest};
use protoc_authz_emit::emitter_for;
use std::io::{Read, Write};
use tracing::{debug, info};

use crate::config_resolver::ConfigSource;

/// Runs the plugin against stdin/stdout.
pub fn run(source: &ConfigSource) -> Result<()> {
    let config = super::load_config(source)?;

    let mut input = Vec::new();
    std::io::stdin()
        .read_to_end(&mut input)
        .context("Failed to read CodeGeneratorRequest from stdin")?;

    let response = generate(&input, config)?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(&response.encode_to_vec())
        .context("Failed to write CodeGeneratorResponse")?;
    stdout.flush()?;
    Ok(())
}

/// Builds the response for an encoded request.
pub fn generate(input: &[u8], mut config: Config) -> Result<CodeGeneratorResponse> {
    let request = PluginRequest::decode(input).context("Failed to decode CodeGeneratorRequest")?;

    if let Some(parameter) = request.parameter.as_deref() {
        if let Err(e) = config.apply_parameters(parameter) {
            return Ok(failure(e.to_string()));
        }
    }

    let mut extractor = match Extractor::builder()
        .config(&config.extractor)
        .build(&request.pool)
    {
        Ok(extractor) => extractor,
        Err(e) => return Ok(failure(e.to_string())),
    };
    let emitter = emitter_for(config.output.format);

    let mut files = Vec::new();
    let mut hard = Vec::new();

    for name in &request.files_to_generate {
        let Some(file) = request.pool.get_file_by_name(name) else {
            return Ok(failure(format!("{name}: not present in the request")));
        };

        let report = extractor.extract_file(&file);
        hard.extend(
            report
                .skipped
                .iter()
                .filter(|s| s.is_hard())
                .map(ToString::to_string),
        );

        if report.rules.is_empty() && !config.output.emit_empty {
            debug!("{name}: no rules, nothing generated");
            continue;
        }

        let output_name = emitter.file_name(name);
        let content = emitter.render(name, &report.rules)?;
        info!("{name}: {} rule(s) -> {output_name}", report.rules.len());
        files.push(File {
            name: Some(output_name),
            content: Some(content),
            ..Default::default()
        });
    }

    if config.extractor.strict && !hard.is_empty() {
        return Ok(failure(format!(
            "{} method(s) could not be extracted:\n{}",
            hard.len(),
            hard.join("\n")
        )));
    }

    Ok(CodeGeneratorResponse {
        file: files,
        supported_features: Some(Feature::Proto3Optional as u64),
        ..Default::default()
    })
}

fn failure(message: String) -> CodeGeneratorResponse {
    CodeGeneratorResponse {
        error: Some(message),
        supported_features: Some(Feature::Proto3Optional as u64),
        ..Default::default()
    }
}
