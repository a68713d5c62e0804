//! Shared output formatting for extraction reports.

use anyhow::Result;
use protoc_authz_core::{AuthzRule, ErrorClass, ExtractionReport};

use crate::OutputFormat;

/// Print an extraction report in the specified format.
pub fn print(report: &ExtractionReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(report),
        OutputFormat::Json => return print_json(report),
        OutputFormat::Compact => print_compact(report),
    }
    Ok(())
}

fn requirement(rule: &AuthzRule) -> String {
    if rule.no_auth_required {
        "no auth required".to_string()
    } else if rule.permissions.is_empty() {
        "authenticated".to_string()
    } else {
        rule.permissions.join(", ")
    }
}

fn print_text(report: &ExtractionReport) {
    for rule in &report.rules {
        println!(
            "\x1b[32m{:<6}\x1b[0m {}",
            rule.http_method.as_str(),
            rule.http_path
        );
        println!("  = {}", requirement(rule));
    }
    if !report.rules.is_empty() {
        println!();
    }

    for skip in &report.skipped {
        let class_indicator = match skip.class {
            ErrorClass::Hard => "\x1b[31mhard\x1b[0m",
            ErrorClass::Soft => "\x1b[34msoft\x1b[0m",
        };
        println!(
            "{}.{} in {} [{}]",
            skip.service,
            skip.method,
            skip.file.display(),
            skip.kind,
        );
        println!("  {}: {} (at {})", class_indicator, skip.message, skip.stage);
        println!();
    }

    let (hard, soft) = report.count_skips();
    let summary_color = if hard > 0 { "\x1b[31m" } else { "\x1b[32m" };

    println!(
        "{}Extracted {} rule(s) from {} method(s) in {} file(s); skipped {} hard, {} soft\x1b[0m",
        summary_color,
        report.rules.len(),
        report.methods_seen,
        report.files_processed,
        hard,
        soft
    );
}

fn print_json(report: &ExtractionReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}

fn print_compact(report: &ExtractionReport) {
    for rule in &report.rules {
        println!("rule {}: {}", rule.lookup_key(), requirement(rule));
    }
    for skip in &report.skipped {
        println!("skip {skip}");
    }
}
