//! `inbox-relay check-config`: load the effective configuration and print a
//! validation report without contacting any remote service.

use std::path::Path;

use {
    anyhow::Result,
    relay_config::{RelayConfig, Severity, ValidationResult},
};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn color(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => RED,
        Severity::Warning => YELLOW,
        Severity::Info => CYAN,
    }
}

/// One line per diagnostic, plus a summary of what the relay would do.
fn report_lines(config: &RelayConfig, result: &ValidationResult) -> Vec<String> {
    let mut lines: Vec<String> = result
        .diagnostics
        .iter()
        .map(|d| {
            format!(
                "  [{}{}{RESET}]  {}: {}",
                color(d.severity),
                d.severity,
                d.path,
                d.message
            )
        })
        .collect();

    if !result.has_errors() {
        let photos = if config.storage_enabled() {
            format!("uploaded to bucket {}", config.storage.bucket)
        } else {
            "refused".to_string()
        };
        lines.push(format!("  [{GREEN}ok{RESET}]  relay is ready, photos will be {photos}"));
    }
    lines
}

pub fn handle_check_config(config_path: Option<&Path>) -> Result<()> {
    let source = config_path
        .map(Path::to_path_buf)
        .or_else(relay_config::find_config_file);
    match &source {
        Some(path) => eprintln!("{BOLD}config{RESET} {}", path.display()),
        None => eprintln!("{BOLD}config{RESET} (environment only)"),
    }

    let config = relay_config::load(config_path)?;
    let result = relay_config::validate(&config);
    for line in report_lines(&config, &result) {
        eprintln!("{line}");
    }

    let errors = result.count(Severity::Error);
    if errors > 0 {
        anyhow::bail!("configuration has {errors} error(s)");
    }
    Ok(())
}
