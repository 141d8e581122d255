use anyhow::{Context, Result};
use mail_bouncer::ValidationResult;

use crate::args::OutputFormat;

pub fn render(result: &ValidationResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string(result).context("failed to encode result"),
        OutputFormat::Human => Ok(human(result)),
    }
}

/// Process exit status for `check`: 0 when valid, 2 when invalid.
pub fn exit_status(result: &ValidationResult) -> u8 {
    if result.is_valid { 0 } else { 2 }
}

fn human(result: &ValidationResult) -> String {
    let verdict = if result.is_valid { "valid" } else { "invalid" };
    if result.error.is_empty() {
        format!("{}: {verdict} ({})", result.email, result.description)
    } else {
        format!(
            "{}: {verdict} ({})\n  error: {}",
            result.email, result.description, result.error
        )
    }
}
