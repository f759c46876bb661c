//! Result → human/json string formatting.
//!
//! Two modes:
//! - **Human** (default): pretty JSON documents, one-line verdicts
//! - **JSON** (`--json`): a single JSON object per result

use replikit_core::{to_wire, KeyPath, Mismatch, MismatchReason};
use replikit_engine::VerifyResponse;

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Format a document.
pub fn format_document(doc: &serde_json::Value, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => doc.to_string(),
        OutputMode::Human => serde_json::to_string_pretty(doc).unwrap_or_else(|_| doc.to_string()),
    }
}

/// Format the outcome of a comparison.
pub fn format_comparison(mismatch: Option<&Mismatch>, mode: OutputMode) -> String {
    match (mismatch, mode) {
        (None, OutputMode::Human) => "equal".to_string(),
        (None, OutputMode::Json) => serde_json::json!({"equal": true}).to_string(),
        (Some(m), OutputMode::Human) => {
            let what = match m.reason {
                MismatchReason::MismatchedProperty => "mismatch",
                MismatchReason::MissingBlob => "missing blob",
            };
            format!(
                "{} at '{}'\n  expected: {}\n  actual:   {}",
                what,
                display_path(&m.path),
                describe(m.expected.as_ref().map(to_wire)),
                describe(m.actual.as_ref().map(to_wire)),
            )
        }
        (Some(m), OutputMode::Json) => serde_json::json!({
            "equal": false,
            "path": display_path(&m.path),
            "reason": match m.reason {
                MismatchReason::MismatchedProperty => "mismatched_property",
                MismatchReason::MissingBlob => "missing_blob",
            },
            "expected": m.expected.as_ref().map(to_wire),
            "actual": m.actual.as_ref().map(to_wire),
        })
        .to_string(),
    }
}

/// Format a verification response.
pub fn format_verify(response: &VerifyResponse, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string(response)
            .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e)),
        OutputMode::Human if response.result => "verified".to_string(),
        OutputMode::Human => format!(
            "verification failed: {}",
            response.description.as_deref().unwrap_or("unknown reason")
        ),
    }
}

/// Format an error.
pub fn format_error(err: &anyhow::Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::json!({"error": format!("{:#}", err)}).to_string(),
        OutputMode::Human => format!("(error) {:#}", err),
    }
}

fn display_path(path: &KeyPath) -> String {
    if path.is_empty() {
        "$".to_string()
    } else {
        path.to_string()
    }
}

fn describe(value: Option<serde_json::Value>) -> String {
    value.map_or_else(|| "(absent)".to_string(), |v| v.to_string())
}
