use std::io::Write;

use ms2psd_rs::RunSummary;
use serde::Serialize;

/// JSON document printed by `--json`
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub input: &'a str,
    pub response: &'a str,
    pub output: &'a str,
    pub psd_out: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psd_copy: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Vec<String>>,
    pub summary: &'a RunSummary,
}

/// Write a JSON string to stdout
pub fn write_output(json: &str) -> Result<(), String> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(json.as_bytes())
        .and_then(|_| handle.write_all(b"\n"))
        .map_err(|e| format!("Failed to write to stdout: {}", e))
}

/// Serialize a value to pretty JSON
pub fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {}", e))
}
