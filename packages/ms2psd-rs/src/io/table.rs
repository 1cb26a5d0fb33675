use std::io::Write;
use std::path::Path;

use crate::error::{Ms2PsdError, Result};
use crate::io::write_atomic;
use crate::types::PsdCurve;

/// Well-known location of the PSD table, relative to the working directory
pub const DEFAULT_PSD_PATH: &str = "psd_out.txt";

/// Two whitespace-separated columns: frequency (Hz) and power
pub fn format_psd_table(curve: &PsdCurve) -> String {
    curve
        .iter()
        .map(|(f, p)| format!("{:.6e} {:.6e}\n", f, p))
        .collect()
}

pub fn write_psd_table(path: &Path, curve: &PsdCurve) -> Result<()> {
    let text = format_psd_table(curve);
    write_atomic(path, |w| w.write_all(text.as_bytes()))
}

/// Parse a table written by [`write_psd_table`]
pub fn parse_psd_table(content: &str, source: &str) -> Result<PsdCurve> {
    let mut frequencies = Vec::new();
    let mut power = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let values: Vec<f64> = line
            .split_whitespace()
            .map(|t| t.parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Ms2PsdError::parse(source, format!("line {}: {}", idx + 1, e)))?;
        if values.len() != 2 {
            return Err(Ms2PsdError::parse(
                source,
                format!("line {}: expected 2 columns, found {}", idx + 1, values.len()),
            ));
        }
        frequencies.push(values[0]);
        power.push(values[1]);
    }

    Ok(PsdCurve { frequencies, power })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_layout() {
        let curve = PsdCurve {
            frequencies: vec![0.0, 0.5, 1.0],
            power: vec![0.0, 2.5e-3, 1.0],
        };
        let text = format_psd_table(&curve);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "5.000000e-1 2.500000e-3");

        let parsed = parse_psd_table(&text, "psd").unwrap();
        assert_eq!(parsed, curve);
    }

    #[test]
    fn test_parse_rejects_bad_rows() {
        assert!(parse_psd_table("1.0\n", "psd").is_err());
        assert!(parse_psd_table("1.0 x\n", "psd").is_err());
    }
}
