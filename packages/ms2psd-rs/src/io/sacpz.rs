//! SAC pole-zero (SACPZ) response files.
//!
//! ```text
//! * comment lines start with '*'
//! ZEROS 3
//!     0.0 0.0
//! POLES 2
//!     -0.037 0.037
//!     -0.037 -0.037
//! CONSTANT 2.3e10
//! ```
//!
//! A section may list fewer values than its declared count; the remainder
//! sit at the origin. A missing CONSTANT defaults to 1.

use rustfft::num_complex::Complex64;
use std::path::Path;

use crate::error::{Ms2PsdError, Result};
use crate::response::PoleZeroModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Zeros,
    Poles,
}

#[derive(Default)]
struct SectionValues {
    declared: Option<usize>,
    values: Vec<Complex64>,
}

impl SectionValues {
    fn finish(self) -> Vec<Complex64> {
        let mut values = self.values;
        if let Some(declared) = self.declared {
            values.resize(declared, Complex64::new(0.0, 0.0));
        }
        values
    }
}

fn parse_count(token: Option<&str>, keyword: &str, source: &str, line_no: usize) -> Result<usize> {
    token
        .and_then(|t| t.parse::<usize>().ok())
        .ok_or_else(|| {
            Ms2PsdError::parse(
                source,
                format!("line {}: {} needs a non-negative integer count", line_no, keyword),
            )
        })
}

fn parse_number(token: &str, source: &str, line_no: usize) -> Result<f64> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            Ms2PsdError::parse(source, format!("line {}: '{}' is not a finite number", line_no, token))
        })
}

/// Parse SACPZ text; `source` names the input in error messages
pub fn parse_sacpz(content: &str, source: &str) -> Result<PoleZeroModel> {
    let mut zeros = SectionValues::default();
    let mut poles = SectionValues::default();
    let mut constant: Option<f64> = None;
    let mut current: Option<Section> = None;

    for (idx, raw_line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('*') || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let first = tokens.next().unwrap_or_default();

        match first.to_ascii_uppercase().as_str() {
            keyword @ ("ZEROS" | "POLES") => {
                let (section, target) = if keyword == "ZEROS" {
                    (Section::Zeros, &mut zeros)
                } else {
                    (Section::Poles, &mut poles)
                };
                if target.declared.is_some() {
                    return Err(Ms2PsdError::parse(
                        source,
                        format!("line {}: duplicate {} section", line_no, keyword),
                    ));
                }
                target.declared = Some(parse_count(tokens.next(), keyword, source, line_no)?);
                current = Some(section);
            }
            "CONSTANT" => {
                if constant.is_some() {
                    return Err(Ms2PsdError::parse(
                        source,
                        format!("line {}: duplicate CONSTANT", line_no),
                    ));
                }
                let token = tokens.next().ok_or_else(|| {
                    Ms2PsdError::parse(source, format!("line {}: CONSTANT needs a value", line_no))
                })?;
                constant = Some(parse_number(token, source, line_no)?);
                current = None;
            }
            _ => {
                let target = match current {
                    Some(Section::Zeros) => &mut zeros,
                    Some(Section::Poles) => &mut poles,
                    None => {
                        return Err(Ms2PsdError::parse(
                            source,
                            format!("line {}: unexpected '{}' outside ZEROS/POLES", line_no, line),
                        ))
                    }
                };
                let re = parse_number(first, source, line_no)?;
                let im = match tokens.next() {
                    Some(token) => parse_number(token, source, line_no)?,
                    None => {
                        return Err(Ms2PsdError::parse(
                            source,
                            format!("line {}: expected a real and an imaginary part", line_no),
                        ))
                    }
                };
                if target.values.len() == target.declared.unwrap_or(0) {
                    return Err(Ms2PsdError::parse(
                        source,
                        format!("line {}: more values than the declared count", line_no),
                    ));
                }
                target.values.push(Complex64::new(re, im));
            }
        }
    }

    let constant = constant.unwrap_or_else(|| {
        log::warn!("{}: no CONSTANT given, using 1.0", source);
        1.0
    });
    let zeros = zeros.finish();
    let poles = poles.finish();
    log::info!(
        "Loaded response {}: {} zeros, {} poles, constant {:e}",
        source,
        zeros.len(),
        poles.len(),
        constant
    );

    Ok(PoleZeroModel::new(poles, zeros, constant))
}

/// Read and parse a SACPZ file
pub fn read_sacpz(path: &Path) -> Result<PoleZeroModel> {
    if !path.exists() {
        return Err(Ms2PsdError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    parse_sacpz(&content, &path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NACB_BHZ: &str = "\
* **********************************
* NETWORK   (KNETWK): TW
* STATION    (KSTNM): NACB
* CHANNEL   (KCMPNM): BHZ
* **********************************
ZEROS\t3
\t+0.000000e+00\t+0.000000e+00
\t+0.000000e+00\t+0.000000e+00
\t+0.000000e+00\t+0.000000e+00
POLES\t4
\t-3.700400e-02\t+3.701600e-02
\t-3.700400e-02\t-3.701600e-02
\t-2.513300e+02\t+0.000000e+00
\t-1.310400e+02\t-4.672900e+02
CONSTANT\t+4.346080e+17
";

    #[test]
    fn test_parse_full_file() {
        let model = parse_sacpz(NACB_BHZ, "nacb").unwrap();
        assert_eq!(model.zeros().len(), 3);
        assert_eq!(model.poles().len(), 4);
        assert_eq!(model.poles()[1], Complex64::new(-3.7004e-2, -3.7016e-2));
        assert_eq!(model.constant(), 4.34608e17);
    }

    #[test]
    fn test_implicit_origin_zeros() {
        let model = parse_sacpz("ZEROS 2\nPOLES 1\n-1.0 0.0\nCONSTANT 3\n", "short").unwrap();
        assert_eq!(model.zeros(), &[Complex64::new(0.0, 0.0); 2]);
        assert_eq!(model.poles(), &[Complex64::new(-1.0, 0.0)]);
        assert_eq!(model.constant(), 3.0);
    }

    #[test]
    fn test_missing_constant_defaults_to_one() {
        let model = parse_sacpz("zeros 0\npoles 0\n", "lower").unwrap();
        assert!(model.is_identity());
    }

    #[test]
    fn test_malformed_inputs() {
        let cases = [
            "ZEROS x\n",
            "ZEROS 1\n1.0 0.0\n2.0 0.0\n",
            "1.0 0.0\n",
            "POLES 1\n-1.0\n",
            "POLES 1\n-1.0 abc\n",
            "CONSTANT\n",
            "ZEROS 1\nZEROS 1\n",
            "CONSTANT 1\nCONSTANT 2\n",
        ];
        for case in cases {
            let result = parse_sacpz(case, "bad");
            assert!(
                matches!(result, Err(Ms2PsdError::ParseError { .. })),
                "expected parse error for {:?}",
                case
            );
        }
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_sacpz(Path::new("/nonexistent/SAC_PZs"));
        assert!(matches!(result, Err(Ms2PsdError::FileNotFound(_))));
    }
}
