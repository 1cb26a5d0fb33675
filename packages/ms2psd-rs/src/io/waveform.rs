//! ASCII waveform files.
//!
//! Reads the `SLIST` and `TSPAIR` renderings written by `mseed2ascii`:
//!
//! ```text
//! TIMESERIES TW_NACB__BHZ_D, 6 samples, 20 sps, 2007-09-11T07:25:20.000000, SLIST, FLOAT, Counts
//! 12  15  11  9  14  13
//! ```
//!
//! and a bare column of numbers whose sample rate the caller supplies.
//! Output is always written as SLIST.

use memmap2::Mmap;
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write as _;
use std::path::Path;

use crate::error::{Ms2PsdError, Result};
use crate::io::write_atomic;
use crate::types::{Trace, TraceHeader};

const HEADER_KEYWORD: &str = "TIMESERIES";
const SLIST_VALUES_PER_LINE: usize = 6;
const DEFAULT_START_TIME: &str = "1970-01-01T00:00:00.000000";

/// Layout of the sample block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveformFormat {
    Slist,
    Tspair,
    Column,
}

impl WaveformFormat {
    fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "SLIST" => Some(Self::Slist),
            "TSPAIR" => Some(Self::Tspair),
            _ => None,
        }
    }
}

/// Fields of a `TIMESERIES` header line
#[derive(Debug, Clone, PartialEq)]
struct SeriesHeader {
    id: String,
    n_samples: usize,
    sample_rate: f64,
    start_time: String,
    format: WaveformFormat,
    units: String,
}

/// Number in a `"<value> <unit>"` header field, if the unit matches
fn leading_number<'a>(field: &'a str, unit: &str) -> Option<&'a str> {
    let mut parts = field.split_whitespace();
    let value = parts.next()?;
    (parts.next()? == unit).then_some(value)
}

fn parse_header(line: &str, source: &str) -> Result<SeriesHeader> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 6 {
        return Err(Ms2PsdError::parse(
            source,
            format!("TIMESERIES header has {} fields, expected at least 6", fields.len()),
        ));
    }

    let id = fields[0]
        .strip_prefix(HEADER_KEYWORD)
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    let n_samples = leading_number(fields[1], "samples")
        .and_then(|v| v.parse::<usize>().ok())
        .ok_or_else(|| Ms2PsdError::parse(source, format!("bad sample count '{}'", fields[1])))?;
    let sample_rate = leading_number(fields[2], "sps")
        .and_then(|v| v.parse::<f64>().ok())
        .ok_or_else(|| Ms2PsdError::parse(source, format!("bad sample rate '{}'", fields[2])))?;
    let format = WaveformFormat::from_label(fields[4])
        .ok_or_else(|| Ms2PsdError::UnsupportedFormat(format!("{} ({})", fields[4], source)))?;

    Ok(SeriesHeader {
        id,
        n_samples,
        sample_rate,
        start_time: fields[3].to_string(),
        format,
        units: fields.get(6).copied().unwrap_or_default().to_string(),
    })
}

fn parse_value(token: &str, source: &str, line_no: usize) -> Result<f64> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            Ms2PsdError::parse(source, format!("line {}: '{}' is not a finite sample", line_no, token))
        })
}

fn is_skippable(line: &str) -> bool {
    line.is_empty() || line.starts_with('#')
}

/// Detect the layout of `content` and build a trace from it.
///
/// `fallback_rate` is required for bare columns and ignored otherwise.
pub fn parse_waveform(content: &str, source: &str, fallback_rate: Option<f64>) -> Result<Trace> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !is_skippable(l))
        .peekable();

    let header = match lines.peek() {
        Some((_, first)) if first.starts_with(HEADER_KEYWORD) => {
            let header = parse_header(first, source)?;
            lines.next();
            Some(header)
        }
        _ => None,
    };

    let format = header.as_ref().map_or(WaveformFormat::Column, |h| h.format);
    let mut samples = Vec::with_capacity(header.as_ref().map_or(0, |h| h.n_samples));

    for (line_no, line) in lines {
        if line.starts_with(HEADER_KEYWORD) {
            return Err(Ms2PsdError::parse(
                source,
                format!("line {}: only single-segment files are supported", line_no),
            ));
        }
        match format {
            WaveformFormat::Slist | WaveformFormat::Column => {
                for token in line.split_whitespace() {
                    samples.push(parse_value(token, source, line_no)?);
                }
            }
            WaveformFormat::Tspair => {
                let value = line.split_whitespace().nth(1).ok_or_else(|| {
                    Ms2PsdError::parse(source, format!("line {}: expected 'time value'", line_no))
                })?;
                samples.push(parse_value(value, source, line_no)?);
            }
        }
    }

    let (trace_header, sample_rate) = match header {
        Some(h) => {
            if h.n_samples != samples.len() {
                return Err(Ms2PsdError::parse(
                    source,
                    format!("header declares {} samples, found {}", h.n_samples, samples.len()),
                ));
            }
            let trace_header = TraceHeader {
                id: h.id,
                start_time: Some(h.start_time),
                units: h.units,
            };
            (trace_header, h.sample_rate)
        }
        None => {
            let rate = fallback_rate.ok_or_else(|| {
                Ms2PsdError::InvalidParameter(format!(
                    "{} has no TIMESERIES header; a sample rate must be given",
                    source
                ))
            })?;
            let trace_header = TraceHeader {
                id: source.to_string(),
                start_time: None,
                units: String::new(),
            };
            (trace_header, rate)
        }
    };

    if samples.is_empty() {
        return Err(Ms2PsdError::EmptyTrace(source.to_string()));
    }
    log::info!(
        "Loaded {} samples at {} Hz from {} ({:?})",
        samples.len(),
        sample_rate,
        source,
        format
    );
    Trace::new(trace_header, sample_rate, samples)
}

/// Map `path` into memory and parse it
pub fn read_waveform(path: &Path, fallback_rate: Option<f64>) -> Result<Trace> {
    if !path.exists() {
        return Err(Ms2PsdError::FileNotFound(path.display().to_string()));
    }
    let source = path.display().to_string();

    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Err(Ms2PsdError::EmptyTrace(source));
    }
    // SAFETY: the mapping is read-only and dropped before this function returns
    let mmap = unsafe { Mmap::map(&file)? };

    let content = std::str::from_utf8(&mmap).map_err(|_| {
        Ms2PsdError::UnsupportedFormat(format!(
            "{} is not an ASCII waveform; convert binary miniSEED with mseed2ascii first",
            source
        ))
    })?;
    parse_waveform(content, &source, fallback_rate)
}

/// Render a trace as SLIST text
pub fn format_slist(trace: &Trace) -> String {
    let header = &trace.header;
    let id = if header.id.is_empty() { "UNKNOWN" } else { header.id.as_str() };
    let units = if header.units.is_empty() { "Counts" } else { header.units.as_str() };

    let mut out = String::with_capacity(trace.len() * 16 + 128);
    let _ = writeln!(
        out,
        "{} {}, {} samples, {} sps, {}, SLIST, FLOAT, {}",
        HEADER_KEYWORD,
        id,
        trace.len(),
        trace.sample_rate,
        header.start_time.as_deref().unwrap_or(DEFAULT_START_TIME),
        units
    );
    for chunk in trace.samples.chunks(SLIST_VALUES_PER_LINE) {
        let line: Vec<String> = chunk.iter().map(|v| format!("{:.8e}", v)).collect();
        let _ = writeln!(out, "{}", line.join("  "));
    }
    out
}

/// Write a trace as SLIST, atomically
pub fn write_slist(path: &Path, trace: &Trace) -> Result<()> {
    let text = format_slist(trace);
    write_atomic(path, |w| w.write_all(text.as_bytes()))
}
