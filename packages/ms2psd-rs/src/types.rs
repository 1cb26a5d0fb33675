use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Ms2PsdError, Result};

/// Default proportion of the trace tapered at each end (5% cosine taper)
pub const DEFAULT_TAPER_FRACTION: f64 = 0.05;

/// Default relative response floor used by the response remover
pub const DEFAULT_WATER_LEVEL: f64 = 1e-10;

/// Physical quantity the corrected waveform is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputType {
    Displacement,
    Velocity,
    Acceleration,
}

impl OutputType {
    /// Look up the output type by its numeric selector (0, 1, 2)
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Displacement),
            1 => Some(Self::Velocity),
            2 => Some(Self::Acceleration),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Displacement => 0,
            Self::Velocity => 1,
            Self::Acceleration => 2,
        }
    }

    /// Number of synthetic zeros at the origin added to the response model
    pub fn differentiation_order(self) -> usize {
        self.code() as usize
    }

    /// Units label written into SLIST headers
    pub fn units(self) -> &'static str {
        match self {
            Self::Displacement => "M",
            Self::Velocity => "M/S",
            Self::Acceleration => "M/S**2",
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Displacement => write!(f, "displacement"),
            Self::Velocity => write!(f, "velocity"),
            Self::Acceleration => write!(f, "acceleration"),
        }
    }
}

/// Four-corner bandpass (Hz), f1 <= f2 <= f3 <= f4
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CornerFrequencies {
    pub f1: f64,
    pub f2: f64,
    pub f3: f64,
    pub f4: f64,
}

impl CornerFrequencies {
    pub fn new(f1: f64, f2: f64, f3: f64, f4: f64) -> Result<Self> {
        let corners = [f1, f2, f3, f4];
        if let Some(bad) = corners.iter().find(|f| !f.is_finite() || **f < 0.0) {
            return Err(Ms2PsdError::InvalidParameter(format!(
                "Corner frequency {} must be finite and non-negative",
                bad
            )));
        }
        if !(f1 <= f2 && f2 <= f3 && f3 <= f4) {
            return Err(Ms2PsdError::InvalidParameter(format!(
                "Corner frequencies must satisfy f1 <= f2 <= f3 <= f4 (got {}, {}, {}, {})",
                f1, f2, f3, f4
            )));
        }
        Ok(Self { f1, f2, f3, f4 })
    }
}

/// Which spectrum feeds the PSD estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PsdSource {
    /// Response-corrected and bandpass-shaped spectrum
    #[default]
    Corrected,
    /// Tapered spectrum before response removal
    Raw,
}

/// Descriptive metadata carried alongside the samples
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TraceHeader {
    /// Source identifier, e.g. `TW_NACB__BHZ_D`
    pub id: String,
    /// Start time as written by the source, if known
    pub start_time: Option<String>,
    pub units: String,
}

/// A single-channel sample sequence at a fixed rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub header: TraceHeader,
    pub sample_rate: f64,
    pub samples: Vec<f64>,
}

impl Trace {
    pub fn new(header: TraceHeader, sample_rate: f64, samples: Vec<f64>) -> Result<Self> {
        if samples.is_empty() {
            return Err(Ms2PsdError::EmptyTrace(header.id));
        }
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(Ms2PsdError::InvalidParameter(format!(
                "Sample rate must be positive, got {}",
                sample_rate
            )));
        }
        Ok(Self {
            header,
            sample_rate,
            samples,
        })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample interval in seconds
    pub fn delta(&self) -> f64 {
        1.0 / self.sample_rate
    }

    pub fn duration(&self) -> f64 {
        self.delta() * self.len() as f64
    }

    /// Same header and rate, new samples
    pub fn with_samples(&self, samples: Vec<f64>) -> Self {
        Self {
            header: self.header.clone(),
            sample_rate: self.sample_rate,
            samples,
        }
    }
}

/// One-sided power spectral density, ascending in frequency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsdCurve {
    pub frequencies: Vec<f64>,
    pub power: Vec<f64>,
}

impl PsdCurve {
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.frequencies.iter().copied().zip(self.power.iter().copied())
    }

    /// Frequency and power of the strongest non-DC bin
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.iter()
            .skip(1)
            .fold(None, |best: Option<(f64, f64)>, (f, p)| match best {
                Some((_, bp)) if bp >= p => best,
                _ => Some((f, p)),
            })
    }
}

/// Complete pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub corners: CornerFrequencies,
    pub output_type: OutputType,
    pub taper_fraction: f64,
    pub water_level: f64,
    pub psd_source: PsdSource,
}

impl PipelineConfig {
    pub fn new(corners: CornerFrequencies, output_type: OutputType) -> Self {
        Self {
            corners,
            output_type,
            taper_fraction: DEFAULT_TAPER_FRACTION,
            water_level: DEFAULT_WATER_LEVEL,
            psd_source: PsdSource::default(),
        }
    }

    pub fn with_taper_fraction(mut self, fraction: f64) -> Self {
        self.taper_fraction = fraction;
        self
    }

    pub fn with_water_level(mut self, water_level: f64) -> Self {
        self.water_level = water_level;
        self
    }

    pub fn with_psd_source(mut self, psd_source: PsdSource) -> Self {
        self.psd_source = psd_source;
        self
    }

    /// Reject parameters no stage can work with
    pub fn validate(&self) -> Result<()> {
        if !self.taper_fraction.is_finite() || !(0.0..0.5).contains(&self.taper_fraction) {
            return Err(Ms2PsdError::InvalidParameter(format!(
                "Taper fraction must be in [0, 0.5), got {}",
                self.taper_fraction
            )));
        }
        if !self.water_level.is_finite() || self.water_level < 0.0 {
            return Err(Ms2PsdError::InvalidParameter(format!(
                "Water level must be finite and non-negative, got {}",
                self.water_level
            )));
        }
        Ok(())
    }
}

/// Summary of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub trace_id: String,
    pub n_samples: usize,
    pub sample_rate: f64,
    pub config: PipelineConfig,
    /// Bins zeroed by the water level or a pole hit (mask zeros excluded)
    pub stabilized_bins: usize,
    pub psd_peak_frequency: Option<f64>,
    pub psd_peak_power: Option<f64>,
    pub created_at: DateTime<Utc>,
}
