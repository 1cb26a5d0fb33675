//! Single-trace correction pipeline.
//!
//! Stages run strictly in order and any error aborts the run:
//!
//! ```text
//! raw -> detrended -> tapered -> spectrum -> corrected spectrum -> waveform
//!                                    |               |
//!                                    +-- PSD (raw) --+-- PSD (corrected, default)
//! ```

use rustfft::num_complex::Complex64;

use crate::autocorr::windowed_autocorrelation;
use crate::bandpass::build_mask;
use crate::deconvolve::{bin_responses, remove_response};
use crate::detrend::{detrend, mean_and_std};
use crate::error::Result;
use crate::fft::{bin_frequencies, SpectralTransform};
use crate::profile_scope;
use crate::psd::psd;
use crate::response::PoleZeroModel;
use crate::taper::cosine_taper;
use crate::types::{PipelineConfig, PsdCurve, PsdSource, RunSummary, Trace};

/// Window and lag of the autocorrelation handed to diagnostic sinks
pub const AUTOCORRELATION_WINDOW: usize = 64;
pub const AUTOCORRELATION_LAG: usize = 1;

/// An intermediate series with its abscissa (seconds or Hz)
#[derive(Debug, Clone, Copy)]
pub enum DiagnosticSeries<'a> {
    Real {
        axis: &'a [f64],
        values: &'a [f64],
    },
    Complex {
        axis: &'a [f64],
        values: &'a [Complex64],
    },
}

/// Receives intermediate results of a run.
///
/// Failures are logged and otherwise ignored by the pipeline. A disabled
/// sink is never called and diagnostic-only series are not computed.
pub trait DiagnosticSink {
    fn record(&mut self, name: &str, series: DiagnosticSeries<'_>) -> Result<()>;

    fn enabled(&self) -> bool {
        true
    }
}

/// Sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn record(&mut self, _name: &str, _series: DiagnosticSeries<'_>) -> Result<()> {
        Ok(())
    }

    fn enabled(&self) -> bool {
        false
    }
}

fn emit(sink: &mut dyn DiagnosticSink, name: &str, series: DiagnosticSeries<'_>) {
    if !sink.enabled() {
        return;
    }
    if let Err(e) = sink.record(name, series) {
        log::warn!("Failed to record diagnostic '{}': {}", name, e);
    }
}

/// Output of a successful run
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub waveform: Trace,
    pub psd: PsdCurve,
    pub summary: RunSummary,
}

/// Runs the correction stages over one trace
#[derive(Debug, Clone)]
pub struct TracePipeline {
    config: PipelineConfig,
}

impl TracePipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn run(&self, trace: &Trace, model: &PoleZeroModel) -> Result<PipelineResult> {
        self.run_with_diagnostics(trace, model, &mut NullSink)
    }

    pub fn run_with_diagnostics(
        &self,
        trace: &Trace,
        model: &PoleZeroModel,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<PipelineResult> {
        let n = trace.len();
        let fs = trace.sample_rate;
        let config = &self.config;
        self.check_band(fs);

        let (mean, std) = mean_and_std(&trace.samples);
        log::info!(
            "Processing trace '{}': {} samples at {} Hz ({:.2}s)",
            trace.header.id,
            n,
            fs,
            trace.duration()
        );
        log::debug!("Raw trace mean={:.6e} std={:.6e}", mean, std);
        if model.is_identity() {
            log::info!("Identity response model, spectral division is a no-op");
        }

        let time_axis: Vec<f64> = (0..n).map(|i| i as f64 / fs).collect();
        emit(sink, "raw", DiagnosticSeries::Real { axis: &time_axis, values: &trace.samples });

        let detrended = {
            profile_scope!("detrend");
            detrend(&trace.samples)
        };
        assert_eq!(detrended.len(), n, "detrend changed the trace length");
        emit(sink, "detrended", DiagnosticSeries::Real { axis: &time_axis, values: &detrended });

        if sink.enabled() {
            let autocorrelation = windowed_autocorrelation(
                &detrended,
                AUTOCORRELATION_WINDOW,
                AUTOCORRELATION_LAG,
                false,
            );
            emit(
                sink,
                "autocorrelation",
                DiagnosticSeries::Real { axis: &time_axis, values: &autocorrelation },
            );
        }

        let tapered = {
            profile_scope!("taper");
            cosine_taper(&detrended, config.taper_fraction)?
        };
        assert_eq!(tapered.len(), n, "taper changed the trace length");
        emit(sink, "tapered", DiagnosticSeries::Real { axis: &time_axis, values: &tapered });

        let transform = SpectralTransform::new(n);
        let spectrum = {
            profile_scope!("forward fft");
            transform.forward(&tapered)
        };
        let frequencies = bin_frequencies(n, fs);
        emit(sink, "spectrum", DiagnosticSeries::Complex { axis: &frequencies, values: &spectrum });

        let responses = bin_responses(model, config.output_type, n, fs);
        let mask = build_mask(&frequencies, &config.corners);
        emit(sink, "response", DiagnosticSeries::Complex { axis: &frequencies, values: &responses });
        emit(sink, "mask", DiagnosticSeries::Real { axis: &frequencies, values: &mask });

        let deconvolution = {
            profile_scope!("response removal");
            remove_response(&spectrum, &responses, &mask, config.water_level)
        };
        assert_eq!(deconvolution.spectrum.len(), n, "response removal changed the spectrum length");
        if deconvolution.stabilized_bins > 0 {
            log::info!(
                "{} of {} bins zeroed by the water level (response too small to divide)",
                deconvolution.stabilized_bins,
                n
            );
        }
        emit(
            sink,
            "corrected_spectrum",
            DiagnosticSeries::Complex { axis: &frequencies, values: &deconvolution.spectrum },
        );

        let corrected = {
            profile_scope!("inverse fft");
            transform.inverse(&deconvolution.spectrum)
        };
        assert_eq!(corrected.len(), n, "inverse transform changed the trace length");
        emit(sink, "corrected", DiagnosticSeries::Real { axis: &time_axis, values: &corrected });

        let curve = {
            profile_scope!("psd");
            match config.psd_source {
                PsdSource::Corrected => psd(&deconvolution.spectrum, fs),
                PsdSource::Raw => psd(&spectrum, fs),
            }
        };

        let mut waveform = trace.with_samples(corrected);
        waveform.header.units = config.output_type.units().to_string();

        let peak = curve.peak();
        let summary = RunSummary {
            trace_id: trace.header.id.clone(),
            n_samples: n,
            sample_rate: fs,
            config: config.clone(),
            stabilized_bins: deconvolution.stabilized_bins,
            psd_peak_frequency: peak.map(|(f, _)| f),
            psd_peak_power: peak.map(|(_, p)| p),
            created_at: chrono::Utc::now(),
        };

        Ok(PipelineResult {
            waveform,
            psd: curve,
            summary,
        })
    }

    fn check_band(&self, sample_rate: f64) {
        let corners = &self.config.corners;
        let nyquist = sample_rate / 2.0;
        if corners.f1 == 0.0 {
            log::warn!(
                "f1 is 0 Hz: the DC bin is not removed by the bandpass and relies on the water level"
            );
        }
        if corners.f4 > nyquist {
            log::warn!(
                "f4 ({} Hz) is above the Nyquist frequency ({} Hz)",
                corners.f4,
                nyquist
            );
        }
    }
}
