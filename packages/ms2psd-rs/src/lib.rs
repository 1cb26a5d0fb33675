pub mod autocorr;
pub mod bandpass;
pub mod deconvolve;
pub mod detrend;
pub mod error;
pub mod fft;
pub mod io;
pub mod pipeline;
pub mod profiling;
pub mod psd;
pub mod response;
pub mod taper;
pub mod types;

pub use error::{Ms2PsdError, Result};
pub use pipeline::{DiagnosticSeries, DiagnosticSink, NullSink, PipelineResult, TracePipeline};
pub use response::PoleZeroModel;
pub use types::*;

pub use rustfft::num_complex::Complex64;
