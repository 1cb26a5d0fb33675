use clap::{Parser, ValueEnum};
use ms2psd_rs::{PsdSource, DEFAULT_TAPER_FRACTION, DEFAULT_WATER_LEVEL};

#[derive(Parser)]
#[command(
    name = "ms2psd",
    version,
    about = "Remove the instrument response from a seismic trace and estimate its PSD",
    long_about = "Remove the instrument response from a seismic trace and estimate its PSD.\n\
                  The trace is detrended, tapered, divided by the SAC pole-zero response\n\
                  inside the f1-f2-f3-f4 band, and written back as SLIST text. The power\n\
                  spectral density is always written to psd_out.txt in the working directory.\n\
                  Binary miniSEED must be converted to ASCII (mseed2ascii) first."
)]
pub struct Cli {
    /// Lower stop corner (Hz)
    pub f1: f64,

    /// Lower pass corner (Hz)
    pub f2: f64,

    /// Upper pass corner (Hz)
    pub f3: f64,

    /// Upper stop corner (Hz)
    pub f4: f64,

    /// Output quantity: 0 displacement, 1 velocity, 2 acceleration
    pub totype: u8,

    /// Input waveform (ASCII SLIST, TSPAIR or one value per line)
    pub input: String,

    /// SAC pole-zero response file
    pub resp: String,

    /// Corrected waveform output path (SLIST)
    pub output: String,

    /// Also write the PSD table to this path (psd_out.txt is always written)
    #[arg(long)]
    pub psd_out: Option<String>,

    /// Fraction of the trace tapered at each end, in [0, 0.5)
    #[arg(long, default_value_t = DEFAULT_TAPER_FRACTION)]
    pub taper: f64,

    /// Response floor relative to the passband peak; weaker bins are zeroed
    #[arg(long, default_value_t = DEFAULT_WATER_LEVEL)]
    pub water_level: f64,

    /// Spectrum the PSD is computed from
    #[arg(long, value_enum, default_value_t = PsdSourceArg::Corrected)]
    pub psd_source: PsdSourceArg,

    /// Sampling rate in Hz for input without a TIMESERIES header
    #[arg(long)]
    pub sample_rate: Option<f64>,

    /// Write every intermediate series to this directory
    #[arg(long)]
    pub diagnostics: Option<String>,

    /// Print a JSON run summary on stdout
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Suppress progress messages on stderr
    #[arg(long, default_value_t = false)]
    pub quiet: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PsdSourceArg {
    /// Response-corrected, band-limited spectrum
    Corrected,
    /// Spectrum of the tapered input before correction
    Raw,
}

impl From<PsdSourceArg> for PsdSource {
    fn from(arg: PsdSourceArg) -> Self {
        match arg {
            PsdSourceArg::Corrected => PsdSource::Corrected,
            PsdSourceArg::Raw => PsdSource::Raw,
        }
    }
}
