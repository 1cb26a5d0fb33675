use rustfft::num_complex::Complex64;

use crate::fft::{is_self_conjugate, onesided_frequencies};
use crate::types::PsdCurve;

/// One-sided power spectral density over bins `0..=N/2`.
///
/// `P_i = c_i · |X_i|² / N` with `c_i = 2` for bins that have a mirrored
/// partner and 1 for DC / Nyquist. No Δt factor is applied, so the curve
/// sums to the trace energy `Σx²`.
pub fn psd(spectrum: &[Complex64], sample_rate: f64) -> PsdCurve {
    let n = spectrum.len();
    if n == 0 {
        return PsdCurve {
            frequencies: Vec::new(),
            power: Vec::new(),
        };
    }

    let frequencies = onesided_frequencies(n, sample_rate);
    let power = spectrum[..frequencies.len()]
        .iter()
        .enumerate()
        .map(|(i, x)| {
            let weight = if is_self_conjugate(i, n) { 1.0 } else { 2.0 };
            weight * x.norm_sqr() / n as f64
        })
        .collect();

    PsdCurve { frequencies, power }
}
