//! Spectral division by the instrument response, followed by the bandpass mask.
//!
//! Stabilisation rule, applied per bin in this order:
//!
//! 1. mask value 0: the bin is set to 0 and never divided. With `f1 > 0`
//!    this is what removes the DC singularity of responses with origin zeros.
//! 2. non-finite response (frequency on a pole): the bin is set to 0.
//! 3. `|H| <= water_level · max|H|`, the maximum taken over bins the mask
//!    lets through: the bin is set to 0. A passband with no response at all
//!    zeroes every bin.
//! 4. otherwise `spectrum / H · mask`.
//!
//! Self-conjugate bins (DC, Nyquist) are projected onto the real axis so the
//! corrected spectrum of a real trace stays Hermitian.

use rustfft::num_complex::Complex64;

use crate::bandpass::build_mask;
use crate::fft::{bin_frequencies, is_self_conjugate};
use crate::response::PoleZeroModel;
use crate::types::{CornerFrequencies, OutputType};

/// Corrected spectrum plus bookkeeping for logging
#[derive(Debug, Clone)]
pub struct Deconvolution {
    pub spectrum: Vec<Complex64>,
    /// Bins zeroed by rules 2 and 3
    pub stabilized_bins: usize,
}

/// Largest finite response magnitude among bins with a non-zero mask
fn passband_peak(responses: &[Complex64], mask: &[f64]) -> f64 {
    responses
        .iter()
        .zip(mask.iter())
        .filter(|(_, &m)| m > 0.0)
        .map(|(h, _)| h.norm())
        .filter(|a| a.is_finite())
        .fold(0.0, f64::max)
}

/// Divide `spectrum` by `responses` and apply `mask`, bin by bin
pub fn remove_response(
    spectrum: &[Complex64],
    responses: &[Complex64],
    mask: &[f64],
    water_level: f64,
) -> Deconvolution {
    let n = spectrum.len();
    assert_eq!(responses.len(), n, "response length does not match spectrum");
    assert_eq!(mask.len(), n, "mask length does not match spectrum");

    let floor = water_level * passband_peak(responses, mask);
    let zero = Complex64::new(0.0, 0.0);
    let mut stabilized_bins = 0;

    let corrected = spectrum
        .iter()
        .zip(responses.iter())
        .zip(mask.iter())
        .enumerate()
        .map(|(i, ((&x, &h), &m))| {
            if m == 0.0 {
                return zero;
            }
            let magnitude = h.norm();
            if !magnitude.is_finite() || magnitude <= floor {
                stabilized_bins += 1;
                return zero;
            }
            let value = x / h * m;
            if is_self_conjugate(i, n) {
                Complex64::new(value.re, 0.0)
            } else {
                value
            }
        })
        .collect();

    Deconvolution {
        spectrum: corrected,
        stabilized_bins,
    }
}

/// Instrument response of `model` at every bin of an `n`-point transform.
///
/// Mirrored bins take the conjugate of their positive partner.
pub fn bin_responses(
    model: &PoleZeroModel,
    output_type: OutputType,
    n: usize,
    sample_rate: f64,
) -> Vec<Complex64> {
    bin_frequencies(n, sample_rate)
        .iter()
        .map(|&f| {
            let h = model.evaluate(f.abs(), output_type);
            if f < 0.0 {
                h.conj()
            } else {
                h
            }
        })
        .collect()
}

/// Build the response and mask for `spectrum` and remove the response
pub fn remove_response_with_model(
    spectrum: &[Complex64],
    model: &PoleZeroModel,
    output_type: OutputType,
    sample_rate: f64,
    corners: &CornerFrequencies,
    water_level: f64,
) -> Deconvolution {
    let n = spectrum.len();
    let responses = bin_responses(model, output_type, n, sample_rate);
    let mask = build_mask(&bin_frequencies(n, sample_rate), corners);
    remove_response(spectrum, &responses, &mask, water_level)
}
