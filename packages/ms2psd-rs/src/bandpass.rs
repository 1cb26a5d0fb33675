//! Four-corner cosine bandpass mask.
//!
//! The mask rises from 0 at `f1` to 1 at `f2`, stays at 1 through `f3` and
//! falls back to 0 at `f4`. Rules are checked in ascending order so a
//! zero-width ramp (`f1 == f2` or `f3 == f4`) is an instantaneous step and
//! its division is never evaluated. Applying the mask is the response
//! remover's job.

use std::f64::consts::PI;

use crate::types::CornerFrequencies;

/// Mask weight in [0, 1] at frequency `f` (Hz, sign ignored)
pub fn mask_value(frequency: f64, corners: &CornerFrequencies) -> f64 {
    let f = frequency.abs();
    let CornerFrequencies { f1, f2, f3, f4 } = *corners;

    if f < f1 || f > f4 {
        0.0
    } else if f < f2 {
        0.5 * (1.0 - (PI * (f - f1) / (f2 - f1)).cos())
    } else if f <= f3 {
        1.0
    } else {
        0.5 * (1.0 + (PI * (f - f3) / (f4 - f3)).cos())
    }
}

/// One mask value per frequency bin
pub fn build_mask(frequencies: &[f64], corners: &CornerFrequencies) -> Vec<f64> {
    frequencies
        .iter()
        .map(|&f| mask_value(f, corners))
        .collect()
}
