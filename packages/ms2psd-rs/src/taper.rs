use std::f64::consts::PI;

use crate::error::{Ms2PsdError, Result};

/// Number of samples ramped at each end for a given fraction
pub fn taper_length(n: usize, fraction: f64) -> usize {
    (fraction * n as f64).floor() as usize
}

/// Half-cosine weight rising from 0 at `i = 0` towards 1 at `i = m`
fn ramp_weight(i: usize, m: usize) -> f64 {
    0.5 * (1.0 - (PI * i as f64 / m as f64).cos())
}

/// Partial-cosine (Tukey-style) taper.
///
/// The first and last `floor(fraction·N)` samples are multiplied by a
/// half-cosine ramp; the middle segment is left untouched. A ramp shorter
/// than one sample makes this a no-op.
pub fn cosine_taper(samples: &[f64], fraction: f64) -> Result<Vec<f64>> {
    if !fraction.is_finite() || !(0.0..0.5).contains(&fraction) {
        return Err(Ms2PsdError::InvalidParameter(format!(
            "Taper fraction must be in [0, 0.5), got {}",
            fraction
        )));
    }

    let n = samples.len();
    let m = taper_length(n, fraction);
    let mut out = samples.to_vec();
    if m == 0 {
        return Ok(out);
    }

    for i in 0..m {
        let w = ramp_weight(i, m);
        out[i] *= w;
        out[n - 1 - i] *= w;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_driven_to_zero() {
        let samples: Vec<f64> = (0..200).map(|i| 10.0 + (i as f64 * 0.3).sin()).collect();
        let out = cosine_taper(&samples, 0.05).unwrap();
        assert_eq!(out[0], 0.0);
        assert_eq!(out[199], 0.0);
    }

    #[test]
    fn test_middle_is_bit_identical() {
        let samples: Vec<f64> = (0..100).map(|i| (i as f64).sqrt() - 3.3).collect();
        let out = cosine_taper(&samples, 0.1).unwrap();
        let m = taper_length(100, 0.1);
        assert_eq!(m, 10);
        for i in m..(100 - m) {
            assert_eq!(out[i].to_bits(), samples[i].to_bits());
        }
    }

    #[test]
    fn test_ramp_is_monotonic_and_symmetric() {
        let out = cosine_taper(&[1.0; 64], 0.25).unwrap();
        let m = taper_length(64, 0.25);
        for i in 1..m {
            assert!(out[i] >= out[i - 1]);
            assert!((out[i] - out[63 - i]).abs() < 1e-15);
        }
        assert!(out[m - 1] < 1.0);
    }

    #[test]
    fn test_short_ramp_is_noop() {
        let samples = vec![3.0, -1.0, 2.0, 5.0, 4.0];
        assert_eq!(cosine_taper(&samples, 0.1).unwrap(), samples);
        assert_eq!(cosine_taper(&samples, 0.0).unwrap(), samples);
    }

    #[test]
    fn test_invalid_fraction() {
        assert!(cosine_taper(&[1.0; 10], 0.5).is_err());
        assert!(cosine_taper(&[1.0; 10], -0.1).is_err());
        assert!(cosine_taper(&[1.0; 10], f64::NAN).is_err());
    }
}
