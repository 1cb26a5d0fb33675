use rustfft::num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Forward/inverse DFT pair planned for one length.
///
/// Forward is unnormalised; inverse scales by `1/N` so the two are exact
/// inverses up to rounding.
pub struct SpectralTransform {
    len: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl SpectralTransform {
    pub fn new(len: usize) -> Self {
        let mut planner = FftPlanner::<f64>::new();
        Self {
            len,
            forward: planner.plan_fft_forward(len),
            inverse: planner.plan_fft_inverse(len),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn forward(&self, samples: &[f64]) -> Vec<Complex64> {
        assert_eq!(samples.len(), self.len, "forward transform length mismatch");
        let mut buffer: Vec<Complex64> = samples.iter().map(|&x| Complex64::new(x, 0.0)).collect();
        self.forward.process(&mut buffer);
        buffer
    }

    /// Inverse transform keeping the real part
    pub fn inverse(&self, spectrum: &[Complex64]) -> Vec<f64> {
        assert_eq!(spectrum.len(), self.len, "inverse transform length mismatch");
        let mut buffer = spectrum.to_vec();
        self.inverse.process(&mut buffer);
        let scale = 1.0 / self.len as f64;
        buffer.iter().map(|c| c.re * scale).collect()
    }
}

/// Signed frequency (Hz) of bin `i` for an `n`-point transform.
///
/// Bins above `n/2` hold the mirrored negative frequencies.
pub fn bin_frequency(i: usize, n: usize, sample_rate: f64) -> f64 {
    let df = sample_rate / n as f64;
    if i <= n / 2 {
        i as f64 * df
    } else {
        -((n - i) as f64) * df
    }
}

/// Signed frequency of every bin, in transform order
pub fn bin_frequencies(n: usize, sample_rate: f64) -> Vec<f64> {
    (0..n).map(|i| bin_frequency(i, n, sample_rate)).collect()
}

/// Non-negative frequencies `0..=n/2`
pub fn onesided_frequencies(n: usize, sample_rate: f64) -> Vec<f64> {
    (0..=n / 2).map(|i| bin_frequency(i, n, sample_rate)).collect()
}

/// Bins equal to their own conjugate partner: DC, and Nyquist for even `n`
pub fn is_self_conjugate(i: usize, n: usize) -> bool {
    i == 0 || (n % 2 == 0 && i == n / 2)
}
