//! Pole-zero instrument response model.
//!
//! The response is the rational function
//! `constant · Π(s − zero) / Π(s − pole)` evaluated on the imaginary axis,
//! `s = j·2π·f`. Output types other than displacement are handled by
//! composing the parsed model with synthetic zeros at the origin; the parsed
//! model itself is never modified.

use rustfft::num_complex::Complex64;
use std::f64::consts::PI;

use crate::types::OutputType;

/// Instrument transfer function as poles, zeros and a gain constant
#[derive(Debug, Clone, PartialEq)]
pub struct PoleZeroModel {
    poles: Vec<Complex64>,
    zeros: Vec<Complex64>,
    constant: f64,
}

impl Default for PoleZeroModel {
    /// Identity response: no poles, no zeros, unit gain
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new(), 1.0)
    }
}

impl PoleZeroModel {
    pub fn new(poles: Vec<Complex64>, zeros: Vec<Complex64>, constant: f64) -> Self {
        Self {
            poles,
            zeros,
            constant,
        }
    }

    pub fn poles(&self) -> &[Complex64] {
        &self.poles
    }

    pub fn zeros(&self) -> &[Complex64] {
        &self.zeros
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn is_identity(&self) -> bool {
        self.poles.is_empty() && self.zeros.is_empty() && self.constant == 1.0
    }

    /// New model with `count` extra zeros at the origin
    pub fn with_origin_zeros(&self, count: usize) -> Self {
        let mut zeros = self.zeros.clone();
        zeros.extend(std::iter::repeat(Complex64::new(0.0, 0.0)).take(count));
        Self {
            poles: self.poles.clone(),
            zeros,
            constant: self.constant,
        }
    }

    /// Complex response at `frequency_hz` for the requested output type.
    ///
    /// A frequency landing exactly on a pole yields `+inf` (infinite gain).
    pub fn evaluate(&self, frequency_hz: f64, output_type: OutputType) -> Complex64 {
        let s = Complex64::new(0.0, 2.0 * PI * frequency_hz);

        // (jω)^k for the synthetic origin zeros, without cloning the model
        let differentiation = (0..output_type.differentiation_order())
            .fold(Complex64::new(1.0, 0.0), |acc, _| acc * s);

        let numerator = self
            .zeros
            .iter()
            .fold(differentiation * self.constant, |acc, z| acc * (s - z));
        let denominator = self
            .poles
            .iter()
            .fold(Complex64::new(1.0, 0.0), |acc, p| acc * (s - p));

        if denominator.re == 0.0 && denominator.im == 0.0 {
            return Complex64::new(f64::INFINITY, 0.0);
        }
        numerator / denominator
    }

    /// Evaluate at each frequency in turn
    pub fn frequency_response(&self, frequencies: &[f64], output_type: OutputType) -> Vec<Complex64> {
        frequencies
            .iter()
            .map(|&f| self.evaluate(f, output_type))
            .collect()
    }
}
