/// Sliding-window autocorrelation at a fixed lag.
///
/// For every sample `n` the output is
/// `Σ_{k=0}^{window-1} x[n-k] · x[n-k-lag]`, with samples before the start
/// of the sequence treated as zero. With `normalize_by_energy` each value is
/// divided by the window energy `Σ x[n-k]²` (0 when that energy is 0).
pub fn windowed_autocorrelation(
    samples: &[f64],
    window: usize,
    lag: usize,
    normalize_by_energy: bool,
) -> Vec<f64> {
    let at = |i: isize| -> f64 {
        if i < 0 {
            0.0
        } else {
            samples.get(i as usize).copied().unwrap_or(0.0)
        }
    };

    (0..samples.len())
        .map(|n| {
            let (rxx, energy) = (0..window).fold((0.0, 0.0), |(rxx, energy), k| {
                let current = at(n as isize - k as isize);
                let delayed = at(n as isize - k as isize - lag as isize);
                (rxx + current * delayed, energy + current * current)
            });
            if normalize_by_energy {
                if energy > 0.0 {
                    rxx / energy
                } else {
                    0.0
                }
            } else {
                rxx
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_lag_is_energy() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let r = windowed_autocorrelation(&x, 2, 0, false);
        assert_eq!(r, vec![1.0, 5.0, 13.0, 25.0]);
        let normalized = windowed_autocorrelation(&x, 2, 0, true);
        assert!(normalized.iter().all(|v| (*v - 1.0).abs() < 1e-15));
    }

    #[test]
    fn test_lag_one() {
        let x = [1.0, 2.0, 3.0];
        let r = windowed_autocorrelation(&x, 3, 1, false);
        // n=2: 3·2 + 2·1 + 1·0
        assert_eq!(r, vec![0.0, 2.0, 8.0]);
    }

    #[test]
    fn test_alternating_signal_is_anticorrelated() {
        let x: Vec<f64> = (0..32).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let r = windowed_autocorrelation(&x, 8, 1, true);
        assert!(r[16..].iter().all(|v| (*v + 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_silence_normalizes_to_zero() {
        let r = windowed_autocorrelation(&[0.0; 10], 4, 1, true);
        assert!(r.iter().all(|v| *v == 0.0));
    }
}
