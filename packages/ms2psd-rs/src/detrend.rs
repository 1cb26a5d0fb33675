/// Arithmetic mean and population standard deviation
pub fn mean_and_std(samples: &[f64]) -> (f64, f64) {
    if samples.is_empty() {
        return (0.0, 0.0);
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Subtract the arithmetic mean
pub fn demean(samples: &[f64]) -> Vec<f64> {
    let (mean, _) = mean_and_std(samples);
    samples.iter().map(|x| x - mean).collect()
}

/// Least-squares line `a + b·t` over the sample index axis `t = 0..N-1`.
///
/// Returns `(a, b)`. A single sample has no defined trend; its slope is 0.
pub fn linear_fit(samples: &[f64]) -> (f64, f64) {
    let n = samples.len();
    if n == 0 {
        return (0.0, 0.0);
    }
    let (mean_x, _) = mean_and_std(samples);
    if n == 1 {
        return (mean_x, 0.0);
    }

    let mean_t = (n - 1) as f64 / 2.0;
    let (sxy, stt) = samples
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(sxy, stt), (i, x)| {
            let dt = i as f64 - mean_t;
            (sxy + dt * (x - mean_x), stt + dt * dt)
        });

    let slope = sxy / stt;
    (mean_x - slope * mean_t, slope)
}

/// Remove the mean, then the least-squares linear trend
pub fn detrend(samples: &[f64]) -> Vec<f64> {
    let demeaned = demean(samples);
    let (intercept, slope) = linear_fit(&demeaned);
    demeaned
        .iter()
        .enumerate()
        .map(|(i, x)| x - (intercept + slope * i as f64))
        .collect()
}
