//! Time-domain frame descriptors
//!
//! - RMS level
//! - Zero-crossing rate

/// Compute RMS (Root Mean Square) level of a signal
///
/// Returns RMS value in linear scale (not dB). Applied to a magnitude
/// spectrum this gives the spectral RMS.
pub fn rms(signal: &[f32]) -> f32 {
    if signal.is_empty() {
        return 0.0;
    }

    let sum_sq: f32 = signal.iter().map(|&x| x * x).sum();
    (sum_sq / signal.len() as f32).sqrt()
}

/// Zero-crossing rate of a frame.
///
/// Counts sign changes between successive samples and divides by the frame
/// length. Samples with `|x| <= threshold` count as non-positive, so a
/// threshold above 0 suppresses crossings caused by low-level noise.
pub fn zero_crossing_rate(signal: &[f32], threshold: f32) -> f32 {
    if signal.is_empty() {
        return 0.0;
    }

    let positive = |x: f32| x.abs() > threshold && x > 0.0;
    let mut was_positive = positive(signal[0]);
    let mut crossings = 0usize;
    for &x in &signal[1..] {
        let is_positive = positive(x);
        if is_positive != was_positive {
            crossings += 1;
            was_positive = is_positive;
        }
    }
    crossings as f32 / signal.len() as f32
}
