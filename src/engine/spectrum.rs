use rustfft::{num_complex::Complex, FftPlanner};
use std::collections::BTreeMap;

use crate::error::RunError;

/// Quantization step for both frequency and magnitude, in Hz / magnitude
/// units. Coarsening to tens makes bin frequencies coincide across
/// recordings despite small sample-rate or length differences.
pub const QUANTIZE_STEP: f64 = 10.0;

/// Round a magnitude to the nearest multiple of [`QUANTIZE_STEP`].
pub fn quantize_mag(mag: f64) -> f64 {
    (mag / QUANTIZE_STEP).round() * QUANTIZE_STEP
}

/// Round a frequency to the nearest multiple of [`QUANTIZE_STEP`],
/// expressed as an integer key so lookups are exact.
pub fn quantize_freq(freq: f64) -> i64 {
    (freq / QUANTIZE_STEP).round() as i64 * QUANTIZE_STEP as i64
}

/// An ordered mapping from quantized frequency (Hz, multiple of 10) to
/// quantized magnitude, derived from one audio buffer's Fourier transform.
///
/// Raw spectra carry non-negative magnitudes; residual spectra reuse the
/// same representation and may carry negative values after baseline
/// subtraction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spectrum {
    bins: BTreeMap<i64, f64>,
}

impl Spectrum {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a spectrum directly from already-quantized pairs. Collisions
    /// resolve to the larger magnitude, same as extraction.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (i64, f64)>) -> Self {
        let mut s = Self::new();
        for (freq, mag) in pairs {
            s.insert_max(freq, mag);
        }
        s
    }

    /// Insert a bin, keeping the larger magnitude when the key already
    /// exists. Two FFT bins can quantize to the same frequency; keeping the
    /// dominant one loses the least information.
    pub fn insert_max(&mut self, freq: i64, mag: f64) {
        self.bins
            .entry(freq)
            .and_modify(|m| {
                if mag > *m {
                    *m = mag;
                }
            })
            .or_insert(mag);
    }

    pub fn set(&mut self, freq: i64, mag: f64) {
        self.bins.insert(freq, mag);
    }

    pub fn get(&self, freq: i64) -> Option<f64> {
        self.bins.get(&freq).copied()
    }

    pub fn contains(&self, freq: i64) -> bool {
        self.bins.contains_key(&freq)
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Bins in ascending frequency order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.bins.iter().map(|(&f, &m)| (f, m))
    }

    pub fn freqs(&self) -> impl Iterator<Item = i64> + '_ {
        self.bins.keys().copied()
    }
}

/// Transform a PCM buffer into its quantized magnitude spectrum.
///
/// Runs a forward FFT over the full buffer, keeps the non-negative
/// frequency half (`0..n/2`), computes each bin's frequency as
/// `i * sample_rate / n` and its magnitude as the complex modulus, then
/// quantizes both to the nearest 10. Pure function of its inputs.
pub fn extract(samples: &[f32], sample_rate: u32) -> Result<Spectrum, RunError> {
    let n = samples.len();
    if n == 0 {
        return Err(RunError::EmptyBuffer);
    }

    let mut buffer: Vec<Complex<f64>> = samples
        .iter()
        .map(|&s| Complex::new(s as f64, 0.0))
        .collect();

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    let freq_resolution = sample_rate as f64 / n as f64;
    let mut spectrum = Spectrum::new();
    for (i, c) in buffer[..n / 2].iter().enumerate() {
        let freq = quantize_freq(i as f64 * freq_resolution);
        let mag = quantize_mag(c.norm());
        spectrum.insert_max(freq, mag);
    }

    Ok(spectrum)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, sample_rate: u32, len: usize, amplitude: f64) -> Vec<f32> {
        (0..len)
            .map(|i| {
                (amplitude * (2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate as f64).sin())
                    as f32
            })
            .collect()
    }

    #[test]
    fn empty_buffer_is_rejected() {
        assert!(matches!(extract(&[], 44100), Err(RunError::EmptyBuffer)));
    }

    #[test]
    fn extraction_is_deterministic() {
        let samples = sine(440.0, 8000, 4096, 1000.0);
        let a = extract(&samples, 8000).unwrap();
        let b = extract(&samples, 8000).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn quantization_is_idempotent() {
        for v in [0.0, 10.0, -30.0, 12340.0] {
            assert_eq!(quantize_mag(v), v);
        }
        for f in [0i64, 10, 440, 12340] {
            assert_eq!(quantize_freq(f as f64), f);
        }
    }

    #[test]
    fn sine_peak_lands_on_quantized_bin() {
        // 440 Hz tone; the strongest bin should quantize to 440.
        let samples = sine(440.0, 8000, 8000, 10_000.0);
        let spectrum = extract(&samples, 8000).unwrap();
        let (peak_freq, _) = spectrum
            .iter()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
            .unwrap();
        assert_eq!(peak_freq, 440);
    }

    #[test]
    fn keeps_only_nonnegative_half() {
        let samples = sine(100.0, 1000, 1000, 100.0);
        let spectrum = extract(&samples, 1000).unwrap();
        // Nyquist for 1 kHz sampling is 500 Hz; bins stop just below it,
        // though the topmost bin may round up to 500 after quantization.
        assert!(spectrum.freqs().all(|f| (0..=500).contains(&f)));
    }

    #[test]
    fn collision_keeps_larger_magnitude() {
        let mut s = Spectrum::new();
        s.insert_max(100, 20.0);
        s.insert_max(100, 50.0);
        s.insert_max(100, 30.0);
        assert_eq!(s.get(100), Some(50.0));
        assert_eq!(s.len(), 1);
    }
}
