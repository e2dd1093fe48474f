use std::collections::BTreeSet;

use super::spectrum::{quantize_mag, Spectrum};
use crate::error::RunError;

/// Derive the baseline (common) spectrum shared by a set of sample spectra.
///
/// The baseline's key set is the intersection of every sample's key set;
/// each value is the arithmetic mean of the corresponding magnitudes,
/// rounded to the nearest 10. The baseline is always recomputed wholesale,
/// never updated incrementally.
pub fn aggregate(spectra: &[&Spectrum]) -> Result<Spectrum, RunError> {
    if spectra.len() < 2 {
        return Err(RunError::InsufficientSamples(spectra.len()));
    }

    let mut common: BTreeSet<i64> = spectra[0].freqs().collect();
    for spectrum in &spectra[1..] {
        let keys: BTreeSet<i64> = spectrum.freqs().collect();
        common = common.intersection(&keys).copied().collect();
        if common.is_empty() {
            break;
        }
    }

    if common.is_empty() {
        return Err(RunError::NoCommonFrequencies);
    }

    let mut baseline = Spectrum::new();
    for &freq in &common {
        let sum: f64 = spectra
            .iter()
            .filter_map(|s| s.get(freq))
            .sum();
        baseline.set(freq, quantize_mag(sum / spectra.len() as f64));
    }

    Ok(baseline)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_sample_is_rejected() {
        let s = Spectrum::from_pairs([(100, 50.0)]);
        assert!(matches!(
            aggregate(&[&s]),
            Err(RunError::InsufficientSamples(1))
        ));
        assert!(matches!(aggregate(&[]), Err(RunError::InsufficientSamples(0))));
    }

    #[test]
    fn disjoint_spectra_have_no_baseline() {
        let a = Spectrum::from_pairs([(100, 50.0)]);
        let b = Spectrum::from_pairs([(200, 50.0)]);
        assert!(matches!(
            aggregate(&[&a, &b]),
            Err(RunError::NoCommonFrequencies)
        ));
    }

    #[test]
    fn baseline_is_intersection_of_key_sets() {
        let a = Spectrum::from_pairs([(100, 50.0), (200, 10.0), (300, 20.0)]);
        let b = Spectrum::from_pairs([(100, 52.0), (200, 10.0), (400, 30.0)]);
        let c = Spectrum::from_pairs([(100, 48.0), (200, 10.0), (500, 40.0)]);

        let baseline = aggregate(&[&a, &b, &c]).unwrap();
        let keys: Vec<i64> = baseline.freqs().collect();
        assert_eq!(keys, vec![100, 200]);

        // Every baseline key belongs to every sample.
        for s in [&a, &b, &c] {
            assert!(baseline.freqs().all(|f| s.contains(f)));
        }
    }

    #[test]
    fn dropping_a_sample_only_grows_or_preserves_the_baseline() {
        let a = Spectrum::from_pairs([(100, 50.0), (200, 10.0)]);
        let b = Spectrum::from_pairs([(100, 52.0), (200, 10.0), (300, 5.0)]);
        let c = Spectrum::from_pairs([(100, 48.0), (300, 5.0)]);

        let full = aggregate(&[&a, &b, &c]).unwrap();
        let without_c = aggregate(&[&a, &b]).unwrap();
        assert!(full.freqs().all(|f| without_c.contains(f)));
    }

    #[test]
    fn scenario_three_samples_mean_rounds_to_fifty() {
        // Shared bins at 100 Hz (50, 52, 48) and 200 Hz (10, 10, 10).
        let a = Spectrum::from_pairs([(100, 50.0), (200, 10.0), (300, 70.0)]);
        let b = Spectrum::from_pairs([(100, 52.0), (200, 10.0), (400, 80.0)]);
        let c = Spectrum::from_pairs([(100, 48.0), (200, 10.0), (500, 90.0)]);

        let baseline = aggregate(&[&a, &b, &c]).unwrap();
        assert_eq!(baseline.get(100), Some(50.0));
        assert_eq!(baseline.get(200), Some(10.0));
        assert_eq!(baseline.len(), 2);
    }
}
