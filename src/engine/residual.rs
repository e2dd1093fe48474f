use super::spectrum::{quantize_mag, Spectrum};

/// Subtract the baseline from a spectrum to obtain its unique (residual)
/// spectrum.
///
/// For every bin in the source: if the baseline holds the same quantized
/// frequency, the residual is the rounded difference (which may be
/// negative); otherwise the magnitude passes through unchanged. The
/// residual's key set always equals the source's. Total function; an empty
/// baseline yields the source unmodified.
pub fn derive(spectrum: &Spectrum, baseline: &Spectrum) -> Spectrum {
    let mut residual = Spectrum::new();
    for (freq, mag) in spectrum.iter() {
        let value = match baseline.get(freq) {
            Some(base) => quantize_mag(mag - base),
            None => mag,
        };
        residual.set(freq, value);
    }
    residual
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtracts_where_baseline_overlaps() {
        let spectrum = Spectrum::from_pairs([(100, 50.0), (200, 10.0), (300, 70.0)]);
        let baseline = Spectrum::from_pairs([(100, 50.0), (200, 10.0)]);

        let residual = derive(&spectrum, &baseline);
        assert_eq!(residual.get(100), Some(0.0));
        assert_eq!(residual.get(200), Some(0.0));
        // Bin absent from the baseline passes through unchanged.
        assert_eq!(residual.get(300), Some(70.0));
    }

    #[test]
    fn key_set_matches_the_source() {
        let spectrum = Spectrum::from_pairs([(100, 40.0), (250, 90.0)]);
        let baseline = Spectrum::from_pairs([(100, 10.0), (900, 10.0)]);

        let residual = derive(&spectrum, &baseline);
        let keys: Vec<i64> = residual.freqs().collect();
        assert_eq!(keys, vec![100, 250]);
    }

    #[test]
    fn residual_may_go_negative() {
        let spectrum = Spectrum::from_pairs([(100, 20.0)]);
        let baseline = Spectrum::from_pairs([(100, 50.0)]);
        assert_eq!(derive(&spectrum, &baseline).get(100), Some(-30.0));
    }

    #[test]
    fn residual_plus_baseline_recovers_the_magnitude() {
        let spectrum = Spectrum::from_pairs([(100, 50.0), (200, 10.0), (300, 70.0)]);
        let baseline = Spectrum::from_pairs([(100, 48.0), (200, 12.0)]);

        let residual = derive(&spectrum, &baseline);
        for (freq, mag) in spectrum.iter() {
            let recovered = match baseline.get(freq) {
                Some(base) => residual.get(freq).unwrap() + base,
                None => residual.get(freq).unwrap(),
            };
            assert!((recovered - mag).abs() <= 10.0);
        }
    }

    #[test]
    fn empty_baseline_is_a_noop() {
        let spectrum = Spectrum::from_pairs([(100, 50.0), (200, 10.0)]);
        let residual = derive(&spectrum, &Spectrum::new());
        assert_eq!(residual, spectrum);
    }
}
