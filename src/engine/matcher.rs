use super::catalog::Catalog;
use super::spectrum::Spectrum;

/// One ranked comparison outcome: a catalog sample and its similarity to
/// the query, as a percentage in [0, 100].
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub sample_id: String,
    pub score: f64,
}

/// Score a query's residual spectrum against every catalog entry.
///
/// For each sample, the score is the cosine similarity between the two
/// residuals over their shared frequency keys, clamped at zero (anti-phase
/// correlation counts as evidence of absence, not negative presence) and
/// scaled to a percentage. Samples sharing no frequencies with the query
/// contribute no entry at all; that is a distinct no-match outcome, not a
/// zero score. The result is sorted by descending score, ties keeping
/// catalog order.
pub fn rank(query_residual: &Spectrum, catalog: &Catalog) -> Vec<Match> {
    let mut matches: Vec<Match> = Vec::new();

    for entry in catalog.entries() {
        let mut query_mags = Vec::new();
        let mut sample_mags = Vec::new();
        for (freq, mag) in query_residual.iter() {
            if let Some(sample_mag) = entry.unique.get(freq) {
                query_mags.push(mag);
                sample_mags.push(sample_mag);
            }
        }

        if query_mags.is_empty() {
            continue;
        }

        let score = cosine_similarity(&query_mags, &sample_mags).max(0.0) * 100.0;
        matches.push(Match {
            sample_id: entry.id.clone(),
            score,
        });
    }

    matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    matches
}

fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a > 0.0 && norm_b > 0.0 {
        dot / (norm_a * norm_b)
    } else {
        0.0
    }
}
