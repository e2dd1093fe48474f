use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::baseline;
use super::catalog::{Catalog, CatalogEntry};
use super::matcher::{self, Match};
use super::residual;
use super::spectrum::{self, Spectrum};
use crate::audio::decode::decode_pcm;
use crate::error::RunError;

/// Baseline and catalog always travel together: residuals in the catalog
/// only make sense against the baseline they were derived from, so the pair
/// is built in full and swapped in as one unit.
#[derive(Debug)]
struct AnalysisState {
    baseline: Spectrum,
    catalog: Catalog,
}

/// Outcome of a `load_samples` call: how many files made it into the
/// catalog, plus one warning per skipped file.
#[derive(Debug)]
pub struct LoadReport {
    pub loaded: usize,
    pub warnings: Vec<String>,
}

/// Ranked matches for one query file. An empty `matches` list means the
/// query shared no frequencies with any catalog sample.
#[derive(Debug)]
pub struct QueryResult {
    pub query_id: String,
    pub matches: Vec<Match>,
}

/// Outcome of a `compare` call over a batch of query files. Queries that
/// failed to decode appear in `warnings`; the rest proceed independently.
#[derive(Debug)]
pub struct CompareReport {
    pub results: Vec<QueryResult>,
    pub warnings: Vec<String>,
}

/// One analysis session: the sole owner of the baseline spectrum, the
/// fingerprint catalog, the raw query spectra kept for plotting, and the
/// last comparison results per query.
///
/// Sample and query spectra live in separate stores; queries are never
/// folded into the catalog.
#[derive(Debug, Default)]
pub struct Session {
    state: Option<AnalysisState>,
    query_spectra: Vec<(String, Spectrum)>,
    results: HashMap<String, Vec<Match>>,
}

fn file_id(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn extract_file(path: &Path) -> Result<Spectrum, RunError> {
    let audio = decode_pcm(path).map_err(|e| RunError::Decode {
        file: file_id(path),
        reason: format!("{e:#}"),
    })?;
    spectrum::extract(&audio.samples, audio.sample_rate)
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the fingerprint catalog from a batch of sample files.
    ///
    /// Files that fail to decode are skipped with a warning so one corrupt
    /// sample cannot block the batch. If the survivors cannot form a
    /// baseline (fewer than two, or no common frequencies) the rebuild
    /// fails and the previous catalog and baseline stay in place; the new
    /// state is only installed on full success.
    pub fn load_samples(&mut self, paths: &[PathBuf]) -> Result<LoadReport, RunError> {
        let mut warnings = Vec::new();

        let extracted: Vec<(String, Result<Spectrum, RunError>)> = paths
            .par_iter()
            .map(|path| (file_id(path), extract_file(path)))
            .collect();

        let mut spectra: Vec<(String, Spectrum)> = Vec::new();
        for (id, result) in extracted {
            match result {
                Ok(spectrum) => spectra.push((id, spectrum)),
                Err(e) => warnings.push(format!("skipping {id}: {e}")),
            }
        }

        let refs: Vec<&Spectrum> = spectra.iter().map(|(_, s)| s).collect();
        let baseline = baseline::aggregate(&refs)?;

        let mut catalog = Catalog::new();
        for (id, raw) in spectra {
            let unique = residual::derive(&raw, &baseline);
            catalog.push(CatalogEntry { id, raw, unique });
        }

        log::info!(
            "catalog rebuilt: {} samples, {} baseline bins",
            catalog.len(),
            baseline.len()
        );

        let loaded = catalog.len();
        self.state = Some(AnalysisState { baseline, catalog });
        self.query_spectra.clear();
        self.results.clear();

        Ok(LoadReport { loaded, warnings })
    }

    /// Compare a batch of query files against the loaded catalog.
    ///
    /// Each query is decoded, reduced to a residual against the current
    /// baseline, and ranked against every sample's unique spectrum. A query
    /// that fails to decode is reported as a warning without touching the
    /// others. The stored result set for each query id is replaced.
    pub fn compare(&mut self, paths: &[PathBuf]) -> Result<CompareReport, RunError> {
        let state = self.state.as_ref().ok_or(RunError::NoBaseline)?;
        if state.catalog.is_empty() {
            return Err(RunError::EmptyCatalog);
        }

        let mut results = Vec::new();
        let mut warnings = Vec::new();

        for path in paths {
            let id = file_id(path);
            let raw = match extract_file(path) {
                Ok(s) => s,
                Err(e) => {
                    warnings.push(format!("query {id} failed: {e}"));
                    continue;
                }
            };

            let query_residual = residual::derive(&raw, &state.baseline);
            let matches = matcher::rank(&query_residual, &state.catalog);

            for m in &matches {
                log::info!("similarity of {} with {}: {:.2}%", id, m.sample_id, m.score);
            }
            if matches.is_empty() {
                log::info!("no matching frequencies found for {id}");
            }

            self.query_spectra.retain(|(existing, _)| *existing != id);
            self.query_spectra.push((id.clone(), raw));
            self.results.insert(id.clone(), matches.clone());
            results.push(QueryResult { query_id: id, matches });
        }

        Ok(CompareReport { results, warnings })
    }

    /// Raw spectrum for a sample or a previously compared query file.
    pub fn raw_spectrum(&self, id: &str) -> Option<&Spectrum> {
        if let Some(state) = &self.state {
            if let Some(entry) = state.catalog.get(id) {
                return Some(&entry.raw);
            }
        }
        self.query_spectra
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, s)| s)
    }

    /// Unique (residual) spectrum for a catalog sample.
    pub fn unique_spectrum(&self, id: &str) -> Option<&Spectrum> {
        self.state
            .as_ref()
            .and_then(|state| state.catalog.get(id))
            .map(|entry| &entry.unique)
    }

    pub fn baseline(&self) -> Option<&Spectrum> {
        self.state.as_ref().map(|state| &state.baseline)
    }

    /// Last stored matches for a query id, if any.
    pub fn last_results(&self, query_id: &str) -> Option<&[Match]> {
        self.results.get(query_id).map(|m| m.as_slice())
    }
}
