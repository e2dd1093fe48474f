use super::spectrum::Spectrum;

/// One fingerprinted sample file: its raw spectrum and the unique
/// (baseline-subtracted) spectrum the matcher scores against.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub id: String,
    pub raw: Spectrum,
    pub unique: Spectrum,
}

/// The session's fingerprints, in load order.
///
/// Entries keep their insertion order so the matcher's tie-break on equal
/// scores follows catalog order. A catalog is built in full on every load
/// and swapped in as a unit, never merged with a prior one.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: CatalogEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }
}
