//! The fetch collaborator contract and an in-memory implementation.

use suggest_core::{FetchError, Suggestion};

/// Supplies suggestions for a query. Implementations may block (network,
/// database); they run on the fetch worker thread, never on the UI thread.
pub trait SuggestionSource: Send + Sync {
    fn fetch_suggestions(&self, query: &str) -> Result<Vec<Suggestion>, FetchError>;

    /// Resolve the display record of a previously committed value.
    fn fetch_saved_info(&self, value: &str) -> Result<Suggestion, FetchError>;
}

/// Fixed list of suggestions matched by case-insensitive substring.
#[derive(Debug, Clone, Default)]
pub struct CatalogSource {
    entries: Vec<Suggestion>,
    limit: Option<usize>,
}

impl CatalogSource {
    pub fn new(entries: Vec<Suggestion>) -> Self {
        Self {
            entries,
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json).map(Self::new)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SuggestionSource for CatalogSource {
    fn fetch_suggestions(&self, query: &str) -> Result<Vec<Suggestion>, FetchError> {
        let needle = query.to_lowercase();
        let matches = self
            .entries
            .iter()
            .filter(|s| s.label.to_lowercase().contains(&needle))
            .take(self.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(matches)
    }

    fn fetch_saved_info(&self, value: &str) -> Result<Suggestion, FetchError> {
        self.entries
            .iter()
            .find(|s| s.value == value)
            .cloned()
            .ok_or_else(|| FetchError::rejected(format!("unknown value {value:?}")))
    }
}
