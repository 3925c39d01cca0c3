//! Whitelisted tweet ids.

use std::collections::HashSet;

/// Tweet ids that must never be deleted, regardless of age.
///
/// Ids are stored in their decimal string form and compared by exact
/// equality, so `"042"` does not whitelist tweet `42`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExemptionSet {
    ids: HashSet<String>,
}

impl ExemptionSet {
    /// Parses a colon-separated list such as `"123:456"`.
    ///
    /// Empty segments are ignored.
    #[must_use]
    pub fn parse(joined: &str) -> Self {
        Self::from_ids(joined.split(':').map(str::to_string))
    }

    /// Builds a set from individual ids. Surrounding whitespace is trimmed.
    #[must_use]
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids = ids
            .into_iter()
            .map(|id| id.as_ref().trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        Self { ids }
    }

    /// Returns `true` if the tweet id is whitelisted.
    #[must_use]
    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id.to_string())
    }

    /// Number of whitelisted ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if nothing is whitelisted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whitelisted ids in sorted order, for display.
    #[must_use]
    pub fn sorted_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.ids.iter().cloned().collect();
        ids.sort();
        ids
    }
}
