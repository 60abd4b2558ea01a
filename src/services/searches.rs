// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recent city searches, persisted in local storage.

use crate::error::Result;
use crate::storage::{keys, LocalStorage};

/// Maximum number of remembered searches.
pub const MAX_RECENT_SEARCHES: usize = 5;

#[derive(Clone)]
pub struct RecentSearches {
    storage: LocalStorage,
}

impl RecentSearches {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    /// Remembered queries, most recent first.
    pub fn list(&self) -> Vec<String> {
        match self.storage.get_json::<Vec<String>>(keys::RECENT_SEARCHES) {
            Ok(list) => list.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Recent searches are malformed, starting over");
                Vec::new()
            }
        }
    }

    /// Move `query` to the front, dropping an earlier case-insensitive match
    /// and anything past the limit. Blank queries are ignored.
    pub fn record(&self, query: &str) -> Result<Vec<String>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(self.list());
        }

        let lowered = query.to_lowercase();
        let mut list = self.list();
        list.retain(|q| q.to_lowercase() != lowered);
        list.insert(0, query.to_string());
        list.truncate(MAX_RECENT_SEARCHES);

        self.storage.set_json(keys::RECENT_SEARCHES, &list)?;
        Ok(list)
    }

    pub fn clear(&self) -> Result<()> {
        self.storage.remove(keys::RECENT_SEARCHES)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_most_recent_first_and_capped() {
        let searches = RecentSearches::new(LocalStorage::in_memory());
        for q in ["Paris", "Rome", "Oslo", "Lima", "Kyiv", "Bern"] {
            searches.record(q).unwrap();
        }
        assert_eq!(searches.list(), vec!["Bern", "Kyiv", "Lima", "Oslo", "Rome"]);
    }

    #[test]
    fn test_repeat_moves_to_front() {
        let searches = RecentSearches::new(LocalStorage::in_memory());
        searches.record("Paris").unwrap();
        searches.record("Rome").unwrap();
        searches.record("  paris ").unwrap();
        assert_eq!(searches.list(), vec!["paris", "Rome"]);
    }

    #[test]
    fn test_blank_ignored() {
        let searches = RecentSearches::new(LocalStorage::in_memory());
        searches.record("   ").unwrap();
        assert!(searches.list().is_empty());
    }

    #[test]
    fn test_malformed_value_reads_empty() {
        let storage = LocalStorage::in_memory();
        storage
            .set(keys::RECENT_SEARCHES, "{not json".to_string())
            .unwrap();
        let searches = RecentSearches::new(storage);
        assert!(searches.list().is_empty());
        searches.record("Prague").unwrap();
        assert_eq!(searches.list(), vec!["Prague"]);
    }
}
