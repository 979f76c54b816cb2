//! Dedup cache: the set of entry identifiers that have already been
//! reported. Loaded once at startup, persisted after every successful
//! mark. Identifiers are never removed; an entry reported once is
//! never reported again, even if it disappears from the feed and
//! comes back.

use std::collections::HashSet;

#[derive(Debug, Default, Clone)]
pub struct DedupCache {
    seen: HashSet<String>,
}

impl DedupCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: HashSet<String>) -> Self {
        Self { seen: ids }
    }

    pub fn seen(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Mark an identifier as reported. Returns `false` if it was
    /// already present.
    pub fn mark(&mut self, id: String) -> bool {
        self.seen.insert(id)
    }

    /// The full identifier set, for persistence.
    pub fn ids(&self) -> &HashSet<String> {
        &self.seen
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_then_seen() {
        let mut cache = DedupCache::new();
        assert!(!cache.seen("entry-1"));
        assert!(cache.mark("entry-1".into()));
        assert!(cache.seen("entry-1"));
    }

    #[test]
    fn double_mark_is_detected() {
        let mut cache = DedupCache::new();
        assert!(cache.mark("entry-1".into()));
        assert!(!cache.mark("entry-1".into()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn from_ids_preserves_state() {
        let ids: HashSet<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
        let cache = DedupCache::from_ids(ids);
        assert!(cache.seen("a"));
        assert!(cache.seen("b"));
        assert!(!cache.seen("c"));
    }
}
