use serde::{Deserialize, Serialize};

use super::Source;

/// An opaque chat/account identifier owning zero or more sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}

impl Subscriber {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sources: Vec::new(),
        }
    }

    /// Add a source. Returns `false` (and leaves the list untouched)
    /// if the URL is already subscribed; URLs are unique within a
    /// subscriber.
    pub fn add_source(&mut self, source: Source) -> bool {
        if self.sources.iter().any(|s| s.url == source.url) {
            return false;
        }
        self.sources.push(source);
        true
    }

    pub fn source(&self, index: usize) -> Option<&Source> {
        self.sources.get(index)
    }

    pub fn source_mut(&mut self, index: usize) -> Option<&mut Source> {
        self.sources.get_mut(index)
    }

    pub fn remove_source(&mut self, index: usize) -> Option<Source> {
        if index < self.sources.len() {
            Some(self.sources.remove(index))
        } else {
            None
        }
    }
}
