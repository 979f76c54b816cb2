//! In-memory store for tests and library embedding.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::app::Result;
use crate::domain::Subscriber;
use crate::store::Store;

#[derive(Default)]
pub struct MemoryStore {
    subscribers: Mutex<Vec<Subscriber>>,
    dedup: Mutex<HashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subscribers(subscribers: Vec<Subscriber>) -> Self {
        Self {
            subscribers: Mutex::new(subscribers),
            dedup: Mutex::new(HashSet::new()),
        }
    }
}

impl Store for MemoryStore {
    fn load_subscribers(&self) -> Result<Vec<Subscriber>> {
        Ok(self.subscribers.lock().expect("store lock poisoned").clone())
    }

    fn save_subscribers(&self, subscribers: &[Subscriber]) -> Result<()> {
        *self.subscribers.lock().expect("store lock poisoned") = subscribers.to_vec();
        Ok(())
    }

    fn load_dedup(&self) -> Result<HashSet<String>> {
        Ok(self.dedup.lock().expect("store lock poisoned").clone())
    }

    fn save_dedup(&self, ids: &HashSet<String>) -> Result<()> {
        *self.dedup.lock().expect("store lock poisoned") = ids.clone();
        Ok(())
    }
}
