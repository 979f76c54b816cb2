pub mod json;
pub mod memory;

use std::collections::HashSet;

use crate::app::Result;
use crate::domain::Subscriber;

pub use json::JsonStore;
pub use memory::MemoryStore;

/// Persistence boundary. Rule sets are loaded and saved wholesale;
/// dedup state must be saveable incrementally, after every successful
/// notification, not only at shutdown.
pub trait Store: Send + Sync {
    fn load_subscribers(&self) -> Result<Vec<Subscriber>>;
    fn save_subscribers(&self, subscribers: &[Subscriber]) -> Result<()>;

    fn load_dedup(&self) -> Result<HashSet<String>>;
    fn save_dedup(&self, ids: &HashSet<String>) -> Result<()>;
}
