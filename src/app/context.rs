use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::app::error::{FeedwatchError, Result};
use crate::config::Config;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;
use crate::notifier::{LogNotifier, Notifier, TelegramNotifier};
use crate::store::json::JsonStore;
use crate::store::Store;

/// Wires the components together behind the boundary traits so the
/// scheduler and the CLI commands share one view of the system.
pub struct AppContext {
    pub store: Arc<dyn Store>,
    pub fetcher: Arc<dyn Fetcher>,
    pub normalizer: Normalizer,
    pub notifier: Arc<dyn Notifier>,
    pub config: Config,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let data_dir = match &config.data_dir {
            Some(p) => p.clone(),
            None => Self::default_data_dir()?,
        };

        let store = Arc::new(JsonStore::new(&data_dir)?);
        let fetcher = Arc::new(HttpFetcher::new(Duration::from_secs(
            config.scheduler.fetch_timeout_secs,
        )));

        let notifier: Arc<dyn Notifier> = match config.bot_token() {
            Some(token) => Arc::new(TelegramNotifier::new(&token)),
            None => {
                tracing::warn!("no bot token configured, notifications go to the log only");
                Arc::new(LogNotifier)
            }
        };

        Ok(Self {
            store,
            fetcher,
            normalizer: Normalizer::new(),
            notifier,
            config,
        })
    }

    /// Assemble a context from explicit parts. Used by tests and by
    /// embedders that bring their own store or notifier.
    pub fn with_parts(
        config: Config,
        store: Arc<dyn Store>,
        fetcher: Arc<dyn Fetcher>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            fetcher,
            normalizer: Normalizer::new(),
            notifier,
            config,
        }
    }

    fn default_data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| FeedwatchError::Config("Could not find data directory".into()))?;
        let dir = data_dir.join("feedwatch");
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}
