//! Outbound message boundary.
//!
//! A delivery failure must surface as an error: the scheduler only
//! dedup-marks an entry after `deliver` succeeds, so a failed delivery
//! is retried on the next cycle.

pub mod message;
pub mod telegram;

pub use telegram::TelegramNotifier;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::FeedEntry;
use crate::matcher::RuleMatch;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(
        &self,
        subscriber_id: &str,
        source_url: &str,
        entry: &FeedEntry,
        matched: &RuleMatch,
    ) -> Result<()>;
}

/// Fallback notifier used when no transport is configured: matches are
/// only logged. Useful for dry runs.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn deliver(
        &self,
        subscriber_id: &str,
        source_url: &str,
        entry: &FeedEntry,
        matched: &RuleMatch,
    ) -> Result<()> {
        tracing::info!(
            subscriber = %subscriber_id,
            source = %source_url,
            title = %entry.title,
            rule = %matched.rule,
            "match (log-only delivery)"
        );
        Ok(())
    }
}
