use async_trait::async_trait;
use serde::Serialize;

use crate::app::{FeedwatchError, Result};
use crate::domain::FeedEntry;
use crate::matcher::RuleMatch;
use crate::notifier::{message, Notifier};

/// Delivers matches as Telegram Bot API `sendMessage` calls. The
/// subscriber id is used directly as the chat id.
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_base: String,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
    disable_web_page_preview: bool,
}

impl TelegramNotifier {
    pub fn new(token: &str) -> Self {
        Self::with_api_base(format!("https://api.telegram.org/bot{token}"))
    }

    /// Point the notifier at a different API endpoint. Used by tests
    /// and by Bot API proxies.
    pub fn with_api_base(api_base: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base,
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn deliver(
        &self,
        subscriber_id: &str,
        source_url: &str,
        entry: &FeedEntry,
        matched: &RuleMatch,
    ) -> Result<()> {
        let host = message::source_host(source_url);
        let text = message::format_message(&host, entry, matched);

        let url = format!("{}/sendMessage", self.api_base);
        let body = SendMessage {
            chat_id: subscriber_id,
            text: &text,
            parse_mode: "MarkdownV2",
            disable_web_page_preview: true,
        };

        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(FeedwatchError::Delivery(format!(
                "sendMessage to {subscriber_id} failed: {status} {detail}"
            )));
        }

        Ok(())
    }
}
