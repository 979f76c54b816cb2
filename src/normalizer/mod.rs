//! Feed parsing: converts raw RSS/Atom bytes into [`FeedEntry`] values.
//!
//! Entry identity is the feed-supplied GUID when present, otherwise the
//! permalink. Entries with neither are dropped: without a stable
//! identifier they cannot be deduplicated.

use feed_rs::parser;
use html_escape::decode_html_entities;

use crate::app::{FeedwatchError, Result};
use crate::domain::FeedEntry;

#[derive(Debug, Clone, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, body: &[u8]) -> Result<Vec<FeedEntry>> {
        let feed = parser::parse(body).map_err(|e| FeedwatchError::FeedParse(e.to_string()))?;

        let entries = feed
            .entries
            .into_iter()
            .filter_map(|entry| {
                let link = entry
                    .links
                    .first()
                    .map(|l| l.href.clone())
                    .unwrap_or_default();
                let id = if entry.id.is_empty() {
                    link.clone()
                } else {
                    entry.id
                };
                if id.is_empty() {
                    return None;
                }

                let title = entry
                    .title
                    .map(|t| decode_html_entities(&t.content).to_string())
                    .unwrap_or_default();

                Some(FeedEntry { id, title, link })
            })
            .collect();

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Feed</title>
    <item>
      <title>DMIT 2GB VPS Sale</title>
      <link>https://example.com/item1</link>
      <guid>item-1</guid>
    </item>
    <item>
      <title>Random Blog Post</title>
      <link>https://example.com/item2</link>
    </item>
  </channel>
</rss>"#;

    const ATOM_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Test Feed</title>
  <entry>
    <title>Atom Entry &amp; Friends</title>
    <link href="https://example.com/atom1"/>
    <id>atom-entry-1</id>
    <updated>2024-01-01T00:00:00Z</updated>
  </entry>
</feed>"#;

    #[test]
    fn rss_guid_is_entry_id() {
        let entries = Normalizer::new().normalize(RSS_SAMPLE.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "item-1");
        assert_eq!(entries[0].title, "DMIT 2GB VPS Sale");
        assert_eq!(entries[0].link, "https://example.com/item1");
    }

    #[test]
    fn guidless_entry_still_gets_a_stable_id() {
        // Without a <guid> the id falls back to the permalink (or a
        // parser-derived hash of it); what dedup needs is that it is
        // non-empty and deterministic across fetches.
        let a = Normalizer::new().normalize(RSS_SAMPLE.as_bytes()).unwrap();
        let b = Normalizer::new().normalize(RSS_SAMPLE.as_bytes()).unwrap();
        assert!(!a[1].id.is_empty());
        assert_eq!(a[1].id, b[1].id);
        assert_ne!(a[1].id, a[0].id);
    }

    #[test]
    fn atom_entities_are_decoded() {
        let entries = Normalizer::new().normalize(ATOM_SAMPLE.as_bytes()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "atom-entry-1");
        assert_eq!(entries[0].title, "Atom Entry & Friends");
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = Normalizer::new().normalize(b"not a feed").unwrap_err();
        assert!(matches!(err, FeedwatchError::FeedParse(_)));
    }
}
