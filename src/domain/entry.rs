/// One entry fetched from a feed. Transient: exists only for the
/// duration of a poll cycle, never persisted.
///
/// The identifier is the feed-supplied GUID when present, otherwise
/// the permalink; it is what the dedup cache tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub id: String,
    pub title: String,
    pub link: String,
}

impl FeedEntry {
    pub fn new(id: impl Into<String>, title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            link: link.into(),
        }
    }
}
