pub mod entry;
pub mod source;
pub mod subscriber;

pub use entry::FeedEntry;
pub use source::Source;
pub use subscriber::Subscriber;
