//! # Feedwatch
//!
//! Watches RSS/Atom feeds per subscriber, matches new entries against
//! keyword (`+A+B-C`) and regex rules, and delivers at most one
//! notification per entry.
//!
//! ## Architecture
//!
//! ```text
//! Scheduler tick → Fetcher → Normalizer → Matcher → Notifier
//!                                  │          │
//!                                  └── DedupCache ── Store
//! ```
//!
//! Each cycle iterates subscribers and their sources sequentially; a
//! source failure is logged and skipped, never fatal. An entry is
//! dedup-marked (and the mark persisted) only after its notification
//! was delivered, so delivery failures are retried on the next cycle.

/// Application context and error handling.
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// TOML configuration, read from `~/.config/feedwatch/config.toml`.
pub mod config;

/// Poll scheduler: the fetch→match→notify cycle and the interval
/// daemon driving it.
pub mod daemon;

/// The persisted set of already-reported entry identifiers.
pub mod dedup;

/// Core domain models: [`Subscriber`](domain::Subscriber),
/// [`Source`](domain::Source), [`FeedEntry`](domain::FeedEntry).
pub mod domain;

/// HTTP fetching boundary (one bounded-timeout request, no retries).
pub mod fetcher;

/// First-match-wins rule evaluation.
pub mod matcher;

/// RSS/Atom parsing into [`FeedEntry`](domain::FeedEntry) values.
pub mod normalizer;

/// Outbound notification boundary: Telegram Bot API or log-only.
pub mod notifier;

/// Keyword expression compiler and the unified [`Rule`](rules::Rule)
/// type.
pub mod rules;

/// Persistence boundary: JSON/flat-file store plus an in-memory store.
pub mod store;
