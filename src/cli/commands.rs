//! Command implementations. Thin glue over the store and the core
//! modules; all matching and scheduling decisions live elsewhere.

use crate::app::{AppContext, FeedwatchError, Result};
use crate::daemon;
use crate::dedup::DedupCache;
use crate::domain::{Source, Subscriber};

/// Load subscribers, apply `f` to the subscriber for `chat` (creating
/// it if needed), and save the whole set back.
fn with_subscriber<F>(ctx: &AppContext, chat: &str, f: F) -> Result<()>
where
    F: FnOnce(&mut Subscriber) -> Result<()>,
{
    let mut subscribers = ctx.store.load_subscribers()?;

    let subscriber = match subscribers.iter_mut().find(|s| s.id == chat) {
        Some(s) => s,
        None => {
            subscribers.push(Subscriber::new(chat));
            subscribers.last_mut().expect("just pushed")
        }
    };

    f(subscriber)?;
    ctx.store.save_subscribers(&subscribers)
}

fn find_subscriber(ctx: &AppContext, chat: &str) -> Result<Subscriber> {
    ctx.store
        .load_subscribers()?
        .into_iter()
        .find(|s| s.id == chat)
        .ok_or_else(|| FeedwatchError::SubscriberNotFound(chat.to_string()))
}

/// Convert 1-based CLI numbers to zero-based indices.
fn to_indices(numbers: &[usize]) -> Result<Vec<usize>> {
    numbers
        .iter()
        .map(|n| {
            n.checked_sub(1)
                .ok_or_else(|| FeedwatchError::Other("rule numbers start at 1".into()))
        })
        .collect()
}

pub fn register(ctx: &AppContext, chat: &str) -> Result<()> {
    with_subscriber(ctx, chat, |_| Ok(()))?;
    println!("Subscriber '{}' registered", chat);
    Ok(())
}

pub fn add_source(ctx: &AppContext, chat: &str, url: &str) -> Result<()> {
    with_subscriber(ctx, chat, |sub| {
        let source = Source::new(url);
        let url = source.url.clone();
        if sub.add_source(source) {
            println!("Added source: {}", url);
        } else {
            println!("Source already exists: {}", url);
        }
        Ok(())
    })
}

pub fn remove_source(ctx: &AppContext, chat: &str, number: usize) -> Result<()> {
    with_subscriber(ctx, chat, |sub| {
        let index = number
            .checked_sub(1)
            .ok_or_else(|| FeedwatchError::Other("source numbers start at 1".into()))?;
        match sub.remove_source(index) {
            Some(source) => {
                println!("Removed source: {}", source.url);
                Ok(())
            }
            None => Err(FeedwatchError::SourceNotFound(format!("#{number}"))),
        }
    })
}

pub fn list_sources(ctx: &AppContext, chat: &str) -> Result<()> {
    let subscriber = find_subscriber(ctx, chat)?;

    if subscriber.sources.is_empty() {
        println!("No sources");
        return Ok(());
    }

    for (i, source) in subscriber.sources.iter().enumerate() {
        println!(
            "{}. {} ({} keywords, {} regexes)",
            i + 1,
            source.url,
            source.keywords.len(),
            source.regexes.len()
        );
    }
    Ok(())
}

pub fn show_source(ctx: &AppContext, chat: &str, number: usize) -> Result<()> {
    let subscriber = find_subscriber(ctx, chat)?;
    let source = number
        .checked_sub(1)
        .and_then(|i| subscriber.source(i))
        .ok_or_else(|| FeedwatchError::SourceNotFound(format!("#{number}")))?;

    println!("Source {} ({})", number, source.url);

    println!("\nKeywords:");
    if source.keywords.is_empty() {
        println!("  (none)");
    }
    for (i, kw) in source.keywords.iter().enumerate() {
        println!("  {}. {}", i + 1, kw);
    }

    println!("\nRegexes:");
    if source.regexes.is_empty() {
        println!("  (none)");
    }
    for (i, re) in source.regexes.iter().enumerate() {
        println!("  {}. {}", i + 1, re);
    }
    Ok(())
}

pub fn add_rules(
    ctx: &AppContext,
    chat: &str,
    number: usize,
    regex: bool,
    exprs: &[String],
) -> Result<()> {
    with_subscriber(ctx, chat, |sub| {
        let source = number
            .checked_sub(1)
            .and_then(|i| sub.source_mut(i))
            .ok_or_else(|| FeedwatchError::SourceNotFound(format!("#{number}")))?;

        if regex {
            // A regex may contain spaces; the CLI words are one pattern.
            let pattern = exprs.join(" ");
            source.add_regex(&pattern)?;
            println!("Added regex: {}", pattern);
        } else {
            for expr in exprs {
                source.add_keyword(expr);
                println!("Added keyword: {}", expr.trim().to_lowercase());
            }
        }
        Ok(())
    })
}

pub fn remove_rules(
    ctx: &AppContext,
    chat: &str,
    number: usize,
    regex: bool,
    numbers: &[usize],
) -> Result<()> {
    let indices = to_indices(numbers)?;

    with_subscriber(ctx, chat, |sub| {
        let source = number
            .checked_sub(1)
            .and_then(|i| sub.source_mut(i))
            .ok_or_else(|| FeedwatchError::SourceNotFound(format!("#{number}")))?;

        let removed = if regex {
            source.remove_regexes(&indices)
        } else {
            source.remove_keywords(&indices)
        };

        if removed.is_empty() {
            println!("Nothing removed (check the rule numbers with `show`)");
        }
        for rule in removed {
            println!("Removed: {}", rule);
        }
        Ok(())
    })
}

/// Run exactly one poll cycle against the persisted state.
pub async fn run_once(ctx: &AppContext) -> Result<()> {
    let mut dedup = DedupCache::from_ids(ctx.store.load_dedup()?);
    let stats = daemon::run_cycle(ctx, &mut dedup).await;
    println!(
        "Cycle complete: {} notified, {} errors",
        stats.notified, stats.errors
    );
    Ok(())
}
