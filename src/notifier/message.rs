//! Telegram MarkdownV2 message construction.

use chrono::Local;

use crate::domain::FeedEntry;
use crate::matcher::RuleMatch;
use crate::rules::RuleKind;

/// Rule descriptions longer than this are truncated in the message.
const MAX_RULE_DISPLAY: usize = 30;

/// Escape text for Telegram MarkdownV2. Every reserved character gets
/// a backslash.
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '_' | '*' | '[' | ']' | '(' | ')' | '~' | '`' | '>' | '#' | '+' | '-' | '='
                | '|' | '{' | '}' | '.' | '!'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape text for a MarkdownV2 inline code span, where only backtick
/// and backslash are reserved.
pub fn escape_code(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '`' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Short display name for the feed: the URL's host, or the raw string
/// when it does not parse as a URL.
pub fn source_host(source_url: &str) -> String {
    url::Url::parse(source_url)
        .ok()
        .and_then(|u| u.host_str().map(String::from))
        .unwrap_or_else(|| source_url.to_string())
}

/// Build the notification text for one matched entry.
pub fn format_message(source_name: &str, entry: &FeedEntry, matched: &RuleMatch) -> String {
    let header = match matched.kind {
        RuleKind::Keyword => "🎯",
        RuleKind::Regex => "🔍",
    };

    let mut rule = matched.rule.clone();
    if matched.kind == RuleKind::Regex && rule.chars().count() > MAX_RULE_DISPLAY {
        rule = rule.chars().take(MAX_RULE_DISPLAY - 3).collect::<String>() + "...";
    }

    let time = Local::now().format("%H:%M:%S");

    format!(
        "{header} *Feed match*\n\
         {sep}\n\
         📰 *{title}*\n\n\
         Rule: `{rule}`\n\
         🌐 {source}\n\
         🕐 {time}\n\n\
         [🔗 Read more]({link})",
        header = header,
        sep = "─".repeat(15),
        title = escape_markdown(&entry.title),
        rule = escape_code(&rule),
        source = escape_markdown(source_name),
        time = time,
        link = escape_markdown(&entry.link),
    )
}
