//! Plain-text rendering of the session for the terminal front-end.

use chrono::{DateTime, Utc};

use crate::articles::Article;
use crate::transcript::{EntryKind, TranscriptEntry};

/// Relative age of an article: "just now", "5 minutes ago", ... then "Nov 4".
pub fn time_ago(published: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(published);
    let mins = diff.num_minutes();
    let hours = diff.num_hours();
    let days = diff.num_days();

    if mins < 1 {
        "just now".to_string()
    } else if mins < 60 {
        format!("{} minute{} ago", mins, plural(mins))
    } else if hours < 24 {
        format!("{} hour{} ago", hours, plural(hours))
    } else if days < 7 {
        format!("{} day{} ago", days, plural(days))
    } else {
        published.format("%b %-d").to_string()
    }
}

fn plural(n: i64) -> &'static str {
    if n > 1 { "s" } else { "" }
}

/// First `max_chars` characters, with "..." when the text was longer.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

pub fn render_entry(entry: &TranscriptEntry) -> String {
    let time = entry.created_at.format("%H:%M");
    match entry.kind {
        EntryKind::User => format!("[{}] you: {}", time, entry.text.as_deref().unwrap_or_default()),
        EntryKind::Loading => "      ... searching...".to_string(),
        EntryKind::Assistant => {
            let mut out = format!("[{}] news: {}", time, entry.text.as_deref().unwrap_or_default());
            for (i, r) in entry.title_refs.iter().enumerate() {
                out.push_str(&format!("\n        #{} {}", i + 1, r.title));
            }
            out
        }
    }
}

pub fn render_card(position: usize, article: &Article, now: DateTime<Utc>, excerpt_chars: usize) -> String {
    let mut out = format!(
        "+-- card {} ----------------------------------------\n| {} | {}\n| {}\n| {}\n| image: {}",
        position + 1,
        article.source,
        time_ago(article.published_at, now),
        article.title,
        excerpt(&article.description, excerpt_chars),
        article.image_url,
    );
    if article.has_url() {
        out.push_str(&format!("\n| read: {}", article.url));
    }
    out.push_str("\n+--------------------------------------------------");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn time_ago_buckets() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
        assert_eq!(time_ago(now - Duration::seconds(30), now), "just now");
        assert_eq!(time_ago(now + Duration::minutes(5), now), "just now");
        assert_eq!(time_ago(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(time_ago(now - Duration::minutes(45), now), "45 minutes ago");
        assert_eq!(time_ago(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(time_ago(now - Duration::days(1), now), "1 day ago");
        assert_eq!(time_ago(now - Duration::days(6), now), "6 days ago");
        assert_eq!(time_ago(Utc.with_ymd_and_hms(2026, 9, 4, 0, 0, 0).unwrap(), now), "Sep 4");
    }

    #[test]
    fn excerpt_truncates_on_char_boundary() {
        assert_eq!(excerpt("short", 150), "short");
        assert_eq!(excerpt("héllo world", 5), "héllo...");
        assert_eq!(excerpt("exact", 5), "exact");
    }
}
