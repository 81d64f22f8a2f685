use chrono::{DateTime, Utc};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::error::AnalyzeError;
use crate::model::VideoRecord;

const TITLE_WIDTH: usize = 48;

// --- Helpers ---

/// Truncate to `max_width` display columns (CJK counts double), appending "…" if cut.
fn truncate_str(s: &str, max_width: usize) -> String {
  if s.width() <= max_width {
    return s.to_string();
  }
  let mut out = String::new();
  let mut used = 0;
  for c in s.chars() {
    let w = c.width().unwrap_or(0);
    if used + w > max_width.saturating_sub(1) {
      break;
    }
    out.push(c);
    used += w;
  }
  out.push('…');
  out
}

/// Left-align `s` in a column `width` display columns wide.
fn pad(s: &str, width: usize) -> String {
  let fill = width.saturating_sub(s.width());
  format!("{}{}", s, " ".repeat(fill))
}

/// `2024-03-01T12:00:00Z` becomes `2024-03-01`; unparseable stamps pass through.
fn short_date(published_at: &str) -> String {
  published_at
    .parse::<DateTime<Utc>>()
    .map(|dt| dt.format("%Y-%m-%d").to_string())
    .unwrap_or_else(|_| published_at.to_string())
}

/// `1234567` becomes `1,234,567`.
fn group_thousands(n: u64) -> String {
  let digits = n.to_string();
  let mut out = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(',');
    }
    out.push(c);
  }
  out
}

// --- Rendering ---

/// Plain-text table of the first `top` records.
pub fn render_table(records: &[VideoRecord], top: usize) -> String {
  let mut lines = vec![format!(
    "{:>3}  {}  {:<10}  {:>13}  {:>9}  {:>8}  {:>5}  {:>6}  {:>15}  {}",
    "#",
    pad("Title", TITLE_WIDTH),
    "Published",
    "Views",
    "Likes",
    "Comments",
    "Type",
    "Secs",
    "Virality",
    "Link"
  )];
  for (rank, r) in records.iter().take(top).enumerate() {
    lines.push(format!(
      "{:>3}  {}  {:<10}  {:>13}  {:>9}  {:>8}  {:>5}  {:>6}  {:>15}  {}",
      rank + 1,
      pad(&truncate_str(&r.title, TITLE_WIDTH), TITLE_WIDTH),
      short_date(&r.published_at),
      group_thousands(r.views),
      group_thousands(r.likes),
      group_thousands(r.comments),
      r.classification.label(),
      r.duration_secs,
      format!("{:.0}", r.virality),
      r.link
    ));
  }
  lines.join("\n")
}

pub fn success_message(total: usize) -> String {
  format!("{} videos analysed.", total)
}

pub fn empty_message() -> &'static str {
  "No qualifying videos for this channel and filter."
}

/// One distinct message per failure kind.
pub fn failure_message(err: &AnalyzeError) -> String {
  match err {
    AnalyzeError::InvalidInput(what) => format!("Missing input: {}.", what),
    AnalyzeError::ResolutionFailed(e) => format!("Channel not found or invalid: {}", e),
    AnalyzeError::ChannelNotFound(id) => format!("No channel with id {} (or it has no uploads).", id),
    AnalyzeError::CollectionFailed(e) => format!("Collecting videos failed: {}", e),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::{ApiError, ResolveError};
  use crate::model::Classification;

  fn record(title: &str) -> VideoRecord {
    VideoRecord {
      video_id: "v1".to_string(),
      title: title.to_string(),
      published_at: "2024-03-01T12:00:00Z".to_string(),
      views: 1_234_567,
      likes: 10,
      comments: 2,
      duration_secs: 30,
      classification: Classification::ShortForm,
      virality: 1_234_637.0,
      link: "https://youtu.be/v1".to_string(),
    }
  }

  #[test]
  fn truncate_respects_display_width() {
    assert_eq!(truncate_str("hello", 10), "hello");
    assert_eq!(truncate_str("hello world", 6), "hello…");
    assert_eq!(truncate_str("日本語のタイトル", 5), "日本…");
  }

  #[test]
  fn thousands_are_grouped() {
    assert_eq!(group_thousands(0), "0");
    assert_eq!(group_thousands(999), "999");
    assert_eq!(group_thousands(1000), "1,000");
    assert_eq!(group_thousands(1_234_567), "1,234,567");
  }

  #[test]
  fn dates_are_shortened() {
    assert_eq!(short_date("2024-03-01T12:00:00Z"), "2024-03-01");
    assert_eq!(short_date("yesterday"), "yesterday");
  }

  #[test]
  fn table_shows_only_top_rows() {
    let records: Vec<VideoRecord> = (0..8).map(|i| record(&format!("Video {i}"))).collect();
    let table = render_table(&records, 5);
    assert_eq!(table.lines().count(), 6);
    assert!(table.contains("1,234,567"));
    assert!(table.contains("Video 4"));
    assert!(!table.contains("Video 5"));
  }

  #[test]
  fn failure_messages_are_distinct() {
    let msgs = [
      failure_message(&AnalyzeError::InvalidInput("an API key is required")),
      failure_message(&AnalyzeError::ResolutionFailed(ResolveError::NotFound("x".into()))),
      failure_message(&AnalyzeError::ChannelNotFound("UCx".into())),
      failure_message(&AnalyzeError::CollectionFailed(ApiError::Status {
        endpoint: "videos",
        status: 500,
        message: "boom".into(),
      })),
    ];
    for (i, a) in msgs.iter().enumerate() {
      for b in &msgs[i + 1..] {
        assert_ne!(a, b);
      }
    }
    assert_eq!(msgs[0], "Missing input: an API key is required.");
  }

  #[test]
  fn empty_message_is_not_an_error() {
    assert!(!empty_message().to_lowercase().contains("error"));
    assert!(!empty_message().to_lowercase().contains("fail"));
  }
}
