use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::model::VideoRecord;

pub const HEADER: [&str; 8] =
  ["Title", "PublishedAt", "Views", "Likes", "Comments", "DurationSeconds", "ViralityScore", "Link"];

/// Quote a field when it contains the delimiter, a quote or a line break.
fn escape(field: &str, delimiter: char) -> String {
  if field.contains([delimiter, '"', '\n', '\r']) {
    format!("\"{}\"", field.replace('"', "\"\""))
  } else {
    field.to_string()
  }
}

/// Write `records` as delimited text, header first, one row per record.
///
/// Counts are written as plain integers and the score in its shortest
/// round-tripping decimal form, so nothing is lost on re-import.
pub fn write_csv<W: Write>(out: &mut W, records: &[VideoRecord], delimiter: char) -> Result<()> {
  let sep = delimiter.to_string();
  writeln!(out, "{}", HEADER.join(sep.as_str()))?;
  for r in records {
    let row = [
      escape(&r.title, delimiter),
      escape(&r.published_at, delimiter),
      r.views.to_string(),
      r.likes.to_string(),
      r.comments.to_string(),
      r.duration_secs.to_string(),
      r.virality.to_string(),
      escape(&r.link, delimiter),
    ];
    writeln!(out, "{}", row.join(sep.as_str()))?;
  }
  Ok(())
}

pub fn export_csv(path: &Path, records: &[VideoRecord], delimiter: char) -> Result<()> {
  let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
  let mut out = BufWriter::new(file);
  write_csv(&mut out, records, delimiter).with_context(|| format!("Failed to write {}", path.display()))?;
  out.flush().with_context(|| format!("Failed to flush {}", path.display()))?;
  Ok(())
}
