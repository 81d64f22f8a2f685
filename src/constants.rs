//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!` so it's always available,
//! with no runtime file I/O. Parsed once on first access via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  pub api_base_url: String,
  pub link_prefix: String,

  // Channel references
  pub channel_id_prefix: String,
  pub handle_marker: String,

  // API limits
  pub page_size: usize,
  pub stats_batch_size: usize,

  // Scoring defaults
  pub view_weight: f64,
  pub like_weight: f64,
  pub comment_weight: f64,
  pub short_form_threshold_secs: u64,

  // Report
  pub top_n: usize,
  pub export_file_name: String,
  pub export_delimiter: char,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; if it's malformed the constants test fails.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn embedded_constants_parse() {
    let c = constants();
    assert_eq!(c.page_size, 50);
    assert_eq!(c.stats_batch_size, 50);
    assert_eq!(c.short_form_threshold_secs, 60);
    assert_eq!(c.export_delimiter, ';');
  }

  #[test]
  fn default_weights_match_canonical_formula() {
    let c = constants();
    assert_eq!((c.view_weight, c.like_weight, c.comment_weight), (1.0, 5.0, 10.0));
  }
}
