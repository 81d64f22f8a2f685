use clap::ValueEnum;

use crate::constants::constants;

/// Short-form vs long-form, decided purely by duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
  ShortForm,
  LongForm,
}

impl Classification {
  /// A video is short-form when its duration does not exceed `threshold_secs`.
  pub fn from_duration(duration_secs: u64, threshold_secs: u64) -> Self {
    if duration_secs <= threshold_secs { Classification::ShortForm } else { Classification::LongForm }
  }

  pub fn label(self) -> &'static str {
    match self {
      Classification::ShortForm => "short",
      Classification::LongForm => "long",
    }
  }
}

/// Which classifications survive into the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ClassificationFilter {
  #[default]
  All,
  Shorts,
  Long,
}

impl ClassificationFilter {
  pub fn accepts(self, classification: Classification) -> bool {
    match self {
      ClassificationFilter::All => true,
      ClassificationFilter::Shorts => classification == Classification::ShortForm,
      ClassificationFilter::Long => classification == Classification::LongForm,
    }
  }
}

/// Upper bound on how many uploads a run looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultCap {
  #[default]
  Unbounded,
  AtMost(usize),
}

impl ResultCap {
  /// `None` and `Some(0)` both mean unbounded.
  pub fn from_option(max: Option<usize>) -> Self {
    match max {
      Some(n) if n > 0 => ResultCap::AtMost(n),
      _ => ResultCap::Unbounded,
    }
  }

  pub fn is_reached(self, collected: usize) -> bool {
    match self {
      ResultCap::Unbounded => false,
      ResultCap::AtMost(n) => collected >= n,
    }
  }
}

/// Weights and threshold that turn raw counts into a ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scoring {
  pub view_weight: f64,
  pub like_weight: f64,
  pub comment_weight: f64,
  pub short_form_threshold_secs: u64,
}

impl Default for Scoring {
  fn default() -> Self {
    let c = constants();
    Self {
      view_weight: c.view_weight,
      like_weight: c.like_weight,
      comment_weight: c.comment_weight,
      short_form_threshold_secs: c.short_form_threshold_secs,
    }
  }
}

impl Scoring {
  pub fn virality(&self, views: u64, likes: u64, comments: u64) -> f64 {
    views as f64 * self.view_weight + likes as f64 * self.like_weight + comments as f64 * self.comment_weight
  }
}

/// One analysed upload. Built once by the collector and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRecord {
  pub video_id: String,
  pub title: String,
  /// ISO 8601 instant exactly as the API returned it.
  pub published_at: String,
  pub views: u64,
  pub likes: u64,
  pub comments: u64,
  pub duration_secs: u64,
  pub classification: Classification,
  pub virality: f64,
  pub link: String,
}

/// Successful end of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
  /// Non-empty, ordered by descending virality.
  Ranked(Vec<VideoRecord>),
  /// The run worked but no video qualified.
  Empty,
}

impl RunOutcome {
  pub fn from_records(records: Vec<VideoRecord>) -> Self {
    if records.is_empty() { RunOutcome::Empty } else { RunOutcome::Ranked(records) }
  }
}
