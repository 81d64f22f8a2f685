use tracing::info;

use crate::collector::collect_videos;
use crate::error::AnalyzeError;
use crate::model::{ClassificationFilter, ResultCap, RunOutcome, Scoring};
use crate::resolver::resolve_channel;
use crate::youtube::YouTubeApi;

/// Resolve `reference`, collect its uploads and rank them.
///
/// Inputs are checked before any request goes out. An empty report is
/// `RunOutcome::Empty`, not an error.
pub async fn analyze<A: YouTubeApi>(
  api: &A,
  api_key: &str,
  reference: &str,
  filter: ClassificationFilter,
  cap: ResultCap,
  scoring: &Scoring,
) -> Result<RunOutcome, AnalyzeError> {
  let api_key = api_key.trim();
  let reference = reference.trim();
  if api_key.is_empty() {
    return Err(AnalyzeError::InvalidInput("an API key is required"));
  }
  if reference.is_empty() {
    return Err(AnalyzeError::InvalidInput("a channel reference is required"));
  }

  let channel = resolve_channel(api, api_key, reference).await?;
  info!(reference, channel = %channel, ?filter, ?cap, "analyze: channel resolved");

  let records = collect_videos(api, api_key, &channel, filter, cap, scoring).await?;
  Ok(RunOutcome::from_records(records))
}
