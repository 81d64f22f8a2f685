use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::constants::constants;
use crate::error::CollectError;
use crate::model::{Classification, ClassificationFilter, ResultCap, Scoring, VideoRecord};
use crate::resolver::ChannelId;
use crate::youtube::{VideoStats, YouTubeApi};

/// Seconds in an ISO 8601 duration such as `PT1H2M3S` or `P1DT5M`.
///
/// Anything that does not parse is zero. Years, months and weeks are not used
/// by the API for video lengths and are rejected.
pub fn duration_seconds(iso: &str) -> u64 {
  parse_duration(iso.trim()).unwrap_or(0)
}

fn parse_duration(iso: &str) -> Option<u64> {
  let body = iso.strip_prefix('P')?;
  let mut total: u64 = 0;
  let mut number = String::new();
  let mut in_time = false;

  for ch in body.chars() {
    match ch {
      '0'..='9' => number.push(ch),
      'T' if !in_time && number.is_empty() => in_time = true,
      'D' | 'H' | 'M' | 'S' => {
        let value: u64 = number.parse().ok()?;
        number.clear();
        let unit = match (ch, in_time) {
          ('D', false) => 86_400,
          ('H', true) => 3_600,
          ('M', true) => 60,
          ('S', true) => 1,
          _ => return None,
        };
        total = total.checked_add(value.checked_mul(unit)?)?;
      }
      _ => return None,
    }
  }

  number.is_empty().then_some(total)
}

/// Build the record for one video.
pub fn build_record(stats: VideoStats, scoring: &Scoring) -> VideoRecord {
  let duration_secs = duration_seconds(&stats.duration);
  let classification = Classification::from_duration(duration_secs, scoring.short_form_threshold_secs);
  let virality = scoring.virality(stats.views, stats.likes, stats.comments);
  let link = format!("{}{}", constants().link_prefix, stats.video_id);
  VideoRecord {
    video_id: stats.video_id,
    title: stats.title,
    published_at: stats.published_at,
    views: stats.views,
    likes: stats.likes,
    comments: stats.comments,
    duration_secs,
    classification,
    virality,
    link,
  }
}

/// Sort by descending virality. Ties keep their discovery order.
pub fn rank(records: &mut [VideoRecord]) {
  records.sort_by(|a, b| b.virality.total_cmp(&a.virality));
}

/// Walk the uploads playlist page by page until it ends or `cap` ids are in hand.
async fn collect_video_ids<A: YouTubeApi>(
  api: &A,
  key: &str,
  uploads: &str,
  cap: ResultCap,
) -> Result<Vec<String>, CollectError> {
  let page_size = constants().page_size;
  let mut seen = HashSet::new();
  let mut ids = Vec::new();
  let mut page_token: Option<String> = None;
  let mut pages = 0usize;

  loop {
    let page = api.uploads_page(key, uploads, page_token.as_deref(), page_size).await?;
    pages += 1;
    let fetched = page.video_ids.len();
    for id in page.video_ids {
      if seen.insert(id.clone()) {
        ids.push(id);
      }
    }
    debug!(page = pages, fetched, total = ids.len(), "collector: uploads page");

    if cap.is_reached(ids.len()) {
      break;
    }
    match page.next_page_token {
      Some(token) => page_token = Some(token),
      None => break,
    }
  }

  if let ResultCap::AtMost(n) = cap {
    ids.truncate(n);
  }
  info!(pages, videos = ids.len(), "collector: uploads listed");
  Ok(ids)
}

/// Collect, score and rank a channel's uploads.
///
/// Any API failure aborts the run; videos already gathered are discarded.
/// The returned list is empty when nothing survives the filter.
pub async fn collect_videos<A: YouTubeApi>(
  api: &A,
  key: &str,
  channel: &ChannelId,
  filter: ClassificationFilter,
  cap: ResultCap,
  scoring: &Scoring,
) -> Result<Vec<VideoRecord>, CollectError> {
  let uploads = api
    .channel_uploads(key, channel.as_str())
    .await?
    .filter(|u| !u.is_empty())
    .ok_or_else(|| CollectError::ChannelNotFound(channel.to_string()))?;
  info!(channel = %channel, uploads = %uploads, "collector: found uploads playlist");

  let ids = collect_video_ids(api, key, &uploads, cap).await?;

  let mut records = Vec::with_capacity(ids.len());
  for batch in ids.chunks(constants().stats_batch_size) {
    let mut stats = api.video_stats(key, batch).await?;
    if stats.len() < batch.len() {
      warn!(requested = batch.len(), returned = stats.len(), "collector: videos missing from statistics, dropping");
    }
    // Keep playlist order regardless of the order the API answers in.
    for id in batch {
      let Some(pos) = stats.iter().position(|s| &s.video_id == id) else { continue };
      let record = build_record(stats.swap_remove(pos), scoring);
      if filter.accepts(record.classification) {
        records.push(record);
      }
    }
  }

  rank(&mut records);
  info!(channel = %channel, qualifying = records.len(), "collector: done");
  Ok(records)
}
