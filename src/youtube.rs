use reqwest::Client;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use std::future::Future;
use tracing::debug;

use crate::constants::constants;
use crate::error::ApiError;

const CHANNELS: &str = "channels";
const SEARCH: &str = "search";
const PLAYLIST_ITEMS: &str = "playlistItems";
const VIDEOS: &str = "videos";

/// One page of a channel's uploads playlist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadsPage {
  pub video_ids: Vec<String>,
  pub next_page_token: Option<String>,
}

/// Per-video fields merged from `snippet`, `statistics` and `contentDetails`.
/// Missing fields come through as empty strings or zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoStats {
  pub video_id: String,
  pub title: String,
  pub published_at: String,
  /// Raw ISO 8601 duration, e.g. `PT4M13S`.
  pub duration: String,
  pub views: u64,
  pub likes: u64,
  pub comments: u64,
}

/// The four Data API v3 endpoints the analyzer needs.
///
/// Every call carries the caller's key. Implementations do not retry.
pub trait YouTubeApi {
  /// Uploads playlist id of `channel_id`, or `None` when no such channel exists.
  fn channel_uploads(&self, key: &str, channel_id: &str)
  -> impl Future<Output = Result<Option<String>, ApiError>> + Send;

  /// Channel id of the first search hit for `query`.
  fn search_channel(&self, key: &str, query: &str) -> impl Future<Output = Result<Option<String>, ApiError>> + Send;

  fn uploads_page(
    &self,
    key: &str,
    playlist_id: &str,
    page_token: Option<&str>,
    page_size: usize,
  ) -> impl Future<Output = Result<UploadsPage, ApiError>> + Send;

  /// Statistics for up to one batch of ids. Ids the API no longer knows are simply absent.
  fn video_stats(&self, key: &str, video_ids: &[String]) -> impl Future<Output = Result<Vec<VideoStats>, ApiError>> + Send;
}

// --- Wire types ---

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
  #[serde(default = "Vec::new")]
  items: Vec<T>,
  #[serde(default, rename = "nextPageToken")]
  next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ChannelItem {
  content_details: ChannelContentDetails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ChannelContentDetails {
  related_playlists: RelatedPlaylists,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RelatedPlaylists {
  uploads: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchItem {
  id: SearchId,
  snippet: SearchSnippet,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SearchId {
  channel_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SearchSnippet {
  channel_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PlaylistItem {
  content_details: PlaylistItemContentDetails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PlaylistItemContentDetails {
  video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct VideoItem {
  id: String,
  snippet: VideoSnippet,
  statistics: VideoStatistics,
  content_details: VideoContentDetails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct VideoSnippet {
  title: String,
  published_at: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct VideoStatistics {
  #[serde(deserialize_with = "lenient_count")]
  view_count: u64,
  #[serde(deserialize_with = "lenient_count")]
  like_count: u64,
  #[serde(deserialize_with = "lenient_count")]
  comment_count: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VideoContentDetails {
  duration: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorEnvelope {
  error: ErrorBody,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
  message: String,
}

/// Counts arrive as decimal strings (`"1234"`). Anything unreadable counts as zero.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
  let value = Option::<serde_json::Value>::deserialize(deserializer)?;
  Ok(match value {
    Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0),
    Some(serde_json::Value::Number(n)) => n.as_u64().unwrap_or(0),
    _ => 0,
  })
}

impl From<VideoItem> for VideoStats {
  fn from(item: VideoItem) -> Self {
    VideoStats {
      video_id: item.id,
      title: item.snippet.title,
      published_at: item.snippet.published_at,
      duration: item.content_details.duration,
      views: item.statistics.view_count,
      likes: item.statistics.like_count,
      comments: item.statistics.comment_count,
    }
  }
}

// --- HTTP client ---

/// `YouTubeApi` over HTTPS with reqwest.
#[derive(Debug, Clone)]
pub struct HttpApi {
  client: Client,
  base_url: String,
}

impl HttpApi {
  pub fn new() -> Self {
    Self::with_base_url(&constants().api_base_url)
  }

  pub fn with_base_url(base_url: &str) -> Self {
    let client = Client::builder()
      .user_agent(concat!("ytviral/", env!("CARGO_PKG_VERSION")))
      .build()
      .unwrap_or_default();
    Self { client, base_url: base_url.trim_end_matches('/').to_string() }
  }

  async fn get_json<T: DeserializeOwned>(
    &self,
    endpoint: &'static str,
    key: &str,
    params: &[(&str, &str)],
  ) -> Result<T, ApiError> {
    let url = format!("{}/{}", self.base_url, endpoint);
    debug!(endpoint, ?params, "youtube: GET");

    let response = self
      .client
      .get(&url)
      .query(params)
      .query(&[("key", key)])
      .send()
      .await
      .map_err(|e| ApiError::Transport { endpoint, source: e.without_url() })?;

    let status = response.status();
    let body = response.text().await.map_err(|e| ApiError::Transport { endpoint, source: e.without_url() })?;

    if !status.is_success() {
      let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .ok()
        .map(|e| e.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
      return Err(ApiError::Status { endpoint, status: status.as_u16(), message });
    }

    serde_json::from_str(&body).map_err(|source| ApiError::Decode { endpoint, source })
  }
}

impl Default for HttpApi {
  fn default() -> Self {
    Self::new()
  }
}

impl YouTubeApi for HttpApi {
  async fn channel_uploads(&self, key: &str, channel_id: &str) -> Result<Option<String>, ApiError> {
    let resp: ListResponse<ChannelItem> =
      self.get_json(CHANNELS, key, &[("part", "contentDetails"), ("id", channel_id)]).await?;
    Ok(resp.items.into_iter().next().and_then(|c| c.content_details.related_playlists.uploads))
  }

  async fn search_channel(&self, key: &str, query: &str) -> Result<Option<String>, ApiError> {
    let resp: ListResponse<SearchItem> = self
      .get_json(SEARCH, key, &[("part", "snippet"), ("type", "channel"), ("maxResults", "1"), ("q", query)])
      .await?;
    Ok(resp.items.into_iter().next().and_then(|item| item.snippet.channel_id.or(item.id.channel_id)))
  }

  async fn uploads_page(
    &self,
    key: &str,
    playlist_id: &str,
    page_token: Option<&str>,
    page_size: usize,
  ) -> Result<UploadsPage, ApiError> {
    let max_results = page_size.to_string();
    let mut params = vec![("part", "contentDetails"), ("playlistId", playlist_id), ("maxResults", max_results.as_str())];
    if let Some(token) = page_token {
      params.push(("pageToken", token));
    }
    let resp: ListResponse<PlaylistItem> = self.get_json(PLAYLIST_ITEMS, key, &params).await?;
    Ok(UploadsPage {
      video_ids: resp.items.into_iter().filter_map(|item| item.content_details.video_id).collect(),
      next_page_token: resp.next_page_token.filter(|t| !t.is_empty()),
    })
  }

  async fn video_stats(&self, key: &str, video_ids: &[String]) -> Result<Vec<VideoStats>, ApiError> {
    if video_ids.is_empty() {
      return Ok(Vec::new());
    }
    let ids = video_ids.join(",");
    let resp: ListResponse<VideoItem> =
      self.get_json(VIDEOS, key, &[("part", "snippet,statistics,contentDetails"), ("id", ids.as_str())]).await?;
    Ok(resp.items.into_iter().filter(|item| !item.id.is_empty()).map(VideoStats::from).collect())
  }
}

// --- Test double ---
