use std::fmt;
use tracing::{debug, info};

use crate::constants::constants;
use crate::error::ResolveError;
use crate::youtube::YouTubeApi;

/// Canonical, API-native channel identifier (`UC...`). Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelId(String);

impl ChannelId {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for ChannelId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// What a user-supplied channel string turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelReference {
  /// Already an identifier; usable without a network call.
  Id(String),
  /// A handle (without the `@`) that needs a search lookup.
  Handle(String),
}

/// Ends a URL path segment.
fn segment(rest: &str) -> &str {
  rest.split(['/', '?', '#']).next().unwrap_or(rest)
}

/// Interpret a channel string without touching the network.
///
/// Precedence: raw `UC` id, `@handle`, `/channel/<id>` URL, `/@<handle>` URL,
/// and finally the input itself taken as an id.
pub fn parse_reference(input: &str) -> ChannelReference {
  let c = constants();
  let input = input.trim();

  if input.starts_with(c.channel_id_prefix.as_str()) {
    return ChannelReference::Id(input.to_string());
  }

  if let Some(handle) = input.strip_prefix(c.handle_marker.as_str()) {
    return ChannelReference::Handle(segment(handle).to_string());
  }

  if let Some((_, rest)) = input.split_once("/channel/") {
    let id = segment(rest);
    if !id.is_empty() {
      return ChannelReference::Id(id.to_string());
    }
  }

  let url_handle = format!("/{}", c.handle_marker);
  if let Some((_, rest)) = input.split_once(url_handle.as_str()) {
    return ChannelReference::Handle(segment(rest).to_string());
  }

  ChannelReference::Id(input.to_string())
}

/// Resolve `input` to a channel id, issuing at most one search call.
///
/// Handle lookups take the first search hit. Search is not an exact match, but
/// the handle lookup endpoint is not dependable enough to use instead.
pub async fn resolve_channel<A: YouTubeApi>(api: &A, key: &str, input: &str) -> Result<ChannelId, ResolveError> {
  match parse_reference(input) {
    ChannelReference::Id(id) => {
      debug!(channel = %id, "resolver: using identifier directly");
      Ok(ChannelId(id))
    }
    ChannelReference::Handle(handle) => {
      if handle.is_empty() {
        return Err(ResolveError::NotFound(handle));
      }
      info!(handle = %handle, "resolver: searching for handle");
      let found = api.search_channel(key, &handle).await?;
      let id = found.filter(|id| !id.is_empty()).ok_or(ResolveError::NotFound(handle))?;
      info!(channel = %id, "resolver: handle resolved");
      Ok(ChannelId(id))
    }
  }
}

#[cfg(test)]
impl ChannelId {
  pub fn new(id: &str) -> Self {
    ChannelId(id.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ApiError;
  use crate::youtube::testing::{Call, FakeApi};

  // --- parse_reference ---

  #[test]
  fn raw_identifier_is_kept() {
    assert_eq!(parse_reference("UC_x5XG1OV2P6uZZ5FSM9Ttw"), ChannelReference::Id("UC_x5XG1OV2P6uZZ5FSM9Ttw".into()));
    assert_eq!(parse_reference("  UC123  "), ChannelReference::Id("UC123".into()));
  }

  #[test]
  fn handle_drops_marker() {
    assert_eq!(parse_reference("@TwoSetViolin"), ChannelReference::Handle("TwoSetViolin".into()));
  }

  #[test]
  fn channel_url_extracts_identifier() {
    assert_eq!(parse_reference("https://www.youtube.com/channel/UC123/videos"), ChannelReference::Id("UC123".into()));
    assert_eq!(parse_reference("youtube.com/channel/UC456?view=0"), ChannelReference::Id("UC456".into()));
    assert_eq!(parse_reference("https://m.youtube.com/channel/UC789"), ChannelReference::Id("UC789".into()));
  }

  #[test]
  fn handle_url_extracts_handle() {
    assert_eq!(parse_reference("https://www.youtube.com/@somecreator"), ChannelReference::Handle("somecreator".into()));
    assert_eq!(
      parse_reference("https://youtube.com/@somecreator/shorts?si=abc"),
      ChannelReference::Handle("somecreator".into())
    );
  }

  #[test]
  fn unrecognised_input_falls_back_verbatim() {
    assert_eq!(parse_reference("HCabc"), ChannelReference::Id("HCabc".into()));
    assert_eq!(parse_reference("https://example.com/about"), ChannelReference::Id("https://example.com/about".into()));
  }

  // --- resolve_channel ---

  #[tokio::test]
  async fn identifier_needs_no_network() {
    let api = FakeApi::new();
    let id = resolve_channel(&api, "key", "UC123").await.unwrap();
    assert_eq!(id.as_str(), "UC123");
    assert!(api.calls().is_empty());
  }

  #[tokio::test]
  async fn channel_url_needs_no_network() {
    let api = FakeApi::new();
    let id = resolve_channel(&api, "key", "https://www.youtube.com/channel/UCabc").await.unwrap();
    assert_eq!(id.as_str(), "UCabc");
    assert!(api.calls().is_empty());
  }

  #[tokio::test]
  async fn handle_issues_one_search() {
    let api = FakeApi::new().with_search("creator", "UC999");
    let id = resolve_channel(&api, "key", "@creator").await.unwrap();
    assert_eq!(id.as_str(), "UC999");
    assert_eq!(api.calls(), vec![Call::Search("creator".into())]);
  }

  #[tokio::test]
  async fn handle_url_goes_through_search() {
    let api = FakeApi::new().with_search("creator", "UC999");
    let id = resolve_channel(&api, "key", "https://www.youtube.com/@creator/videos").await.unwrap();
    assert_eq!(id.as_str(), "UC999");
    assert_eq!(api.calls(), vec![Call::Search("creator".into())]);
  }

  #[tokio::test]
  async fn empty_search_is_not_found() {
    let api = FakeApi::new();
    let err = resolve_channel(&api, "key", "@ghost").await.unwrap_err();
    assert!(matches!(err, ResolveError::NotFound(ref h) if h == "ghost"));
    assert_eq!(api.calls().len(), 1);
  }

  #[tokio::test]
  async fn bare_marker_is_not_found_without_search() {
    let api = FakeApi::new();
    let err = resolve_channel(&api, "key", "@").await.unwrap_err();
    assert!(matches!(err, ResolveError::NotFound(_)));
    assert!(api.calls().is_empty());
  }

  #[tokio::test]
  async fn search_failure_propagates() {
    let api = FakeApi::new().failing_on("search");
    let err = resolve_channel(&api, "key", "@creator").await.unwrap_err();
    assert!(matches!(err, ResolveError::Api(ApiError::Status { status: 500, .. })));
  }
}
