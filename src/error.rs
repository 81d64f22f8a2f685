use thiserror::Error;

/// Failure talking to the Data API.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("request to {endpoint} failed: {source}")]
  Transport {
    endpoint: &'static str,
    #[source]
    source: reqwest::Error,
  },
  #[error("{endpoint} returned HTTP {status}: {message}")]
  Status { endpoint: &'static str, status: u16, message: String },
  #[error("malformed {endpoint} response: {source}")]
  Decode {
    endpoint: &'static str,
    #[source]
    source: serde_json::Error,
  },
}

#[derive(Debug, Error)]
pub enum ResolveError {
  #[error("no channel matches handle '{0}'")]
  NotFound(String),
  #[error(transparent)]
  Api(#[from] ApiError),
}

#[derive(Debug, Error)]
pub enum CollectError {
  #[error("channel {0} does not exist or has no uploads playlist")]
  ChannelNotFound(String),
  #[error(transparent)]
  Api(#[from] ApiError),
}

/// Every way an analysis run can fail. An empty report is not one of them.
#[derive(Debug, Error)]
pub enum AnalyzeError {
  #[error("invalid input: {0}")]
  InvalidInput(&'static str),
  #[error("could not resolve channel: {0}")]
  ResolutionFailed(ResolveError),
  #[error("channel not found: {0}")]
  ChannelNotFound(String),
  #[error("collection failed: {0}")]
  CollectionFailed(ApiError),
}

impl From<ResolveError> for AnalyzeError {
  fn from(err: ResolveError) -> Self {
    AnalyzeError::ResolutionFailed(err)
  }
}

impl From<CollectError> for AnalyzeError {
  fn from(err: CollectError) -> Self {
    match err {
      CollectError::ChannelNotFound(id) => AnalyzeError::ChannelNotFound(id),
      CollectError::Api(e) => AnalyzeError::CollectionFailed(e),
    }
  }
}
