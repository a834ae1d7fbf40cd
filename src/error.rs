//! Error and outcome types for boundary queries

use thiserror::Error;

/// Everything that can go wrong between building a query and shaping its table
#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error("request timed out for {0}")]
    Timeout(String),

    #[error("request error: {0}")]
    Request(String),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("service error {code}: {message}")]
    Service { code: i64, message: String },

    #[error("failed to parse response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid ring {index}: {reason}")]
    InvalidRing { index: usize, reason: String },

    #[error("feature has no rings")]
    MissingGeometry,

    #[error("failed to create HTTP client: {0}")]
    Client(String),
}

impl BoundaryError {
    /// True for failures on the way to or from the service
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_)
                | Self::Request(_)
                | Self::Status { .. }
                | Self::Service { .. }
                | Self::Client(_)
        )
    }
}

/// Result of one boundary query
#[derive(Debug)]
pub enum FetchOutcome<T> {
    Success(T),
    /// The query matched zero features
    NotFound,
    NetworkFailure(BoundaryError),
    ParseFailure(BoundaryError),
}

impl<T> FetchOutcome<T> {
    /// Sort a pipeline error into its failure class
    pub fn failed(err: BoundaryError) -> Self {
        if err.is_network() {
            Self::NetworkFailure(err)
        } else {
            Self::ParseFailure(err)
        }
    }

    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchOutcome<U> {
        match self {
            Self::Success(value) => FetchOutcome::Success(f(value)),
            Self::NotFound => FetchOutcome::NotFound,
            Self::NetworkFailure(e) => FetchOutcome::NetworkFailure(e),
            Self::ParseFailure(e) => FetchOutcome::ParseFailure(e),
        }
    }
}
