//! Feature service client

use crate::config::Config;
use crate::error::{BoundaryError, FetchOutcome};
use crate::models::{Feature, FeatureSet, LayerQuery};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Source of raw query response bodies.
///
/// Lets the query pipeline run against canned responses in tests.
pub trait FeatureSource: Send + Sync {
    /// GET the URL and return the response body
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, BoundaryError>> + Send;
}

/// HTTP source backed by reqwest
pub struct ReqwestSource {
    http_client: Client,
}

impl ReqwestSource {
    /// Create a source with the configured timeout and trust settings
    pub fn new(config: &Config) -> Result<Self, BoundaryError> {
        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs));

        if let Some(path) = &config.tls.root_certificate {
            let pem = std::fs::read(path).map_err(|e| {
                BoundaryError::Client(format!("cannot read {}: {}", path.display(), e))
            })?;
            let certificate = reqwest::Certificate::from_pem(&pem)
                .map_err(|e| BoundaryError::Client(e.to_string()))?;
            builder = builder.add_root_certificate(certificate);
        }

        if config.tls.accept_invalid_certs {
            warn!("TLS certificate verification is disabled for this client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http_client = builder
            .build()
            .map_err(|e| BoundaryError::Client(e.to_string()))?;

        Ok(Self { http_client })
    }
}

impl FeatureSource for ReqwestSource {
    async fn fetch(&self, url: &str) -> Result<String, BoundaryError> {
        let response = self
            .http_client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| request_error(url, e))?;

        if !response.status().is_success() {
            return Err(BoundaryError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(|e| request_error(url, e))
    }
}

fn request_error(url: &str, e: reqwest::Error) -> BoundaryError {
    if e.is_timeout() {
        BoundaryError::Timeout(url.to_string())
    } else {
        BoundaryError::Request(e.to_string())
    }
}

/// Client for the World Bank boundary feature services
pub struct BoundaryClient<S = ReqwestSource> {
    source: S,
    service_url: String,
    pub(crate) out_sr: u32,
}

impl BoundaryClient<ReqwestSource> {
    /// Create a client that talks HTTP to the configured service
    pub fn new(config: &Config) -> Result<Self, BoundaryError> {
        Ok(Self::with_source(ReqwestSource::new(config)?, config))
    }
}

impl<S: FeatureSource> BoundaryClient<S> {
    /// Create a client that reads responses from any source
    pub fn with_source(source: S, config: &Config) -> Self {
        Self {
            source,
            service_url: config.service_url.trim_end_matches('/').to_string(),
            out_sr: config.out_sr,
        }
    }

    /// Get the services root URL
    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    /// Run one layer query and return its features
    pub async fn query_layer(&self, query: &LayerQuery) -> Result<Vec<Feature>, BoundaryError> {
        let url = query.build_url(&self.service_url);
        debug!("GET {}", url);

        let body = self.source.fetch(&url).await?;
        let set: FeatureSet = serde_json::from_str(&body)?;

        if let Some(err) = set.error {
            let message = if err.details.is_empty() {
                err.message
            } else {
                format!("{} ({})", err.message, err.details.join("; "))
            };
            return Err(BoundaryError::Service {
                code: err.code,
                message,
            });
        }

        if set.exceeded_transfer_limit {
            warn!(
                "Result for {} was truncated by the service transfer limit",
                query.predicate
            );
        }

        Ok(set.into_features())
    }
}

/// Turn a pipeline result into an outcome, logging every non-success
pub(crate) fn settle<T>(
    result: Result<Option<T>, BoundaryError>,
    subject: &str,
) -> FetchOutcome<T> {
    match result {
        Ok(Some(value)) => FetchOutcome::Success(value),
        Ok(None) => {
            info!("No features found for {}", subject);
            FetchOutcome::NotFound
        }
        Err(BoundaryError::Timeout(url)) => {
            error!("Request timed out for {}", subject);
            FetchOutcome::failed(BoundaryError::Timeout(url))
        }
        Err(e) => {
            error!("Query for {} failed: {}", subject, e);
            FetchOutcome::failed(e)
        }
    }
}
