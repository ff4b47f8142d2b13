//! reqwest-backed documentation service client

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{ApiConfig, EndpointsConfig, VERSION_PLACEHOLDER};
use crate::documentation::api::DocumentationApi;
use crate::documentation::error::FetchError;
use crate::documentation::types::{
    VersionListResult, is_valid_version_id, parse_versions_response,
};

/// Error body returned by the service on non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Documentation service client over HTTP
pub struct HttpDocumentationApi {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
    endpoints: EndpointsConfig,
}

impl HttpDocumentationApi {
    /// Creates a client with default endpoints for the given base URL
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        Self::from_config(&ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("doc-versions/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| FetchError::Network(format!("failed to create HTTP client: {e}")))?;
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            FetchError::InvalidRequest(format!("invalid base URL {}: {e}", config.base_url))
        })?;

        Ok(Self {
            client,
            base_url,
            token: config.token.clone(),
            endpoints: config.endpoints.clone(),
        })
    }

    /// Build the URL of an endpoint, substituting `version` as one path segment
    fn url(&self, template: &str, version: Option<&str>) -> Result<Url, FetchError> {
        if let Some(version) = version
            && !is_valid_version_id(version)
        {
            return Err(FetchError::InvalidRequest(format!(
                "invalid version id: {version:?}"
            )));
        }

        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                FetchError::InvalidRequest(format!("base URL cannot have a path: {}", self.base_url))
            })?;
            segments.pop_if_empty();
            for segment in template.split('/').filter(|s| !s.is_empty()) {
                match version {
                    Some(v) if segment.contains(VERSION_PLACEHOLDER) => {
                        segments.push(&segment.replace(VERSION_PLACEHOLDER, v))
                    }
                    _ => segments.push(segment),
                };
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: &Url) -> RequestBuilder {
        let builder = self.client.request(method, url.clone());
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and turn non-2xx statuses into `FetchError::Server`
    async fn send(&self, builder: RequestBuilder, url: &Url) -> Result<Response, FetchError> {
        let response = builder.send().await.map_err(|e| {
            warn!("Request to {} failed: {}", url, e);
            FetchError::Network(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        warn!("Documentation service returned status {}: {}", status, url);
        let message = response
            .text()
            .await
            .ok()
            .and_then(|body| serde_json::from_str::<ErrorResponse>(&body).ok())
            .map(|body| body.error.message);

        Err(FetchError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait::async_trait]
impl DocumentationApi for HttpDocumentationApi {
    async fn fetch_versions(&self) -> Result<VersionListResult, FetchError> {
        let url = self.url(&self.endpoints.versions, None)?;
        debug!("Fetching documentation versions from {}", url);

        let response = self.send(self.request(Method::GET, &url), &url).await?;
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        parse_versions_response(&body).inspect_err(|e| {
            warn!("Failed to parse documentation versions response: {}", e);
        })
    }

    async fn regenerate(&self, version: &str) -> Result<(), FetchError> {
        let url = self.url(&self.endpoints.regenerate, Some(version))?;
        debug!("Regenerating documentation {} via {}", version, url);

        self.send(self.request(Method::POST, &url), &url).await?;
        Ok(())
    }

    async fn delete(&self, version: &str) -> Result<(), FetchError> {
        let url = self.url(&self.endpoints.delete, Some(version))?;
        debug!("Deleting documentation {} via {}", version, url);

        self.send(self.request(Method::DELETE, &url), &url).await?;
        Ok(())
    }
}
