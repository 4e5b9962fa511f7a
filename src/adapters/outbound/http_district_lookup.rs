//! HTTP District Lookup
//!
//! Implements DistrictLookup against the backend's
//! `GET /district-lookup?lat=..&lng=..` endpoint.

use crate::domain::ports::{DistrictLookup, DistrictLookupResponse, LookupError};
use crate::domain::value_objects::GeoPoint;
use async_trait::async_trait;
use std::time::Duration;

/// Configuration for the lookup client.
#[derive(Debug, Clone)]
pub struct HttpLookupConfig {
    /// Base URL of the backend API (e.g., "http://localhost:5000/api")
    pub base_url: String,
    /// Per-request timeout; a single attempt is made
    pub timeout: Duration,
}

impl Default for HttpLookupConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// reqwest-backed district lookup.
pub struct HttpDistrictLookup {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpDistrictLookup {
    pub fn new(config: HttpLookupConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/district-lookup", config.base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DistrictLookup for HttpDistrictLookup {
    async fn lookup(&self, point: GeoPoint) -> Result<DistrictLookupResponse, LookupError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("lat", point.lat), ("lng", point.lng)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LookupError::Timeout
                } else {
                    LookupError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("district lookup failed for {}: status {}", point, status);
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                LookupError::Timeout
            } else {
                LookupError::Transport(e.to_string())
            }
        })?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("district lookup returned malformed body: {}", e);
            LookupError::Malformed(e.to_string())
        })
    }
}
