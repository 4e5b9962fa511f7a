//! District Lookup Port
//!
//! Defines the interface for mapping coordinates to a health district.
//! The boundary geometry lives entirely behind this port.

use crate::domain::entities::District;
use crate::domain::value_objects::{DetectionSource, DistrictId, GeoPoint};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;

/// Raw answer from the lookup service.
///
/// Every field is optional: the payload is untrusted and a missing field
/// must never abort decoding on its own.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictLookupResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub coordinates: Option<GeoPoint>,
    #[serde(default)]
    pub full_address: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub used_fallback: Option<bool>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// A lookup answer that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLookup {
    pub district: District,
    /// The service matched approximately rather than precisely
    pub used_fallback: bool,
}

impl DistrictLookupResponse {
    /// Validate the payload and build an API-sourced district.
    ///
    /// Only `success == true` and a known district slug are mandatory.
    /// Missing display fields are derived from the slug; coordinates that
    /// are present but invalid reject the whole answer.
    pub fn resolve(self) -> Result<ResolvedLookup, LookupError> {
        if self.success != Some(true) {
            return Err(LookupError::Unsuccessful);
        }

        let slug = self
            .district
            .ok_or_else(|| LookupError::Malformed("missing district".to_string()))?;
        let id = DistrictId::parse(&slug)
            .ok_or_else(|| LookupError::Malformed(format!("unknown district '{}'", slug)))?;

        let coordinates = match self.coordinates {
            Some(point) => {
                point
                    .validate()
                    .map_err(|e| LookupError::Malformed(e.to_string()))?;
                point
            }
            None => id.centroid(),
        };

        let display_name = self
            .display_name
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| id.display_name().to_string());
        let full_address = self
            .full_address
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| format!("{}, KwaZulu-Natal, South Africa", display_name));

        Ok(ResolvedLookup {
            district: District {
                id,
                display_name,
                coordinates,
                full_address,
                detection_source: DetectionSource::Api,
                timestamp: Utc::now(),
                confidence: self.confidence.filter(|c| c.is_finite()),
                is_fallback: false,
            },
            used_fallback: self.used_fallback.unwrap_or(false),
        })
    }
}

/// Failures talking to the lookup service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("lookup transport failed: {0}")]
    Transport(String),
    #[error("lookup request timed out")]
    Timeout,
    #[error("lookup returned status {0}")]
    Status(u16),
    #[error("lookup returned a malformed payload: {0}")]
    Malformed(String),
    #[error("lookup reported no match")]
    Unsuccessful,
}

impl LookupError {
    /// Connectivity problems, as opposed to answers we could not use.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout | Self::Status(_))
    }
}

/// Maps a position to a health district.
#[async_trait]
pub trait DistrictLookup: Send + Sync {
    async fn lookup(&self, point: GeoPoint) -> Result<DistrictLookupResponse, LookupError>;
}
