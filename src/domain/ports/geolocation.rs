//! Geolocation Port
//!
//! Defines the interface for acquiring the user's current position.

use crate::domain::value_objects::GeoPoint;
use async_trait::async_trait;
use std::time::Duration;

/// Options passed to the platform when requesting a position.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionOptions {
    /// Ask for a GPS-grade fix instead of a coarse one
    pub high_accuracy: bool,
    /// Give up after this long
    pub timeout: Duration,
    /// Accept a cached fix up to this old
    pub max_cached_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: false,
            timeout: Duration::from_millis(10_000),
            max_cached_age: Duration::from_millis(300_000),
        }
    }
}

/// Failure codes reported by the geolocation capability.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("position unavailable: {0}")]
    PositionUnavailable(String),
    #[error("location request timed out")]
    Timeout,
}

/// Source of the user's current position.
///
/// This is an outbound port: in a browser it wraps `navigator.geolocation`,
/// on a server it may use a GeoIP database or a configured location.
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    /// Whether the platform offers geolocation at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Acquire the current position.
    async fn current_position(&self, options: &PositionOptions)
        -> Result<GeoPoint, GeolocationError>;
}
