//! Fixed Geolocation
//!
//! GeolocationProvider implementations that do not talk to any device:
//! a configured position (or configured failure) and an absent capability.

use crate::domain::ports::{GeolocationError, GeolocationProvider, PositionOptions};
use crate::domain::value_objects::GeoPoint;
use async_trait::async_trait;

/// Always answers with the same outcome.
#[derive(Debug, Clone)]
pub struct FixedGeolocation {
    outcome: Result<GeoPoint, GeolocationError>,
}

impl FixedGeolocation {
    pub fn at(point: GeoPoint) -> Self {
        Self { outcome: Ok(point) }
    }

    pub fn failing(error: GeolocationError) -> Self {
        Self {
            outcome: Err(error),
        }
    }
}

#[async_trait]
impl GeolocationProvider for FixedGeolocation {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<GeoPoint, GeolocationError> {
        self.outcome.clone()
    }
}

/// Platform without any geolocation capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableGeolocation;

#[async_trait]
impl GeolocationProvider for UnavailableGeolocation {
    fn is_available(&self) -> bool {
        false
    }

    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<GeoPoint, GeolocationError> {
        Err(GeolocationError::PositionUnavailable(
            "geolocation is not supported on this platform".to_string(),
        ))
    }
}
