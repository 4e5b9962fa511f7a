//! MaxMind Geolocation
//!
//! Implements GeolocationProvider from a MaxMind GeoLite2-City database.
//! Positions are approximate: a city-level fix for the configured client IP.

use crate::domain::ports::{GeolocationError, GeolocationProvider, PositionOptions};
use crate::domain::value_objects::GeoPoint;
use async_trait::async_trait;
use maxminddb::Reader;
use serde::Deserialize;
use std::net::IpAddr;
use std::sync::Arc;

/// MaxMind-backed geolocation for server and CLI deployments.
pub struct MaxMindGeolocation {
    reader: Arc<Reader<Vec<u8>>>,
    client_ip: IpAddr,
}

impl MaxMindGeolocation {
    /// Load a City database from a file path.
    pub fn from_file(path: &str, client_ip: IpAddr) -> anyhow::Result<Self> {
        let reader = Reader::open_readfile(path)?;
        Ok(Self {
            reader: Arc::new(reader),
            client_ip,
        })
    }

    /// Load a City database from bytes already in memory.
    pub fn from_bytes(bytes: Vec<u8>, client_ip: IpAddr) -> anyhow::Result<Self> {
        let reader = Reader::from_source(bytes)?;
        Ok(Self {
            reader: Arc::new(reader),
            client_ip,
        })
    }

    /// Approximate position of an IP address, if the database knows it.
    pub fn locate(&self, ip: IpAddr) -> Option<GeoPoint> {
        #[derive(Debug, Deserialize)]
        struct Location {
            latitude: Option<f64>,
            longitude: Option<f64>,
        }

        #[derive(Debug, Deserialize)]
        struct CityResp {
            location: Option<Location>,
        }

        let resp: CityResp = self.reader.lookup(ip).ok()?;
        let location = resp.location?;

        GeoPoint::new(location.latitude?, location.longitude?).ok()
    }
}

#[async_trait]
impl GeolocationProvider for MaxMindGeolocation {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<GeoPoint, GeolocationError> {
        self.locate(self.client_ip).ok_or_else(|| {
            GeolocationError::PositionUnavailable(format!(
                "no location for {} in GeoIP database",
                self.client_ip
            ))
        })
    }
}
