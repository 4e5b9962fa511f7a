//! FirstCare Geo Library
//!
//! Location and district resolution for the FirstCare healthcare directory:
//! great-circle distance, KwaZulu-Natal bounds checks and the district
//! resolver that turns a device position into one of the province's
//! districts.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;

// Re-export commonly used types
pub use application::{DistrictResolver, ResolverConfig, ResolverError, ResolverSnapshot};
pub use config::{load_config, Config};
pub use domain::entities::{District, FallbackReason, ManualDistrict, Notification, Severity};
pub use domain::ports::{
    DetectionNotifier, DistrictLookup, GeolocationProvider, PositionOptions, PreferenceStore,
};
pub use domain::services::{
    format_distance, haversine_distance_km, rank_by_distance, validate_coordinates,
};
pub use domain::value_objects::{BoundsCheck, DetectionSource, DistrictId, GeoError, GeoPoint};
