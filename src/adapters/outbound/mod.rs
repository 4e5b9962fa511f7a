mod dashmap_preference_store;
mod fixed_geolocation;
mod http_district_lookup;
mod json_file_preference_store;
mod maxmind_geolocation;
mod tracing_notifier;

pub use dashmap_preference_store::DashMapPreferenceStore;
pub use fixed_geolocation::{FixedGeolocation, UnavailableGeolocation};
pub use http_district_lookup::{HttpDistrictLookup, HttpLookupConfig};
pub use json_file_preference_store::JsonFilePreferenceStore;
pub use maxmind_geolocation::MaxMindGeolocation;
pub use tracing_notifier::TracingNotifier;
