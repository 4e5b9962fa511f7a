mod detection_notifier;
mod district_lookup;
mod geolocation;
mod preference_store;

pub use detection_notifier::DetectionNotifier;
pub use district_lookup::{DistrictLookup, DistrictLookupResponse, LookupError, ResolvedLookup};
pub use geolocation::{GeolocationError, GeolocationProvider, PositionOptions};
pub use preference_store::{PreferenceStore, StoreError, PERMISSION_DENIED_KEY};
