pub mod distance;

pub use distance::{
    format_distance, haversine_distance_km, initial_bearing_deg, rank_by_distance,
    validate_coordinates, within_radius, Ranked, EARTH_RADIUS_KM,
};
