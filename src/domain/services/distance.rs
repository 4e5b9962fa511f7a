//! Distance Service
//!
//! Great-circle distance, bearing and display formatting used to rank
//! and annotate facility search results. Pure: no I/O.

use crate::domain::value_objects::{BoundsCheck, GeoError, GeoPoint, KZN_BOUNDS};

/// Mean Earth radius used by the Haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

fn ensure_finite(point: &GeoPoint) -> Result<(), GeoError> {
    if point.is_finite() {
        Ok(())
    } else {
        Err(GeoError::InvalidCoordinate {
            lat: point.lat,
            lng: point.lng,
        })
    }
}

/// Haversine distance between two points in kilometers.
///
/// # Examples
/// ```
/// use firstcare_geo::{haversine_distance_km, GeoPoint};
///
/// let durban = GeoPoint { lat: -29.8587, lng: 31.0218 };
/// assert_eq!(haversine_distance_km(&durban, &durban).unwrap(), 0.0);
/// ```
pub fn haversine_distance_km(a: &GeoPoint, b: &GeoPoint) -> Result<f64, GeoError> {
    ensure_finite(a)?;
    ensure_finite(b)?;

    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1 for antipodal points
    let h = h.clamp(0.0, 1.0);

    Ok(2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt()))
}

/// Initial compass bearing from `a` towards `b`, in degrees [0, 360).
pub fn initial_bearing_deg(a: &GeoPoint, b: &GeoPoint) -> Result<f64, GeoError> {
    ensure_finite(a)?;
    ensure_finite(b)?;

    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let y = d_lng.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lng.cos();

    Ok((y.atan2(x).to_degrees() + 360.0) % 360.0)
}

/// Render a distance for display.
///
/// Below one kilometer the value is shown as whole meters ("847m"),
/// otherwise as kilometers with one decimal, rounded half-up ("1.9km").
pub fn format_distance(meters: f64) -> Result<String, GeoError> {
    if !meters.is_finite() || meters < 0.0 {
        return Err(GeoError::InvalidDistance(meters));
    }

    let rounded = meters.round();
    if rounded < 1000.0 {
        return Ok(format!("{}m", rounded as u64));
    }

    let tenths_of_km = (meters / 100.0).round();
    Ok(format!("{:.1}km", tenths_of_km / 10.0))
}

/// Validate a raw latitude/longitude pair.
///
/// Points outside KwaZulu-Natal are valid but logged as a warning.
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<BoundsCheck, GeoError> {
    let point = GeoPoint::new(lat, lng)?;

    if KZN_BOUNDS.contains(&point) {
        Ok(BoundsCheck::InsideKzn)
    } else {
        tracing::warn!(
            "coordinates {} are outside KwaZulu-Natal bounds, results may be inaccurate",
            point
        );
        Ok(BoundsCheck::OutsideKzn)
    }
}

/// True when `b` lies within `radius_km` of `a`.
pub fn within_radius(a: &GeoPoint, b: &GeoPoint, radius_km: f64) -> Result<bool, GeoError> {
    Ok(haversine_distance_km(a, b)? <= radius_km)
}

/// A candidate annotated with its distance from the search origin.
#[derive(Debug, Clone)]
pub struct Ranked<T> {
    pub item: T,
    pub distance_km: f64,
    /// Display label produced by [`format_distance`]
    pub label: String,
}

/// Sort candidates nearest-first.
///
/// `locate` extracts each candidate's position. An invalid origin is an
/// error; candidates whose position fails validation are dropped rather
/// than failing the whole ranking. Ties keep their input order.
pub fn rank_by_distance<T, I, F>(
    origin: &GeoPoint,
    items: I,
    locate: F,
) -> Result<Vec<Ranked<T>>, GeoError>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> GeoPoint,
{
    origin.validate()?;

    let mut ranked: Vec<Ranked<T>> = items
        .into_iter()
        .filter_map(|item| {
            let position = locate(&item);
            if let Err(e) = position.validate() {
                tracing::debug!("skipping candidate at {:?}: {}", position, e);
                return None;
            }
            let distance_km = haversine_distance_km(origin, &position).ok()?;
            let label = format_distance(distance_km * 1000.0).ok()?;
            Some(Ranked {
                item,
                distance_km,
                label,
            })
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    Ok(ranked)
}
