//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use serde::{Deserialize, Serialize};

/// Approximate bounding box of KwaZulu-Natal.
///
/// Advisory only: points outside it are still valid coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub west: f64,
    pub east: f64,
}

impl BoundingBox {
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.lat <= self.north
            && point.lat >= self.south
            && point.lng >= self.west
            && point.lng <= self.east
    }
}

pub const KZN_BOUNDS: BoundingBox = BoundingBox {
    north: -26.8,
    south: -31.5,
    west: 29.2,
    east: 32.9,
};

/// Validation errors for coordinates and distances.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeoError {
    #[error("coordinate is not a finite number: lat={lat}, lng={lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },
    #[error("latitude {0} is outside [-90, 90]")]
    OutOfRangeLatitude(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    OutOfRangeLongitude(f64),
    #[error("distance must be a non-negative finite number of meters, got {0}")]
    InvalidDistance(f64),
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Build a point, rejecting non-finite or out-of-range values.
    pub fn new(lat: f64, lng: f64) -> Result<Self, GeoError> {
        let point = Self { lat, lng };
        point.validate()?;
        Ok(point)
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Check the point against the WGS84 ranges.
    pub fn validate(&self) -> Result<(), GeoError> {
        if !self.is_finite() {
            return Err(GeoError::InvalidCoordinate {
                lat: self.lat,
                lng: self.lng,
            });
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(GeoError::OutOfRangeLatitude(self.lat));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(GeoError::OutOfRangeLongitude(self.lng));
        }
        Ok(())
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lng)
    }
}

/// KwaZulu-Natal public health district.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistrictId {
    Amajuba,
    Ethekwini,
    HarryGwala,
    Ilembe,
    KingCetshwayo,
    Ugu,
    Umgungundlovu,
    Umkhanyakude,
    Umzinyathi,
    Uthukela,
    Zululand,
}

impl DistrictId {
    pub const ALL: [DistrictId; 11] = [
        Self::Amajuba,
        Self::Ethekwini,
        Self::HarryGwala,
        Self::Ilembe,
        Self::KingCetshwayo,
        Self::Ugu,
        Self::Umgungundlovu,
        Self::Umkhanyakude,
        Self::Umzinyathi,
        Self::Uthukela,
        Self::Zululand,
    ];

    /// Parse a district slug. Case-insensitive; hyphens are accepted
    /// in place of underscores.
    ///
    /// # Examples
    /// ```
    /// use firstcare_geo::DistrictId;
    ///
    /// assert_eq!(DistrictId::parse("ethekwini"), Some(DistrictId::Ethekwini));
    /// assert_eq!(DistrictId::parse("King-Cetshwayo"), Some(DistrictId::KingCetshwayo));
    /// assert_eq!(DistrictId::parse("gauteng"), None);
    /// ```
    pub fn parse(slug: &str) -> Option<Self> {
        let normalized = slug.trim().to_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|d| d.as_str() == normalized)
    }

    /// Slug used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amajuba => "amajuba",
            Self::Ethekwini => "ethekwini",
            Self::HarryGwala => "harry_gwala",
            Self::Ilembe => "ilembe",
            Self::KingCetshwayo => "king_cetshwayo",
            Self::Ugu => "ugu",
            Self::Umgungundlovu => "umgungundlovu",
            Self::Umkhanyakude => "umkhanyakude",
            Self::Umzinyathi => "umzinyathi",
            Self::Uthukela => "uthukela",
            Self::Zululand => "zululand",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Amajuba => "Amajuba",
            Self::Ethekwini => "eThekwini",
            Self::HarryGwala => "Harry Gwala",
            Self::Ilembe => "iLembe",
            Self::KingCetshwayo => "King Cetshwayo",
            Self::Ugu => "Ugu",
            Self::Umgungundlovu => "uMgungundlovu",
            Self::Umkhanyakude => "uMkhanyakude",
            Self::Umzinyathi => "uMzinyathi",
            Self::Uthukela => "uThukela",
            Self::Zululand => "Zululand",
        }
    }

    /// Representative point for the district: its main town.
    pub fn centroid(&self) -> GeoPoint {
        let (lat, lng) = match self {
            Self::Amajuba => (-27.7580, 29.9318),       // Newcastle
            Self::Ethekwini => (-29.8587, 31.0218),     // Durban
            Self::HarryGwala => (-30.1544, 30.0594),    // Ixopo
            Self::Ilembe => (-29.3290, 31.2895),        // KwaDukuza
            Self::KingCetshwayo => (-28.7807, 32.0383), // Richards Bay
            Self::Ugu => (-30.7414, 30.4550),           // Port Shepstone
            Self::Umgungundlovu => (-29.6006, 30.3794), // Pietermaritzburg
            Self::Umkhanyakude => (-27.6167, 32.0333),  // Mkuze
            Self::Umzinyathi => (-28.1653, 30.2311),    // Dundee
            Self::Uthukela => (-28.5539, 29.7784),      // Ladysmith
            Self::Zululand => (-28.3352, 31.4162),      // Ulundi
        };
        GeoPoint { lat, lng }
    }
}

impl Default for DistrictId {
    /// eThekwini is the most populous district and the fallback choice.
    fn default() -> Self {
        Self::Ethekwini
    }
}

impl std::fmt::Display for DistrictId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a district record came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionSource {
    /// Resolved by the district lookup service
    Api,
    /// Fallback after a failed detection
    Default,
    /// Chosen explicitly by the user
    Manual,
}

impl DetectionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Default => "default",
            Self::Manual => "manual",
        }
    }
}

/// Result of checking a valid point against the province bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsCheck {
    InsideKzn,
    OutsideKzn,
}
