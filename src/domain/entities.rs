//! Domain Entities - Core business objects
//!
//! These entities represent the core concepts of district resolution.
//! They have no external dependencies beyond serialization and time.

use crate::domain::value_objects::{DetectionSource, DistrictId, GeoPoint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A resolved health district for the current user.
///
/// `coordinates` is the district centroid for API and manual records, but
/// a fallback record carries the user's raw position when one was acquired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct District {
    pub id: DistrictId,
    pub display_name: String,
    pub coordinates: GeoPoint,
    pub full_address: String,
    pub detection_source: DetectionSource,
    /// RFC 3339 timestamp of when the record was produced
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub is_fallback: bool,
}

impl District {
    /// Default district used whenever detection cannot complete.
    ///
    /// When `raw` is given it replaces the Durban centroid so callers still
    /// get the best position known.
    pub fn fallback(raw: Option<GeoPoint>) -> Self {
        let id = DistrictId::default();
        Self {
            id,
            display_name: id.display_name().to_string(),
            coordinates: raw.unwrap_or_else(|| id.centroid()),
            full_address: format!("{}, KwaZulu-Natal, South Africa", id.display_name()),
            detection_source: DetectionSource::Default,
            timestamp: Utc::now(),
            confidence: None,
            is_fallback: true,
        }
    }
}

/// Caller-supplied district selection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualDistrict {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub coordinates: Option<GeoPoint>,
    #[serde(default)]
    pub full_address: Option<String>,
}

impl ManualDistrict {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            ..Default::default()
        }
    }
}

/// Why a detection ended on the default district.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    PermissionDenied,
    Timeout,
    PositionUnavailable,
    Network,
    LookupRejected,
}

impl FallbackReason {
    /// Message shown to the user alongside the default district.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::PermissionDenied => {
                "Location access denied. Please enable location permissions in your browser settings to find nearby facilities. Using eThekwini as the default district."
            }
            Self::Timeout => {
                "Location request timed out. Please try again. Using eThekwini as the default district."
            }
            Self::Network => {
                "Unable to reach the location service. Please check your internet connection. Using eThekwini as the default district."
            }
            Self::PositionUnavailable | Self::LookupRejected => {
                "Could not determine your district. Using eThekwini as the default district."
            }
        }
    }
}

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// Progress and outcome notices emitted during detection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    Detecting,
    Detected { district: DistrictId, display_name: String },
    Approximate { district: DistrictId, display_name: String },
    Fallback { reason: FallbackReason },
}

impl Notification {
    pub fn severity(&self) -> Severity {
        match self {
            Self::Detecting | Self::Approximate { .. } => Severity::Info,
            Self::Detected { .. } => Severity::Success,
            Self::Fallback {
                reason: FallbackReason::PermissionDenied,
            } => Severity::Error,
            Self::Fallback { .. } => Severity::Warning,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Detecting => "Detecting your location...".to_string(),
            Self::Detected { display_name, .. } => {
                format!("Location detected: {}", display_name)
            }
            Self::Approximate { display_name, .. } => {
                format!("Using approximate location: {}", display_name)
            }
            Self::Fallback { reason } => reason.user_message().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== District Tests =====

    #[test]
    fn test_fallback_without_raw_uses_durban() {
        let d = District::fallback(None);
        assert_eq!(d.id, DistrictId::Ethekwini);
        assert_eq!(d.display_name, "eThekwini");
        assert_eq!(d.coordinates, DistrictId::Ethekwini.centroid());
        assert_eq!(d.detection_source, DetectionSource::Default);
        assert!(d.is_fallback);
        assert!(d.confidence.is_none());
    }

    #[test]
    fn test_fallback_with_raw_keeps_raw() {
        let raw = GeoPoint { lat: -28.5, lng: 29.9 };
        let d = District::fallback(Some(raw));
        assert_eq!(d.id, DistrictId::Ethekwini);
        assert_eq!(d.coordinates, raw);
    }

    #[test]
    fn test_district_serializes_camel_case() {
        let d = District::fallback(None);
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["id"], "ethekwini");
        assert_eq!(json["displayName"], "eThekwini");
        assert_eq!(json["detectionSource"], "default");
        assert_eq!(json["isFallback"], true);
        assert!(json.get("confidence").is_none());
        // chrono serializes RFC 3339
        let ts = json["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(ts).is_ok());
    }

    // ===== ManualDistrict Tests =====

    #[test]
    fn test_manual_district_deserialize_partial() {
        let m: ManualDistrict =
            serde_json::from_str(r#"{"id": "ugu", "displayName": "Ugu"}"#).unwrap();
        assert_eq!(m.id, "ugu");
        assert_eq!(m.display_name, "Ugu");
        assert!(m.coordinates.is_none());

        let empty: ManualDistrict = serde_json::from_str("{}").unwrap();
        assert!(empty.id.is_empty());
    }

    // ===== Notification Tests =====

    #[test]
    fn test_notification_severity() {
        assert_eq!(Notification::Detecting.severity(), Severity::Info);
        assert_eq!(
            Notification::Detected {
                district: DistrictId::Ugu,
                display_name: "Ugu".into()
            }
            .severity(),
            Severity::Success
        );
        assert_eq!(
            Notification::Fallback {
                reason: FallbackReason::PermissionDenied
            }
            .severity(),
            Severity::Error
        );
        assert_eq!(
            Notification::Fallback {
                reason: FallbackReason::Timeout
            }
            .severity(),
            Severity::Warning
        );
    }

    #[test]
    fn test_notification_messages() {
        let approx = Notification::Approximate {
            district: DistrictId::Ilembe,
            display_name: "iLembe".into(),
        };
        assert_eq!(approx.message(), "Using approximate location: iLembe");

        let denied = Notification::Fallback {
            reason: FallbackReason::PermissionDenied,
        };
        assert!(denied.message().contains("enable location"));

        let timeout = Notification::Fallback {
            reason: FallbackReason::Timeout,
        };
        assert!(timeout.message().contains("try again"));

        let network = Notification::Fallback {
            reason: FallbackReason::Network,
        };
        assert!(network.message().contains("internet connection"));
    }
}
