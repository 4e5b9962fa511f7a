//! District Resolver - Main application use case
//!
//! Resolves "which KZN health district is the user in" by chaining the
//! geolocation port and the district lookup port. Results are cached and
//! throttled, concurrent callers share one detection, and every failure
//! degrades to the default district plus a user-facing notice.

use crate::domain::entities::{District, FallbackReason, ManualDistrict, Notification};
use crate::domain::ports::{
    DetectionNotifier, DistrictLookup, GeolocationError, GeolocationProvider, LookupError,
    PositionOptions, PreferenceStore, PERMISSION_DENIED_KEY,
};
use crate::domain::value_objects::{DetectionSource, DistrictId, GeoPoint};
use chrono::Utc;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Tuning knobs for the resolver.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// A completed detection is reused for this long
    pub throttle: Duration,
    /// Passed to the geolocation port; its timeout is also enforced here
    pub position_options: PositionOptions,
    /// Upper bound on a single district lookup
    pub lookup_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            throttle: Duration::from_secs(60),
            position_options: PositionOptions::default(),
            lookup_timeout: Duration::from_secs(10),
        }
    }
}

/// Errors surfaced to callers. Environmental failures never appear here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolverError {
    #[error("invalid manual district: {0}")]
    ManualDistrictInvalid(String),
}

/// Read-only view of the resolver for the UI layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverSnapshot {
    pub district: Option<District>,
    pub is_detecting: bool,
}

#[derive(Debug, Default)]
struct ResolverState {
    district: Option<District>,
    last_detection: Option<Instant>,
    is_detecting: bool,
}

/// Why a detection ended before reaching a district.
enum DetectionFailure {
    Geolocation(GeolocationError),
    Lookup { error: LookupError, raw: GeoPoint },
}

impl DetectionFailure {
    fn reason(&self) -> FallbackReason {
        match self {
            Self::Geolocation(GeolocationError::PermissionDenied) => {
                FallbackReason::PermissionDenied
            }
            Self::Geolocation(GeolocationError::Timeout) => FallbackReason::Timeout,
            Self::Geolocation(GeolocationError::PositionUnavailable(_)) => {
                FallbackReason::PositionUnavailable
            }
            Self::Lookup { error, .. } if error.is_network() => FallbackReason::Network,
            Self::Lookup { .. } => FallbackReason::LookupRejected,
        }
    }

    fn raw_position(&self) -> Option<GeoPoint> {
        match self {
            Self::Geolocation(_) => None,
            Self::Lookup { raw, .. } => Some(*raw),
        }
    }
}

impl std::fmt::Display for DetectionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Geolocation(e) => write!(f, "{}", e),
            Self::Lookup { error, raw } => write!(f, "{} (position {})", error, raw),
        }
    }
}

/// Marks a detection as running for as long as it is alive.
///
/// Dropping the detection future mid-flight (client disconnect, task abort)
/// still clears the flag.
struct DetectingGuard<'a> {
    state: &'a Mutex<ResolverState>,
}

impl<'a> DetectingGuard<'a> {
    fn enter(state: &'a Mutex<ResolverState>, mark: bool) -> Self {
        if mark {
            state.lock().is_detecting = true;
        }
        Self { state }
    }
}

impl Drop for DetectingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        if state.is_detecting {
            tracing::debug!("district detection ended before completing");
            state.is_detecting = false;
        }
    }
}

/// District resolver - one instance per UI session.
pub struct DistrictResolver {
    geolocation: Arc<dyn GeolocationProvider>,
    lookup: Arc<dyn DistrictLookup>,
    store: Arc<dyn PreferenceStore>,
    notifier: Arc<dyn DetectionNotifier>,
    config: ResolverConfig,
    state: Mutex<ResolverState>,
    /// Held for the whole detection; keeps the last result for joiners
    in_flight: tokio::sync::Mutex<Option<District>>,
    /// Number of detections that ran to completion
    completed: AtomicU64,
    auto_triggered: AtomicBool,
    disposed: AtomicBool,
}

impl DistrictResolver {
    /// Create a new resolver.
    pub fn new(
        geolocation: Arc<dyn GeolocationProvider>,
        lookup: Arc<dyn DistrictLookup>,
        store: Arc<dyn PreferenceStore>,
        notifier: Arc<dyn DetectionNotifier>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            geolocation,
            lookup,
            store,
            notifier,
            config,
            state: Mutex::new(ResolverState::default()),
            in_flight: tokio::sync::Mutex::new(None),
            completed: AtomicU64::new(0),
            auto_triggered: AtomicBool::new(false),
            disposed: AtomicBool::new(false),
        }
    }

    /// Current district, if any.
    pub fn district(&self) -> Option<District> {
        self.state.lock().district.clone()
    }

    /// Whether a detection is running.
    pub fn is_detecting(&self) -> bool {
        self.state.lock().is_detecting
    }

    pub fn snapshot(&self) -> ResolverSnapshot {
        let state = self.state.lock();
        ResolverSnapshot {
            district: state.district.clone(),
            is_detecting: state.is_detecting,
        }
    }

    /// Detect the user's district.
    ///
    /// Always yields a district: on any environmental failure the default
    /// district is returned and the user is notified. A detection that
    /// completed within the throttle window is returned without I/O, and
    /// callers arriving while a detection runs receive its result.
    pub async fn detect(&self) -> District {
        let seen = {
            let state = self.state.lock();
            if let Some(cached) = self.cached(&state) {
                tracing::debug!("district detection throttled, reusing {}", cached.id);
                return cached;
            }
            self.completed.load(Ordering::SeqCst)
        };

        let mut last = self.in_flight.lock().await;
        if self.completed.load(Ordering::SeqCst) != seen {
            if let Some(district) = last.as_ref() {
                tracing::debug!("joined in-flight detection for {}", district.id);
                return district.clone();
            }
        }

        let district = self.run_detection().await;

        *last = Some(district.clone());
        self.completed.fetch_add(1, Ordering::SeqCst);
        district
    }

    /// Detect once on first use, unless the user has refused location
    /// access before or a district is already known.
    ///
    /// Returns `None` when nothing was attempted.
    pub async fn auto_detect(&self) -> Option<District> {
        if self.auto_triggered.swap(true, Ordering::SeqCst) {
            return None;
        }
        if !self.geolocation.is_available() {
            tracing::debug!("geolocation unavailable, skipping automatic detection");
            return None;
        }
        if self.district().is_some() {
            return None;
        }
        if self.store.flag(PERMISSION_DENIED_KEY) {
            tracing::info!("location permission previously denied, skipping automatic detection");
            return None;
        }

        Some(self.detect().await)
    }

    /// Replace the current district with an explicit user choice.
    pub fn set_district_manual(&self, data: ManualDistrict) -> Result<District, ResolverError> {
        let slug = data.id.trim();
        if slug.is_empty() {
            return Err(ResolverError::ManualDistrictInvalid(
                "id is required".to_string(),
            ));
        }
        let display_name = data.display_name.trim();
        if display_name.is_empty() {
            return Err(ResolverError::ManualDistrictInvalid(
                "displayName is required".to_string(),
            ));
        }
        let id = DistrictId::parse(slug).ok_or_else(|| {
            ResolverError::ManualDistrictInvalid(format!("unknown district '{}'", slug))
        })?;

        let coordinates = match data.coordinates {
            Some(point) => {
                point
                    .validate()
                    .map_err(|e| ResolverError::ManualDistrictInvalid(e.to_string()))?;
                point
            }
            None => id.centroid(),
        };

        let district = District {
            id,
            display_name: display_name.to_string(),
            coordinates,
            full_address: data
                .full_address
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| format!("{}, KwaZulu-Natal, South Africa", display_name)),
            detection_source: DetectionSource::Manual,
            timestamp: Utc::now(),
            confidence: None,
            is_fallback: false,
        };

        tracing::info!("district set manually to {}", district.id);
        self.state.lock().district = Some(district.clone());
        Ok(district)
    }

    /// Forget the current district and lift the throttle.
    pub fn reset_district(&self) {
        let mut state = self.state.lock();
        state.district = None;
        state.last_detection = None;
        tracing::debug!("district reset");
    }

    /// Clear the durable "permission denied" flag so automatic detection
    /// may run again on the next session.
    pub fn forget_permission_denial(&self) {
        if let Err(e) = self.store.clear(PERMISSION_DENIED_KEY) {
            tracing::error!("failed to clear permission flag: {}", e);
        }
    }

    /// Detach the resolver from its owner.
    ///
    /// Detections still running complete and return to their callers, but
    /// no longer write state or emit notifications.
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    fn cached(&self, state: &ResolverState) -> Option<District> {
        let last = state.last_detection?;
        if last.elapsed() < self.config.throttle {
            state.district.clone()
        } else {
            None
        }
    }

    async fn run_detection(&self) -> District {
        let _detecting = DetectingGuard::enter(&self.state, !self.is_disposed());
        self.notify(Notification::Detecting);

        let (district, notice) = match self.resolve().await {
            Ok((district, used_fallback)) => {
                tracing::info!(
                    "district detected: {} (confidence {:?}, approximate: {})",
                    district.id,
                    district.confidence,
                    used_fallback
                );
                let notice = if used_fallback {
                    Notification::Approximate {
                        district: district.id,
                        display_name: district.display_name.clone(),
                    }
                } else {
                    Notification::Detected {
                        district: district.id,
                        display_name: district.display_name.clone(),
                    }
                };
                (district, notice)
            }
            Err(failure) => {
                let reason = failure.reason();
                tracing::warn!("district detection fell back to default: {}", failure);

                if reason == FallbackReason::PermissionDenied {
                    if let Err(e) = self.store.set(PERMISSION_DENIED_KEY, "true") {
                        tracing::error!("failed to persist permission flag: {}", e);
                    }
                }

                (
                    District::fallback(failure.raw_position()),
                    Notification::Fallback { reason },
                )
            }
        };

        if !self.is_disposed() {
            let mut state = self.state.lock();
            state.district = Some(district.clone());
            state.last_detection = Some(Instant::now());
            state.is_detecting = false;
        }
        self.notify(notice);

        district
    }

    /// Position first, then lookup. Never concurrent.
    async fn resolve(&self) -> Result<(District, bool), DetectionFailure> {
        let options = &self.config.position_options;
        let position = match tokio::time::timeout(
            options.timeout,
            self.geolocation.current_position(options),
        )
        .await
        {
            Ok(Ok(point)) => point,
            Ok(Err(e)) => return Err(DetectionFailure::Geolocation(e)),
            Err(_) => return Err(DetectionFailure::Geolocation(GeolocationError::Timeout)),
        };

        if let Err(e) = position.validate() {
            return Err(DetectionFailure::Geolocation(
                GeolocationError::PositionUnavailable(e.to_string()),
            ));
        }
        tracing::debug!("position acquired at {}", position);

        let response =
            match tokio::time::timeout(self.config.lookup_timeout, self.lookup.lookup(position))
                .await
            {
                Ok(Ok(response)) => response,
                Ok(Err(error)) => {
                    return Err(DetectionFailure::Lookup {
                        error,
                        raw: position,
                    })
                }
                Err(_) => {
                    return Err(DetectionFailure::Lookup {
                        error: LookupError::Timeout,
                        raw: position,
                    })
                }
            };

        response
            .resolve()
            .map(|resolved| (resolved.district, resolved.used_fallback))
            .map_err(|error| DetectionFailure::Lookup {
                error,
                raw: position,
            })
    }

    fn notify(&self, notification: Notification) {
        if self.is_disposed() {
            return;
        }
        self.notifier.notify(&notification);
    }
}
