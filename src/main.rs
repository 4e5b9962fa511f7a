//! FirstCare Geo - District resolution service
//!
//! This is the composition root that wires together all the components.

use firstcare_geo::adapters::inbound::ApiServer;
use firstcare_geo::adapters::outbound::{
    DashMapPreferenceStore, FixedGeolocation, HttpDistrictLookup, JsonFilePreferenceStore,
    MaxMindGeolocation, TracingNotifier, UnavailableGeolocation,
};
use firstcare_geo::{
    load_config, Config, DistrictResolver, GeoPoint, GeolocationProvider, PreferenceStore,
};
use std::net::IpAddr;
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    tracing::info!(
        "starting firstcare-geo lookup={} api_enabled={}",
        cfg.lookup_url,
        cfg.api_enabled
    );

    // ===== COMPOSITION ROOT =====

    // 1. Outbound adapters
    let geolocation = build_geolocation(&cfg);
    let lookup = Arc::new(HttpDistrictLookup::new(cfg.lookup_config())?);
    let store = build_store(&cfg)?;

    // 2. Application service
    let resolver = Arc::new(DistrictResolver::new(
        geolocation,
        lookup,
        store,
        Arc::new(TracingNotifier),
        cfg.resolver_config(),
    ));

    // 3. Initial detection, once per process
    match resolver.auto_detect().await {
        Some(district) => tracing::info!(
            "district resolved: {} ({}) source={} fallback={}",
            district.display_name,
            district.id,
            district.detection_source.as_str(),
            district.is_fallback
        ),
        None => tracing::info!("automatic detection skipped"),
    }

    // 4. Inbound adapter
    if !cfg.api_enabled {
        resolver.dispose();
        return Ok(());
    }

    let server = ApiServer::new(cfg.api_listen_addr.clone(), resolver.clone());
    let result = server.run().await;
    resolver.dispose();
    result
}

fn build_geolocation(cfg: &Config) -> Arc<dyn GeolocationProvider> {
    if let (Some(path), Some(ip)) = (&cfg.geoip_path, &cfg.client_ip) {
        match ip.parse::<IpAddr>() {
            Ok(ip) => match MaxMindGeolocation::from_file(path, ip) {
                Ok(g) => {
                    tracing::info!("GeoIP DB loaded from {} for client {}", path, ip);
                    return Arc::new(g);
                }
                Err(e) => tracing::error!("failed to load GeoIP DB from {}: {:?}", path, e),
            },
            Err(e) => tracing::error!("invalid FIRSTCARE_CLIENT_IP {}: {}", ip, e),
        }
    }

    if let (Some(lat), Some(lng)) = (cfg.fixed_lat, cfg.fixed_lng) {
        match GeoPoint::new(lat, lng) {
            Ok(point) => {
                tracing::info!("using fixed position {}", point);
                return Arc::new(FixedGeolocation::at(point));
            }
            Err(e) => tracing::error!("ignoring fixed position: {}", e),
        }
    }

    tracing::warn!("no position source configured; detection will use the default district");
    Arc::new(UnavailableGeolocation)
}

fn build_store(cfg: &Config) -> anyhow::Result<Arc<dyn PreferenceStore>> {
    match &cfg.prefs_path {
        Some(path) => {
            let store = JsonFilePreferenceStore::open(path)?;
            tracing::info!("preferences persisted to {}", path);
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(DashMapPreferenceStore::new())),
    }
}
