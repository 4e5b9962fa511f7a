use crate::adapters::outbound::HttpLookupConfig;
use crate::application::ResolverConfig;
use crate::domain::ports::PositionOptions;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // District lookup service
    pub lookup_url: String,
    pub lookup_timeout_secs: u64,

    // Resolver behaviour
    pub throttle_secs: u64,
    pub geo_timeout_ms: u64,
    pub geo_max_age_ms: u64,
    pub geo_high_accuracy: bool,

    // Durable preferences (in-memory when unset)
    pub prefs_path: Option<String>,

    // Position source: GeoIP database or fixed coordinates
    pub geoip_path: Option<String>,
    pub client_ip: Option<String>,
    pub fixed_lat: Option<f64>,
    pub fixed_lng: Option<f64>,

    // HTTP API settings
    pub api_enabled: bool,
    pub api_listen_addr: String,

    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lookup_url: "http://localhost:5000/api".to_string(),
            lookup_timeout_secs: 10,
            throttle_secs: 60,
            geo_timeout_ms: 10_000,
            geo_max_age_ms: 300_000,
            geo_high_accuracy: false,
            prefs_path: None,
            geoip_path: None,
            client_ip: None,
            fixed_lat: None,
            fixed_lng: None,
            api_enabled: false,
            api_listen_addr: "0.0.0.0:8090".to_string(),
            debug: false,
        }
    }
}

impl Config {
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            throttle: Duration::from_secs(self.throttle_secs),
            position_options: PositionOptions {
                high_accuracy: self.geo_high_accuracy,
                timeout: Duration::from_millis(self.geo_timeout_ms),
                max_cached_age: Duration::from_millis(self.geo_max_age_ms),
            },
            lookup_timeout: Duration::from_secs(self.lookup_timeout_secs),
        }
    }

    pub fn lookup_config(&self) -> HttpLookupConfig {
        HttpLookupConfig {
            base_url: self.lookup_url.clone(),
            timeout: Duration::from_secs(self.lookup_timeout_secs),
        }
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false)
}

// A zero timeout would fail every detection, so it is treated as unset
fn env_timeout(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

pub fn load_config() -> anyhow::Result<Config> {
    let lookup_url = std::env::var("FIRSTCARE_LOOKUP_URL")
        .unwrap_or_else(|_| "http://localhost:5000/api".to_string());

    let lookup_timeout_secs = env_timeout("FIRSTCARE_LOOKUP_TIMEOUT_SECS", 10);

    let throttle_secs = std::env::var("FIRSTCARE_THROTTLE_SECS")
        .unwrap_or_else(|_| "60".to_string())
        .parse()
        .unwrap_or(60);

    let geo_timeout_ms = env_timeout("FIRSTCARE_GEO_TIMEOUT_MS", 10_000);

    let geo_max_age_ms = std::env::var("FIRSTCARE_GEO_MAX_AGE_MS")
        .unwrap_or_else(|_| "300000".to_string())
        .parse()
        .unwrap_or(300_000);

    let geo_high_accuracy = env_flag("FIRSTCARE_GEO_HIGH_ACCURACY");

    let prefs_path = std::env::var("FIRSTCARE_PREFS_PATH").ok();

    let geoip_path = std::env::var("FIRSTCARE_GEOIP_PATH").ok();
    let client_ip = std::env::var("FIRSTCARE_CLIENT_IP").ok();

    // Ignored unless both parse
    let fixed_lat = std::env::var("FIRSTCARE_FIXED_LAT")
        .ok()
        .and_then(|v| v.parse().ok());
    let fixed_lng = std::env::var("FIRSTCARE_FIXED_LNG")
        .ok()
        .and_then(|v| v.parse().ok());
    let (fixed_lat, fixed_lng) = match (fixed_lat, fixed_lng) {
        (Some(lat), Some(lng)) => (Some(lat), Some(lng)),
        _ => (None, None),
    };

    let api_enabled = env_flag("FIRSTCARE_API_ENABLED");

    let api_listen_addr = std::env::var("FIRSTCARE_API_LISTEN_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8090".to_string());

    let debug = std::env::var("DEBUG").is_ok();

    Ok(Config {
        lookup_url,
        lookup_timeout_secs,
        throttle_secs,
        geo_timeout_ms,
        geo_max_age_ms,
        geo_high_accuracy,
        prefs_path,
        geoip_path,
        client_ip,
        fixed_lat,
        fixed_lng,
        api_enabled,
        api_listen_addr,
        debug,
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    // Each test touches distinct variables: the test harness runs them in
    // parallel within one process.

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.lookup_url, "http://localhost:5000/api");
        assert_eq!(cfg.throttle_secs, 60);
        assert_eq!(cfg.geo_timeout_ms, 10_000);
        assert_eq!(cfg.geo_max_age_ms, 300_000);
        assert!(!cfg.geo_high_accuracy);
        assert!(!cfg.api_enabled);
        assert!(cfg.prefs_path.is_none());
    }

    #[test]
    fn test_resolver_config_from_defaults() {
        let rc = Config::default().resolver_config();
        assert_eq!(rc.throttle, Duration::from_secs(60));
        assert_eq!(rc.lookup_timeout, Duration::from_secs(10));
        assert_eq!(rc.position_options, PositionOptions::default());
    }

    #[test]
    fn test_lookup_config_from_defaults() {
        let lc = Config::default().lookup_config();
        assert_eq!(lc.base_url, "http://localhost:5000/api");
        assert_eq!(lc.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_config_clone() {
        let cfg = Config::default();
        let cloned = cfg.clone();
        assert_eq!(cfg.lookup_url, cloned.lookup_url);
        assert_eq!(cfg.api_listen_addr, cloned.api_listen_addr);
    }

    #[test]
    fn test_load_config_with_custom_lookup_url() {
        std::env::set_var("FIRSTCARE_LOOKUP_URL", "https://firstcare.example/api");
        let cfg = load_config().unwrap();
        assert_eq!(cfg.lookup_url, "https://firstcare.example/api");
        std::env::remove_var("FIRSTCARE_LOOKUP_URL");
    }

    #[test]
    fn test_load_config_with_throttle() {
        std::env::set_var("FIRSTCARE_THROTTLE_SECS", "120");
        let cfg = load_config().unwrap();
        assert_eq!(cfg.throttle_secs, 120);
        std::env::remove_var("FIRSTCARE_THROTTLE_SECS");
    }

    #[test]
    fn test_load_config_parse_error_uses_default() {
        std::env::set_var("FIRSTCARE_GEO_TIMEOUT_MS", "soon");
        let cfg = load_config().unwrap();
        assert_eq!(cfg.geo_timeout_ms, 10_000);
        std::env::remove_var("FIRSTCARE_GEO_TIMEOUT_MS");
    }

    #[test]
    fn test_load_config_with_api_enabled() {
        std::env::set_var("FIRSTCARE_API_ENABLED", "TRUE");
        std::env::set_var("FIRSTCARE_API_LISTEN_ADDR", "127.0.0.1:9090");
        let cfg = load_config().unwrap();
        assert!(cfg.api_enabled);
        assert_eq!(cfg.api_listen_addr, "127.0.0.1:9090");
        std::env::remove_var("FIRSTCARE_API_ENABLED");
        std::env::remove_var("FIRSTCARE_API_LISTEN_ADDR");
    }

    #[test]
    fn test_load_config_with_high_accuracy() {
        std::env::set_var("FIRSTCARE_GEO_HIGH_ACCURACY", "1");
        let cfg = load_config().unwrap();
        assert!(cfg.geo_high_accuracy);
        assert!(cfg.resolver_config().position_options.high_accuracy);
        std::env::remove_var("FIRSTCARE_GEO_HIGH_ACCURACY");
    }

    #[test]
    fn test_load_config_with_fixed_position() {
        std::env::set_var("FIRSTCARE_FIXED_LAT", "-29.6006");
        std::env::set_var("FIRSTCARE_FIXED_LNG", "30.3794");
        let cfg = load_config().unwrap();
        assert_eq!(cfg.fixed_lat, Some(-29.6006));
        assert_eq!(cfg.fixed_lng, Some(30.3794));
        std::env::remove_var("FIRSTCARE_FIXED_LAT");
        std::env::remove_var("FIRSTCARE_FIXED_LNG");
    }

    #[test]
    fn test_load_config_with_geoip() {
        std::env::set_var("FIRSTCARE_GEOIP_PATH", "/data/GeoLite2-City.mmdb");
        std::env::set_var("FIRSTCARE_CLIENT_IP", "41.0.0.1");
        let cfg = load_config().unwrap();
        assert_eq!(cfg.geoip_path.as_deref(), Some("/data/GeoLite2-City.mmdb"));
        assert_eq!(cfg.client_ip.as_deref(), Some("41.0.0.1"));
        std::env::remove_var("FIRSTCARE_GEOIP_PATH");
        std::env::remove_var("FIRSTCARE_CLIENT_IP");
    }

    #[test]
    fn test_load_config_with_prefs_path() {
        std::env::set_var("FIRSTCARE_PREFS_PATH", "/tmp/firstcare-prefs.json");
        let cfg = load_config().unwrap();
        assert_eq!(cfg.prefs_path.as_deref(), Some("/tmp/firstcare-prefs.json"));
        std::env::remove_var("FIRSTCARE_PREFS_PATH");
    }

    #[test]
    fn test_load_config_with_lookup_timeout() {
        std::env::set_var("FIRSTCARE_LOOKUP_TIMEOUT_SECS", "15");
        let cfg = load_config().unwrap();
        assert_eq!(cfg.lookup_timeout_secs, 15);
        assert_eq!(cfg.lookup_config().timeout, Duration::from_secs(15));
        std::env::remove_var("FIRSTCARE_LOOKUP_TIMEOUT_SECS");
    }

    #[test]
    fn test_env_timeout_zero_uses_default() {
        std::env::set_var("FIRSTCARE_TEST_TIMEOUT_ZERO", "0");
        assert_eq!(env_timeout("FIRSTCARE_TEST_TIMEOUT_ZERO", 10), 10);
        std::env::remove_var("FIRSTCARE_TEST_TIMEOUT_ZERO");

        std::env::set_var("FIRSTCARE_TEST_TIMEOUT_SET", "250");
        assert_eq!(env_timeout("FIRSTCARE_TEST_TIMEOUT_SET", 10), 250);
        std::env::remove_var("FIRSTCARE_TEST_TIMEOUT_SET");

        assert_eq!(env_timeout("FIRSTCARE_TEST_TIMEOUT_UNSET", 10_000), 10_000);
    }
}
