use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "StrokeGuard";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Session lifetime for issued bearer tokens.
pub const SESSION_TTL_HOURS: i64 = 12;

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "info,strokeguard=debug"
}

/// Application data directory.
/// `STROKEGUARD_DATA_DIR` overrides; defaults to ~/.strokeguard
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("STROKEGUARD_DATA_DIR") {
        return PathBuf::from(dir);
    }
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".strokeguard")
}

/// SQLite database path inside the data directory.
pub fn database_path() -> PathBuf {
    data_dir().join("strokeguard.db")
}

/// HTTP bind address. `STROKEGUARD_ADDR` overrides; defaults to port 8000
/// on all interfaces.
pub fn bind_addr() -> SocketAddr {
    std::env::var("STROKEGUARD_ADDR")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8000)))
}

/// Base URL of the model-serving process.
/// `STROKEGUARD_PREDICTOR_URL` overrides.
pub fn predictor_base_url() -> String {
    std::env::var("STROKEGUARD_PREDICTOR_URL")
        .unwrap_or_else(|_| "http://localhost:9000".to_string())
}

/// Timeout for scoring calls, in seconds.
pub fn predictor_timeout_secs() -> u64 {
    std::env::var("STROKEGUARD_PREDICTOR_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(30)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_path_under_data_dir() {
        let db = database_path();
        assert!(db.starts_with(data_dir()));
        assert!(db.ends_with("strokeguard.db"));
    }

    #[test]
    fn default_bind_addr_is_port_8000() {
        if std::env::var("STROKEGUARD_ADDR").is_err() {
            assert_eq!(bind_addr().port(), 8000);
        }
    }

    #[test]
    fn app_name_is_strokeguard() {
        assert_eq!(APP_NAME, "StrokeGuard");
    }

    #[test]
    fn session_ttl_positive() {
        assert!(SESSION_TTL_HOURS > 0);
    }
}
