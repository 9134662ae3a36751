use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::i18n::Locale;

/// Distinguishes runtime behavior for different stages of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

const DEFAULT_API_URL: &str = "http://127.0.0.1:4000/api";
const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_STORAGE_PATH: &str = ".khadamat/session.json";

/// Top-level configuration for the client.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub api: ApiConfig,
    pub geocoder: GeocoderConfig,
    pub storage: StorageConfig,
    pub locale: Locale,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let base_url = normalize_url(
            &env::var("KHADAMAT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        )
        .ok_or(ConfigError::InvalidApiUrl)?;

        let timeout_secs = env::var("KHADAMAT_API_TIMEOUT_SECS")
            .unwrap_or_else(|_| "20".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTimeout)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        let geocoder_url = normalize_url(
            &env::var("KHADAMAT_GEOCODER_URL")
                .unwrap_or_else(|_| DEFAULT_GEOCODER_URL.to_string()),
        )
        .ok_or(ConfigError::InvalidGeocoderUrl)?;

        let storage_path = env::var("KHADAMAT_STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORAGE_PATH));

        let locale = Locale::from_tag(&env::var("KHADAMAT_LOCALE").unwrap_or_default());
        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = match env::var("KHADAMAT_LOG_FORMAT") {
            Ok(raw) => LogFormat::parse(&raw).ok_or(ConfigError::InvalidLogFormat(raw))?,
            Err(_) => LogFormat::Compact,
        };

        Ok(Self {
            environment,
            api: ApiConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            geocoder: GeocoderConfig {
                base_url: geocoder_url,
            },
            storage: StorageConfig { path: storage_path },
            locale,
            telemetry: TelemetryConfig {
                log_level,
                format: log_format,
            },
        })
    }
}

fn normalize_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Some(trimmed.to_string())
    } else {
        None
    }
}

/// Remote API location and transport limits.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub base_url: String,
}

/// Where the durable session file lives.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidApiUrl,
    InvalidGeocoderUrl,
    InvalidTimeout,
    InvalidLogFormat(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidApiUrl => {
                write!(f, "KHADAMAT_API_URL must be an http(s) URL")
            }
            ConfigError::InvalidGeocoderUrl => {
                write!(f, "KHADAMAT_GEOCODER_URL must be an http(s) URL")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "KHADAMAT_API_TIMEOUT_SECS must be a positive integer")
            }
            ConfigError::InvalidLogFormat(value) => {
                write!(f, "KHADAMAT_LOG_FORMAT '{value}' is not one of compact, json")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("KHADAMAT_API_URL");
        env::remove_var("KHADAMAT_API_TIMEOUT_SECS");
        env::remove_var("KHADAMAT_GEOCODER_URL");
        env::remove_var("KHADAMAT_STORAGE_PATH");
        env::remove_var("KHADAMAT_LOCALE");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("KHADAMAT_LOG_FORMAT");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
        assert_eq!(config.api.timeout, Duration::from_secs(20));
        assert_eq!(config.storage.path, PathBuf::from(DEFAULT_STORAGE_PATH));
        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.format, LogFormat::Compact);
    }

    #[test]
    fn trims_trailing_slash_and_reads_locale() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("KHADAMAT_API_URL", "https://api.khadamat.ae/v1/");
        env::set_var("KHADAMAT_LOCALE", "ar");
        env::set_var("APP_ENV", "production");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.api.base_url, "https://api.khadamat.ae/v1");
        assert_eq!(config.locale, Locale::Ar);
        assert_eq!(config.environment, AppEnvironment::Production);
        reset_env();
    }

    #[test]
    fn rejects_non_http_api_url_and_zero_timeout() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("KHADAMAT_API_URL", "ftp://example.ae");
        assert!(matches!(AppConfig::load(), Err(ConfigError::InvalidApiUrl)));

        reset_env();
        env::set_var("KHADAMAT_API_TIMEOUT_SECS", "0");
        assert!(matches!(AppConfig::load(), Err(ConfigError::InvalidTimeout)));

        reset_env();
        env::set_var("KHADAMAT_LOG_FORMAT", "xml");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidLogFormat(value)) if value == "xml"
        ));
        env::set_var("KHADAMAT_LOG_FORMAT", "JSON");
        let config = AppConfig::load().expect("json format accepted");
        assert_eq!(config.telemetry.format, LogFormat::Json);
        reset_env();
    }
}
