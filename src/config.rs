//! Runtime settings, read from the environment and an optional `.env` file.

use std::collections::HashMap;
use std::env::VarError;
use std::net::SocketAddr;
use std::path::Path;

use thiserror::Error;

use crate::location::DefaultLocation;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("cannot read env file {path}: {reason}")]
    EnvFile { path: String, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Returned by `resolve` when the query is blank.
    pub default_location: DefaultLocation,
    pub nominatim_base_url: String,
    /// Per-request bound on provider calls.
    pub timeout_secs: u64,
    pub user_agent: String,
    pub bind_addr: SocketAddr,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_location: DefaultLocation {
                name: "New York, NY".into(),
                lat: 40.7128,
                lon: -74.0060,
            },
            nominatim_base_url: "https://nominatim.openstreetmap.org".into(),
            timeout_secs: 10,
            user_agent: default_user_agent(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            log_level: "info".into(),
        }
    }
}

fn default_user_agent() -> String {
    format!("placefinder/{}", env!("CARGO_PKG_VERSION"))
}

impl Settings {
    /// Load from the process environment after applying `./.env` if present.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key))
    }

    /// Load from an explicit env file. Process variables take precedence
    /// over the file.
    pub fn load_with_env_file(path: &Path) -> Result<Self, ConfigError> {
        let file_err = |reason: String| ConfigError::EnvFile {
            path: path.display().to_string(),
            reason,
        };
        let mut file_vars = HashMap::new();
        for item in dotenvy::from_path_iter(path).map_err(|e| file_err(e.to_string()))? {
            let (k, v) = item.map_err(|e| file_err(e.to_string()))?;
            file_vars.insert(k, v);
        }

        Self::from_lookup(|key| {
            std::env::var(key).or_else(|_| file_vars.get(key).cloned().ok_or(VarError::NotPresent))
        })
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let defaults = Self::default();

        let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason,
        };

        let parse_f64 = |var: &str, default: f64| -> Result<f64, ConfigError> {
            match lookup(var) {
                Ok(raw) => raw.trim().parse::<f64>().map_err(|e| invalid(var, e.to_string())),
                Err(_) => Ok(default),
            }
        };

        let name = lookup("PLACEFINDER_DEFAULT_LOCATION_NAME")
            .unwrap_or(defaults.default_location.name);
        let lat = parse_f64("PLACEFINDER_DEFAULT_LOCATION_LAT", defaults.default_location.lat)?;
        let lon = parse_f64("PLACEFINDER_DEFAULT_LOCATION_LON", defaults.default_location.lon)?;
        if !(-90.0..=90.0).contains(&lat) {
            return Err(invalid("PLACEFINDER_DEFAULT_LOCATION_LAT", format!("{} is outside -90..90", lat)));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(invalid("PLACEFINDER_DEFAULT_LOCATION_LON", format!("{} is outside -180..180", lon)));
        }

        let nominatim_base_url = lookup("PLACEFINDER_NOMINATIM_BASE_URL")
            .unwrap_or(defaults.nominatim_base_url);

        let timeout_secs = match lookup("PLACEFINDER_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| invalid("PLACEFINDER_TIMEOUT_SECS", e.to_string()))?,
            Err(_) => defaults.timeout_secs,
        };
        if timeout_secs == 0 {
            return Err(invalid("PLACEFINDER_TIMEOUT_SECS", "must be at least 1".into()));
        }

        let user_agent = lookup("PLACEFINDER_USER_AGENT").unwrap_or(defaults.user_agent);

        let bind_addr = match lookup("PLACEFINDER_BIND_ADDR") {
            Ok(raw) => raw
                .trim()
                .parse::<SocketAddr>()
                .map_err(|e| invalid("PLACEFINDER_BIND_ADDR", e.to_string()))?,
            Err(_) => defaults.bind_addr,
        };

        let log_level = lookup("PLACEFINDER_LOG_LEVEL").unwrap_or(defaults.log_level);

        Ok(Self {
            default_location: DefaultLocation { name, lat, lon },
            nominatim_base_url,
            timeout_secs,
            user_agent,
            bind_addr,
            log_level,
        })
    }
}
