//! # Configuration
//!
//! Layout and server settings.
//!
//! Precedence, highest first:
//! 1. CLI flags (applied by the caller)
//! 2. Environment: `REGMAP_RATE_LIMIT`, `REGMAP_CORS_ORIGINS`
//! 3. TOML file (`--config`, or `regmap.toml` in the working directory)
//! 4. Built-in defaults
//!
//! ```toml
//! [layout]
//! layer_spacing = 350
//! node_spacing = 150
//! slots = "compact"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! rate_limit = 100
//! cors_origins = ["http://localhost:3000"]
//! ```

use regmap_core::{LayoutConfig, RegmapError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "regmap.toml";

/// Maximum size of a configuration file.
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Default rate limit in requests per second.
pub const DEFAULT_RATE_LIMIT: u32 = 100;

// =============================================================================
// SERVER CONFIG
// =============================================================================

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Requests per second; 0 disables rate limiting.
    pub rate_limit: u32,
    /// Allowed CORS origins. Empty means localhost only; `["*"]` allows all.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            rate_limit: DEFAULT_RATE_LIMIT,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Defaults with environment overrides applied.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override fields from `REGMAP_RATE_LIMIT` and `REGMAP_CORS_ORIGINS`.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn apply_env(&mut self) {
        if let Ok(raw) = std::env::var("REGMAP_RATE_LIMIT") {
            match raw.trim().parse() {
                Ok(rps) => self.rate_limit = rps,
                Err(e) => tracing::warn!("Ignoring REGMAP_RATE_LIMIT={:?}: {}", raw, e),
            }
        }

        if let Ok(raw) = std::env::var("REGMAP_CORS_ORIGINS") {
            self.cors_origins = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    /// `host:port` for binding.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// FILE CONFIG
// =============================================================================

/// Everything a `regmap.toml` can hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub server: ServerConfig,
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, RegmapError> {
        let config: Self = toml::from_str(text)
            .map_err(|e| RegmapError::DeserializationError(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, RegmapError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            RegmapError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(RegmapError::IoError(format!(
                "Config '{}' exceeds {} bytes",
                path.display(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            RegmapError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }

    /// Resolve the configuration for this process.
    ///
    /// An explicit path must exist. Without one, `regmap.toml` is used if
    /// present. Environment overrides are applied last.
    pub fn load(explicit: Option<&Path>) -> Result<Self, RegmapError> {
        let mut config = match explicit {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                Self::from_file(path)?
            }
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                tracing::debug!("Loading config from {}", DEFAULT_CONFIG_FILE);
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        config.server.apply_env();
        Ok(config)
    }

    fn validate(&self) -> Result<(), RegmapError> {
        if self.layout.layer_spacing <= 0 || self.layout.node_spacing <= 0 {
            return Err(RegmapError::DeserializationError(
                "Invalid config: layout spacings must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
