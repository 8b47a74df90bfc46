//! # Configuration System
//!
//! YAML configuration for applications embedding the designer:
//!
//! - Design limits (maximum prototype order)
//! - Logging
//! - Named filter presets
//!
//! ## Configuration Search Path
//!
//! Configuration is loaded from the first file found:
//! 1. Path specified via `CHEBYSHEV_IIR_CONFIG` environment variable
//! 2. `./chebyshev-iir.yaml` (current directory)
//! 3. `~/.config/chebyshev-iir/config.yaml` (user config)
//! 4. `/etc/chebyshev-iir/config.yaml` (system config)
//!
//! ## Example Configuration
//!
//! ```yaml
//! design:
//!   max_order: 16
//!
//! logging:
//!   level: debug
//!   format: compact
//!
//! filters:
//!   rumble:
//!     order: 4
//!     sample_rate: 48000
//!     ripple_db: 0.5
//!     kind:
//!       type: high_pass
//!       cutoff_hz: 30
//! ```

use crate::error::ConfigError;
use crate::filters::{Cascade, ChebyshevFilter, FilterSpec, MAX_ORDER};
use crate::observe::LogConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "CHEBYSHEV_IIR_CONFIG";

/// Design limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignConfig {
    /// Largest accepted prototype order, at most [`MAX_ORDER`]
    pub max_order: usize,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            max_order: MAX_ORDER,
        }
    }
}

impl DesignConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_ORDER).contains(&self.max_order) {
            return Err(ConfigError::Validation(format!(
                "max_order must be 1-{}, got {}",
                MAX_ORDER, self.max_order
            )));
        }
        Ok(())
    }
}

/// Complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,
    pub design: DesignConfig,
    pub logging: LogConfig,
    /// Filter presets (name -> parameters)
    pub filters: HashMap<String, FilterSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            design: DesignConfig::default(),
            logging: LogConfig::default(),
            filters: HashMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from the default search path.
    ///
    /// Returns the defaults if no file is found.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if Path::new(&path).exists() {
                return Self::load_from(Path::new(&path));
            }
            tracing::warn!(path = %path, "{} points to a missing file", CONFIG_ENV);
        }

        for path in &Self::config_search_paths() {
            if path.exists() {
                return Self::load_from(path);
            }
        }

        tracing::debug!("no configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), presets = config.filters.len(), "loaded configuration");
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))
    }

    /// Get configuration search paths.
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./chebyshev-iir.yaml")];

        if let Some(dirs) = directories::ProjectDirs::from("", "", "chebyshev-iir") {
            paths.push(dirs.config_dir().join("config.yaml"));
        }

        paths.push(PathBuf::from("/etc/chebyshev-iir/config.yaml"));
        paths
    }

    /// Validate limits and every preset.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.design.validate()?;

        for (name, spec) in &self.filters {
            spec.validate(self.design.max_order)
                .map_err(|e| ConfigError::Validation(format!("filter '{}': {}", name, e)))?;
        }

        Ok(())
    }

    /// Look up a preset by name.
    pub fn filter(&self, name: &str) -> Result<&FilterSpec, ConfigError> {
        self.filters
            .get(name)
            .ok_or_else(|| ConfigError::NotFound(format!("filter '{}' not found", name)))
    }

    /// Design a preset under this configuration's limits.
    pub fn design(&self, name: &str) -> Result<Cascade, ConfigError> {
        let spec = self.filter(name)?;
        crate::filters::design(spec, &self.design)
            .map_err(|e| ConfigError::Validation(format!("filter '{}': {}", name, e)))
    }

    /// Build a ready-to-run filter from a preset.
    pub fn build_filter(&self, name: &str) -> Result<ChebyshevFilter, ConfigError> {
        let spec = self.filter(name)?;
        ChebyshevFilter::with_spec(spec, self.design)
            .map_err(|e| ConfigError::Validation(format!("filter '{}': {}", name, e)))
    }

    /// Generate example configuration YAML.
    pub fn example_yaml() -> String {
        let config = Self {
            filters: {
                let mut filters = HashMap::new();
                filters.insert(
                    "anti_alias".to_string(),
                    FilterSpec::low_pass(8, 48_000.0, 20_000.0, 0.1),
                );
                filters.insert(
                    "rumble".to_string(),
                    FilterSpec::high_pass(4, 48_000.0, 30.0, 0.5),
                );
                filters.insert(
                    "presence".to_string(),
                    FilterSpec::band_shelf(3, 48_000.0, 3000.0, 2000.0, 4.0, 0.5),
                );
                filters
            },
            ..Default::default()
        };

        serde_yaml::to_string(&config).unwrap_or_default()
    }
}
