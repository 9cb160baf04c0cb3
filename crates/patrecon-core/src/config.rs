//! # Configuration System
//!
//! Provides YAML-based configuration for pattern reconstruction:
//!
//! - Reconstruction defaults (method, Cross-Weighted exponent, gain unit)
//! - Validation tolerances
//! - Logging configuration
//! - Named profiles that override the reconstruction section
//!
//! ## Configuration Search Path
//!
//! Configuration is loaded from the first file found:
//! 1. Path specified via `PATRECON_CONFIG` environment variable
//! 2. `./patrecon.yaml` (current directory)
//! 3. `~/.config/patrecon/config.yaml` (user config)
//! 4. `/etc/patrecon/config.yaml` (system config)
//!
//! ## Example Configuration
//!
//! ```yaml
//! reconstruction:
//!   method: CrossWeighted
//!   cross_weighted_k: 2.0
//!   unit: dBi
//!
//! tolerances:
//!   nearest_angle_from_boresight_deg: 10.0
//!   gain_max_vs_boresight_db: 3.0
//!   intersect_warn_db: 1.0
//!   intersect_error_db: 3.0
//!
//! logging:
//!   level: info
//!   format: compact
//! ```

use crate::observe::LogConfig;
use crate::options::{
    ReconOptions, ReconstructionMethod, ToleranceConfig, DEFAULT_CROSS_WEIGHTED_K,
};
use crate::units::GainUnit;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "PATRECON_CONFIG";

/// Error type for configuration operations.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file or profile not found
    NotFound(String),
    /// Failed to read or write configuration file
    ReadError(String),
    /// Failed to parse configuration
    ParseError(String),
    /// Invalid configuration value
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(msg) => write!(f, "config not found: {}", msg),
            ConfigError::ReadError(msg) => write!(f, "failed to read config: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "failed to parse config: {}", msg),
            ConfigError::ValidationError(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Reconstruction defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructionConfig {
    /// Combination method (Summing, CrossWeighted)
    pub method: ReconstructionMethod,
    /// Cross-Weighted normalization exponent
    pub cross_weighted_k: f64,
    /// Unit label of input gains (dBi, dBd, dB)
    pub unit: GainUnit,
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self {
            method: ReconstructionMethod::Summing,
            cross_weighted_k: DEFAULT_CROSS_WEIGHTED_K,
            unit: GainUnit::Dbi,
        }
    }
}

/// Complete patrecon configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatreconConfig {
    /// Configuration version
    pub version: String,
    /// Reconstruction defaults
    pub reconstruction: ReconstructionConfig,
    /// Validation tolerances
    pub tolerances: ToleranceConfig,
    /// Logging configuration
    pub logging: LogConfig,
    /// Named reconstruction profiles (name -> config)
    pub profiles: BTreeMap<String, ReconstructionConfig>,
}

impl Default for PatreconConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            reconstruction: ReconstructionConfig::default(),
            tolerances: ToleranceConfig::default(),
            logging: LogConfig::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl PatreconConfig {
    /// Load configuration from the default search path.
    ///
    /// Search order:
    /// 1. `PATRECON_CONFIG` environment variable
    /// 2. `./patrecon.yaml`
    /// 3. `~/.config/patrecon/config.yaml`
    /// 4. `/etc/patrecon/config.yaml`
    ///
    /// Returns default config if no file is found.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if Path::new(&path).exists() {
                return Self::load_from(Path::new(&path));
            }
            tracing::warn!(path = %path, "{} points to a missing file, ignoring", CONFIG_ENV_VAR);
        }

        for path in &Self::config_search_paths() {
            if path.exists() {
                return Self::load_from(path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;

        tracing::debug!(path = %path.display(), "loading configuration");
        Self::parse(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            serde_yaml::to_string(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))
    }

    /// Apply a named profile.
    ///
    /// Replaces the reconstruction section with the profile's settings.
    pub fn with_profile(&self, name: &str) -> Result<Self, ConfigError> {
        let profile = self
            .profiles
            .get(name)
            .ok_or_else(|| ConfigError::NotFound(format!("profile '{}' not found", name)))?;

        let mut config = self.clone();
        config.reconstruction = profile.clone();
        Ok(config)
    }

    /// Get configuration search paths.
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./patrecon.yaml")];

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "patrecon") {
            paths.push(config_dir.config_dir().join("config.yaml"));
        }

        paths.push(PathBuf::from("/etc/patrecon/config.yaml"));

        paths
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sections = std::iter::once(("reconstruction", &self.reconstruction))
            .chain(self.profiles.iter().map(|(name, p)| (name.as_str(), p)));
        for (name, section) in sections {
            if !section.cross_weighted_k.is_finite() {
                return Err(ConfigError::ValidationError(format!(
                    "{}: cross_weighted_k must be finite",
                    name
                )));
            }
        }

        self.tolerances
            .check()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    /// Reconstruction options described by this configuration.
    pub fn options(&self) -> ReconOptions {
        ReconOptions::builder()
            .method(self.reconstruction.method)
            .cross_weighted_k(self.reconstruction.cross_weighted_k)
            .tolerances(self.tolerances)
            .unit(self.reconstruction.unit)
            .build()
    }

    /// Generate example configuration YAML.
    pub fn example_yaml() -> String {
        let config = Self {
            profiles: {
                let mut profiles = BTreeMap::new();
                profiles.insert(
                    "cross_weighted".to_string(),
                    ReconstructionConfig {
                        method: ReconstructionMethod::CrossWeighted,
                        ..Default::default()
                    },
                );
                profiles.insert(
                    "dipole_reference".to_string(),
                    ReconstructionConfig {
                        unit: GainUnit::Dbd,
                        ..Default::default()
                    },
                );
                profiles
            },
            ..Default::default()
        };

        serde_yaml::to_string(&config).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observe::LogLevel;

    #[test]
    fn test_default_config() {
        let config = PatreconConfig::default();
        assert_eq!(config.reconstruction.method, ReconstructionMethod::Summing);
        assert_eq!(config.reconstruction.cross_weighted_k, 2.0);
        assert_eq!(config.tolerances, ToleranceConfig::default());
        assert!(config.profiles.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
reconstruction:
  method: CrossWeighted
  cross_weighted_k: 3.0
  unit: dBd

tolerances:
  nearest_angle_from_boresight_deg: 5.0
  intersect_warn_db: 0.5

logging:
  level: debug
"#;

        let config = PatreconConfig::parse(yaml).unwrap();
        assert_eq!(config.reconstruction.method, ReconstructionMethod::CrossWeighted);
        assert_eq!(config.reconstruction.cross_weighted_k, 3.0);
        assert_eq!(config.reconstruction.unit, GainUnit::Dbd);
        assert_eq!(config.tolerances.nearest_angle_from_boresight_deg, 5.0);
        assert_eq!(config.tolerances.intersect_thresholds(), (0.5, 3.0));
        // Defaults fill in what the file leaves out
        assert_eq!(config.tolerances.gain_max_vs_boresight_db, 3.0);
        assert_eq!(config.logging.level, LogLevel::Debug);

        let opts = config.options();
        assert_eq!(opts.method, ReconstructionMethod::CrossWeighted);
        assert_eq!(opts.unit, GainUnit::Dbd);
    }

    #[test]
    fn test_unknown_method_is_parse_error() {
        let yaml = "reconstruction:\n  method: Stacking\n";
        match PatreconConfig::parse(yaml) {
            Err(ConfigError::ParseError(msg)) => assert!(msg.contains("Unknown method: Stacking")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_method_tokens_match_job_files() {
        for token in ["cross_weighted", "cross-weighted", "crossweighted", "CrossWeighted"] {
            let yaml = format!("reconstruction:\n  method: {}\n", token);
            let config = PatreconConfig::parse(&yaml).unwrap();
            assert_eq!(config.reconstruction.method, ReconstructionMethod::CrossWeighted);
        }
    }

    #[test]
    fn test_profiles() {
        let yaml = r#"
profiles:
  cw:
    method: CrossWeighted
    cross_weighted_k: 1.5
"#;

        let config = PatreconConfig::parse(yaml).unwrap();
        let cw = config.with_profile("cw").unwrap();
        assert_eq!(cw.reconstruction.method, ReconstructionMethod::CrossWeighted);
        assert_eq!(cw.reconstruction.cross_weighted_k, 1.5);
        assert!(matches!(
            config.with_profile("missing"),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_validation() {
        let mut config = PatreconConfig::default();
        assert!(config.validate().is_ok());

        config.tolerances.intersect_warn_db = 5.0;
        assert!(config.validate().is_err());

        config.tolerances = ToleranceConfig::default();
        config.reconstruction.cross_weighted_k = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_example_yaml() {
        let yaml = PatreconConfig::example_yaml();
        assert!(yaml.contains("reconstruction:"));
        assert!(yaml.contains("tolerances:"));
        let parsed = PatreconConfig::parse(&yaml).unwrap();
        assert_eq!(parsed.profiles.len(), 2);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patrecon.yaml");

        let mut config = PatreconConfig::default();
        config.reconstruction.method = ReconstructionMethod::CrossWeighted;
        config.save(&path).unwrap();

        let loaded = PatreconConfig::load_from(&path).unwrap();
        assert_eq!(loaded.reconstruction, config.reconstruction);
    }

    #[test]
    fn test_load_missing_file() {
        let err = PatreconConfig::load_from(Path::new("/nonexistent/patrecon.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_)));
    }

    #[test]
    fn test_config_search_paths() {
        let paths = PatreconConfig::config_search_paths();
        assert!(!paths.is_empty());
        assert!(paths[0].ends_with("patrecon.yaml"));
    }
}
