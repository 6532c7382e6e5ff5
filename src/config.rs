//! Configuration management for the `TripTime` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::TripTimeError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `TripTime` application
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TripTimeConfig {
    /// Language-model service configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Maps service configuration (geocoding, directions, nearby places)
    #[serde(default)]
    pub maps: MapsConfig,
    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Default application settings
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Language-model service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key for the model service
    pub api_key: Option<String>,
    /// Base URL of an OpenAI-compatible chat completions endpoint
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    /// Model identifier
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for transient transport failures
    #[serde(default = "default_llm_max_retries")]
    pub max_retries: u32,
}

/// Maps service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapsConfig {
    /// API key for the maps service
    pub api_key: Option<String>,
    /// Base URL for the maps API
    #[serde(default = "default_maps_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_maps_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for failed requests
    #[serde(default = "default_maps_max_retries")]
    pub max_retries: u32,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache directory location
    #[serde(default = "default_cache_location")]
    pub location: String,
    /// TTL for cached geocoding results, in hours
    #[serde(default = "default_geocode_ttl")]
    pub geocode_ttl_hours: u32,
    /// TTL for cached route durations, in hours
    #[serde(default = "default_route_ttl")]
    pub route_ttl_hours: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Default application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Radius for nearby-place suggestions, in meters
    #[serde(default = "default_suggestion_radius")]
    pub suggestion_radius_m: u32,
    /// Maximum number of nearby-place suggestions per unresolved location
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    /// Maximum number of suggestion-substituted requeries per question
    #[serde(default = "default_max_requeries")]
    pub max_requeries: u32,
}

// Default value functions
fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_timeout() -> u32 {
    60
}

fn default_llm_max_retries() -> u32 {
    2
}

fn default_maps_base_url() -> String {
    "https://maps.googleapis.com/maps/api".to_string()
}

fn default_maps_timeout() -> u32 {
    10
}

fn default_maps_max_retries() -> u32 {
    2
}

fn default_cache_location() -> String {
    "~/.cache/triptime".to_string()
}

fn default_geocode_ttl() -> u32 {
    168
}

fn default_route_ttl() -> u32 {
    24
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_suggestion_radius() -> u32 {
    5000
}

fn default_max_suggestions() -> usize {
    3
}

fn default_max_requeries() -> u32 {
    3
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            timeout_seconds: default_llm_timeout(),
            max_retries: default_llm_max_retries(),
        }
    }
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_maps_base_url(),
            timeout_seconds: default_maps_timeout(),
            max_retries: default_maps_max_retries(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            location: default_cache_location(),
            geocode_ttl_hours: default_geocode_ttl(),
            route_ttl_hours: default_route_ttl(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            suggestion_radius_m: default_suggestion_radius(),
            max_suggestions: default_max_suggestions(),
            max_requeries: default_max_requeries(),
        }
    }
}

impl TripTimeConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Add environment variable overrides with TRIPTIME_ prefix,
        // e.g. TRIPTIME_LLM__API_KEY, TRIPTIME_MAPS__API_KEY
        builder = builder.add_source(
            Environment::with_prefix("TRIPTIME")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: TripTimeConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("triptime").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        for (name, key) in [("LLM", &self.llm.api_key), ("maps", &self.maps.api_key)] {
            if let Some(key) = key {
                if key.is_empty() {
                    return Err(TripTimeError::config(format!(
                        "{name} API key cannot be empty if provided. Either remove it or provide a valid key."
                    ))
                    .into());
                }

                if key.len() < 8 {
                    return Err(TripTimeError::config(format!(
                        "{name} API key appears to be invalid (too short). Please check your API key."
                    ))
                    .into());
                }

                if key.len() > 200 {
                    return Err(TripTimeError::config(format!(
                        "{name} API key appears to be invalid (too long). Please check your API key."
                    ))
                    .into());
                }
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.llm.timeout_seconds > 300 {
            return Err(
                TripTimeError::config("LLM timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.maps.timeout_seconds > 300 {
            return Err(
                TripTimeError::config("Maps API timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.llm.max_retries > 10 || self.maps.max_retries > 10 {
            return Err(TripTimeError::config("Max retries cannot exceed 10").into());
        }

        if self.cache.geocode_ttl_hours > 720 || self.cache.route_ttl_hours > 720 {
            return Err(
                TripTimeError::config("Cache TTL cannot exceed 720 hours (30 days)").into(),
            );
        }

        if self.defaults.suggestion_radius_m == 0 || self.defaults.suggestion_radius_m > 50_000 {
            return Err(TripTimeError::config(
                "Suggestion radius must be between 1 and 50000 meters",
            )
            .into());
        }

        if self.defaults.max_suggestions == 0 || self.defaults.max_suggestions > 10 {
            return Err(
                TripTimeError::config("Max suggestions must be between 1 and 10").into(),
            );
        }

        if self.defaults.max_requeries > 10 {
            return Err(TripTimeError::config("Max requeries cannot exceed 10").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TripTimeError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TripTimeError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [("LLM", &self.llm.base_url), ("maps", &self.maps.base_url)] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(TripTimeError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Expand a leading `~` in the cache location to the home directory
    #[must_use]
    pub fn cache_path(&self) -> PathBuf {
        let location = &self.cache.location;
        if let Some(rest) = location.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TripTimeConfig::default();
        assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
        assert_eq!(config.maps.base_url, "https://maps.googleapis.com/maps/api");
        assert_eq!(config.defaults.suggestion_radius_m, 5000);
        assert_eq!(config.defaults.max_suggestions, 3);
        assert_eq!(config.defaults.max_requeries, 3);
        assert_eq!(config.logging.level, "info");
        assert!(config.llm.api_key.is_none());
        assert!(config.maps.api_key.is_none());
    }

    #[test]
    fn test_default_config_validates() {
        let config = TripTimeConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_empty_api_key() {
        let mut config = TripTimeConfig::default();
        config.llm.api_key = Some(String::new());
        let result = config.validate_api_keys();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_config_validation_valid_api_keys() {
        let mut config = TripTimeConfig::default();
        config.llm.api_key = Some("sk-valid_api_key_123".to_string());
        config.maps.api_key = Some("AIza-valid_api_key_123".to_string());
        assert!(config.validate_api_keys().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = TripTimeConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Invalid log level")
        );
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = TripTimeConfig::default();
        config.defaults.suggestion_radius_m = 100_000;
        let result = config.validate();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Suggestion radius")
        );
    }

    #[test]
    fn test_config_validation_rejects_bad_base_url() {
        let mut config = TripTimeConfig::default();
        config.maps.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_path_generation() {
        let path = TripTimeConfig::get_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("triptime"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_cache_path_expands_tilde() {
        let config = TripTimeConfig::default();
        let path = config.cache_path();
        assert!(!path.to_string_lossy().starts_with('~'));
        assert!(path.to_string_lossy().contains("triptime"));
    }
}
