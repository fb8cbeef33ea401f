//! Service configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; a `config.toml` in the config directory overrides any
//! subset of keys.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [server]
//! base_url = "http://localhost:8000/api/iiif"  # Absolute root of the IIIF routes
//! format_suffix = ""                           # e.g. ".json" for static hosting
//!
//! [image_server]
//! url = "http://localhost:8000/loris/"         # IIIF Image API server base
//! bucket = "media-management"                  # Storage bucket of uploaded files
//! key_prefix = "media"                         # Key prefix inside the bucket
//!
//! [thumbnails]
//! max_height = 200                             # Thumbnail height cap in pixels
//!
//! [output]
//! pretty = false                               # Indented, key-sorted JSON
//!
//! [processing]
//! max_processes = 4                            # Max parallel workers (omit for auto)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [server]
//! base_url = "https://media.example.edu/api/iiif"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Service configuration loaded from `config.toml`.
///
/// All fields have defaults suitable for a local development deployment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// Where the IIIF routes are mounted.
    pub server: ServerConfig,
    /// The IIIF image server that hosts uploaded files.
    pub image_server: ImageServerConfig,
    /// Thumbnail size computation.
    pub thumbnails: ThumbnailsConfig,
    /// JSON output formatting.
    pub output: OutputConfig,
    /// Parallel export settings.
    pub processing: ProcessingConfig,
}

impl ServiceConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_absolute_http(&self.server.base_url) {
            return Err(ConfigError::Validation(
                "server.base_url must be an absolute http(s) URL".into(),
            ));
        }
        if !is_absolute_http(&self.image_server.url) {
            return Err(ConfigError::Validation(
                "image_server.url must be an absolute http(s) URL".into(),
            ));
        }
        if self.thumbnails.max_height == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.max_height must be non-zero".into(),
            ));
        }
        if self.server.format_suffix.contains('/') {
            return Err(ConfigError::Validation(
                "server.format_suffix must not contain '/'".into(),
            ));
        }
        Ok(())
    }
}

fn is_absolute_http(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Mount point of the IIIF routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Absolute URL every route is resolved under.
    pub base_url: String,
    /// Suffix appended to every route path, e.g. `.json`.
    pub format_suffix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/iiif".to_string(),
            format_suffix: String::new(),
        }
    }
}

/// Location of uploaded files on the IIIF image server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageServerConfig {
    /// Image server base; identifiers are appended directly.
    pub url: String,
    /// Bucket holding uploaded files.
    pub bucket: String,
    /// Key prefix of uploads within the bucket.
    pub key_prefix: String,
}

impl Default for ImageServerConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000/loris/".to_string(),
            bucket: "media-management".to_string(),
            key_prefix: "media".to_string(),
        }
    }
}

/// Thumbnail size computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// Thumbnails taller than this are scaled down, preserving aspect ratio.
    pub max_height: u32,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self { max_height: 200 }
    }
}

/// JSON output formatting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Emit 4-space indented JSON with sorted keys instead of compact JSON.
    pub pretty: bool,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel export workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ServiceConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ServiceConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ServiceConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(dir: &Path) -> Result<ServiceConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# media-iiif Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# IIIF routes
# ---------------------------------------------------------------------------
[server]
# Absolute URL the IIIF routes are mounted under. Every "@id" in generated
# documents starts with this.
base_url = "http://localhost:8000/api/iiif"

# Suffix appended to route paths. Set to ".json" when serving the output of
# `media-iiif export` from a static file server.
format_suffix = ""

# ---------------------------------------------------------------------------
# IIIF image server
# ---------------------------------------------------------------------------
[image_server]
# Base URL of the IIIF Image API server. The percent-encoded file
# identifier is appended directly, so keep the trailing slash.
url = "http://localhost:8000/loris/"

# Bucket and key prefix the image server resolves identifiers against.
bucket = "media-management"
key_prefix = "media"

# ---------------------------------------------------------------------------
# Thumbnails
# ---------------------------------------------------------------------------
[thumbnails]
# Thumbnails are scaled down to this height, preserving aspect ratio.
max_height = 200

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Indented (4 spaces), key-sorted JSON. Handy while debugging.
pretty = false

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel export workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_server_settings() {
        let config = ServiceConfig::default();
        assert_eq!(config.server.base_url, "http://localhost:8000/api/iiif");
        assert_eq!(config.server.format_suffix, "");
    }

    #[test]
    fn default_config_has_image_server_settings() {
        let config = ServiceConfig::default();
        assert_eq!(config.image_server.url, "http://localhost:8000/loris/");
        assert_eq!(config.image_server.bucket, "media-management");
        assert_eq!(config.image_server.key_prefix, "media");
        assert_eq!(config.thumbnails.max_height, 200);
        assert!(!config.output.pretty);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[server]
base_url = "https://media.example.edu/api/iiif"
"#;
        let config: ServiceConfig = toml::from_str(toml).unwrap();
        // Overridden value
        assert_eq!(config.server.base_url, "https://media.example.edu/api/iiif");
        // Default values preserved
        assert_eq!(config.server.format_suffix, "");
        assert_eq!(config.image_server.bucket, "media-management");
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.server.base_url, "http://localhost:8000/api/iiif");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[image_server]
url = "https://images.example.edu/iiif/2/"

[output]
pretty = true
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.image_server.url, "https://images.example.edu/iiif/2/");
        assert!(config.output.pretty);
        // Unspecified values should be defaults
        assert_eq!(config.image_server.key_prefix, "media");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn stock_config_toml_parses_to_defaults() {
        let config: ServiceConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = ServiceConfig::default();
        assert_eq!(config.server.base_url, defaults.server.base_url);
        assert_eq!(config.image_server.url, defaults.image_server.url);
        assert_eq!(config.thumbnails.max_height, defaults.thumbnails.max_height);
        assert_eq!(config.processing.max_processes, None);
    }

    // =========================================================================
    // effective_threads tests
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let config = ProcessingConfig {
            max_processes: None,
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[server]
base_url = "http://a"
format_suffix = ""
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[server]
format_suffix = ".json"
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let server = merged.get("server").unwrap();
        assert_eq!(server.get("format_suffix").unwrap().as_str(), Some(".json"));
        // base_url preserved from base
        assert_eq!(server.get("base_url").unwrap().as_str(), Some("http://a"));
    }

    #[test]
    fn merge_toml_scalar_replaces_table() {
        let base: toml::Value = toml::from_str("[output]\npretty = false").unwrap();
        let overlay: toml::Value = toml::from_str("output = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("output").unwrap().as_integer(), Some(3));
    }

    // =========================================================================
    // Unknown key rejection and validation tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[server]
base_ulr = "http://localhost"
"#;
        let result: Result<ServiceConfig, _> = toml::from_str(toml_str);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<ServiceConfig, _> = toml::from_str("[servr]\nbase_url = \"x\"");
        assert!(result.is_err());
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(ServiceConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_relative_base_url() {
        let mut config = ServiceConfig::default();
        config.server.base_url = "/api/iiif".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validate_zero_thumbnail_height() {
        let mut config = ServiceConfig::default();
        config.thumbnails.max_height = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_suffix_with_slash() {
        let mut config = ServiceConfig::default();
        config.server.format_suffix = "/index.json".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[image_server]\nurl = \"loris/\"\n",
        )
        .unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
