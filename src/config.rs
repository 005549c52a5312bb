//! Configuration management for the dictionary tools
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (idd-grammar.toml)
//! - Environment variables (IDD_GRAMMAR__*)
//!
//! ## Example config file (idd-grammar.toml):
//! ```toml
//! [scan]
//! extensions = ["idd"]
//! skip_prefixes = ["target/", ".git/"]
//! follow_links = false
//!
//! [output]
//! format = "pretty"
//! show_groups = true
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrammarConfig {
    /// Directory scan settings
    #[serde(default)]
    pub scan: ScanConfig,

    /// Report output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Directory scan configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// File extensions treated as dictionaries (without the dot)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Skip files whose path relative to the scan root starts with one of these
    #[serde(default = "default_skip_prefixes")]
    pub skip_prefixes: Vec<String>,

    /// Follow symbolic links while walking directories
    #[serde(default)]
    pub follow_links: bool,
}

/// Report output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format (pretty or compact)
    #[serde(default)]
    pub format: OutputFormat,

    /// Print group meanings when listing patterns
    #[serde(default = "default_true")]
    pub show_groups: bool,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

impl OutputFormat {
    pub fn to_json<T: Serialize>(&self, value: &T) -> serde_json::Result<String> {
        match self {
            Self::Pretty => serde_json::to_string_pretty(value),
            Self::Compact => serde_json::to_string(value),
        }
    }
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_extensions() -> Vec<String> {
    vec!["idd".to_string()]
}

fn default_skip_prefixes() -> Vec<String> {
    vec!["target/".to_string(), ".git/".to_string()]
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            skip_prefixes: default_skip_prefixes(),
            follow_links: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Pretty,
            show_groups: true,
        }
    }
}

impl ScanConfig {
    /// Whether a path has one of the configured dictionary extensions
    pub fn is_dictionary(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }

    /// Whether a relative path falls under one of the skipped prefixes
    pub fn is_skipped(&self, relative: &Path) -> bool {
        let relative = relative.to_string_lossy().replace('\\', "/");
        self.skip_prefixes.iter().any(|p| relative.starts_with(p.as_str()))
    }
}

impl GrammarConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = [
            "idd-grammar.toml",
            ".idd-grammar.toml",
            "config/idd-grammar.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "idd-grammar") {
            let xdg_config = config_dir.config_dir().join("idd-grammar.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (IDD_GRAMMAR__*)
        builder = builder.add_source(
            Environment::with_prefix("IDD_GRAMMAR")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}
