//! Configuration for the trip productivity report

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use trip_productivity::Resources;

// =============================================================================
// File-based Configuration (config.toml)
// =============================================================================

/// Configuration loaded from config.toml
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub resources: Resources,
    #[serde(default)]
    pub report: ReportDefaults,
}

/// Where the record collections are loaded from
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    /// One `<resource>.json` file per collection
    Files {
        #[serde(default = "default_data_dir")]
        data_dir: PathBuf,
    },
    /// Back-office REST store
    Rest {
        base_url: String,
        #[serde(default)]
        api_token: Option<String>,
    },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Files {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

/// Report defaults, overridable from the command line
#[derive(Debug, Deserialize)]
pub struct ReportDefaults {
    #[serde(default = "default_include_closed")]
    pub include_closed: bool,
}

impl Default for ReportDefaults {
    fn default() -> Self {
        Self {
            include_closed: default_include_closed(),
        }
    }
}

fn default_include_closed() -> bool {
    true
}

impl FileConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content).with_context(|| {
            format!(
                "Failed to parse {}. Check for:\n\
                 - An unknown [source] kind (expected \"files\" or \"rest\")\n\
                 - A missing base_url for kind = \"rest\"\n\
                 - Invalid TOML syntax (missing quotes, brackets, etc.)",
                path.display()
            )
        })
    }

    /// Load the config file if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

// =============================================================================
// Runtime Configuration
// =============================================================================

/// File config with command-line overrides applied
#[derive(Debug)]
pub struct Config {
    pub source: SourceConfig,
    pub resources: Resources,
    pub include_closed: bool,
}

impl Config {
    /// Create config from file config. A `--base-url` override wins over `--data-dir`.
    pub fn from_file(
        file_config: FileConfig,
        data_dir: Option<PathBuf>,
        base_url: Option<String>,
    ) -> Self {
        let source = match (base_url, data_dir, file_config.source) {
            (Some(base_url), _, SourceConfig::Rest { api_token, .. }) => {
                SourceConfig::Rest { base_url, api_token }
            }
            (Some(base_url), _, SourceConfig::Files { .. }) => SourceConfig::Rest {
                base_url,
                api_token: None,
            },
            (None, Some(data_dir), _) => SourceConfig::Files { data_dir },
            (None, None, source) => source,
        };

        Self {
            source,
            resources: file_config.resources,
            include_closed: file_config.report.include_closed,
        }
    }
}
