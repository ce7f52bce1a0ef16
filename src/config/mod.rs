use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::collector::{ScanFilter, DEFAULT_EXCLUDES};
use crate::error::Result;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = ".sigma-index.toml";

/// Top-level configuration from `.sigma-index.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory of rule files to scan.
    #[serde(default)]
    pub source: Option<PathBuf>,
    /// Where the JSON index is written.
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Directory names skipped anywhere in a path.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub follow_links: bool,
    #[serde(default)]
    pub pretty: bool,
}

fn default_exclude() -> Vec<String> {
    DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: None,
            output: None,
            exclude: default_exclude(),
            follow_links: false,
            pretty: false,
        }
    }
}

/// Values given on the command line, applied on top of a loaded config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub source: Option<PathBuf>,
    pub output: Option<PathBuf>,
    /// Added to the configured exclusions, never replacing them.
    pub exclude: Vec<String>,
    pub follow_links: bool,
    pub pretty: bool,
}

impl Config {
    /// Load config from a TOML file. Returns default if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Layer command-line values over this config.
    ///
    /// Paths given on the command line win, excludes accumulate and the
    /// boolean switches can only be turned on.
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(source) = overrides.source {
            self.source = Some(source);
        }
        if let Some(output) = overrides.output {
            self.output = Some(output);
        }
        self.exclude.extend(overrides.exclude);
        self.follow_links |= overrides.follow_links;
        self.pretty |= overrides.pretty;
    }

    /// Build the walk filter this config describes.
    pub fn scan_filter(&self) -> ScanFilter {
        ScanFilter::new(self.exclude.iter().cloned()).with_follow_links(self.follow_links)
    }

    /// Generate a starter config file.
    pub fn starter_toml() -> &'static str {
        r#"# sigma-index configuration

# Directory containing the Sigma rules to index.
# source = "../sigma"

# Output file for the JSON index.
# output = "data/rules.json"

# Directory names excluded at any depth. `--exclude` adds to this list.
exclude = ["regression_data", "tests", ".git", ".github"]

# Follow symbolic links while walking the source tree.
follow_links = false

# Indent the JSON output.
pretty = false
"#
    }
}
