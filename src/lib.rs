//! sigma-index: builds a static JSON index of Sigma detection rules.
//!
//! Walks a rule repository, pulls title, id, status, level, dates and the
//! `logsource` block out of every `.yml`/`.yaml` file with line-oriented
//! matching, and writes one JSON document for search and browsing tools.
//!
//! # Quick Start
//!
//! ```no_run
//! use sigmaindex::{build_index, write_index, config::Config, IndexOptions};
//!
//! let options = IndexOptions::from_config(&Config::default()).unwrap();
//! let index = build_index(&options).unwrap();
//! let path = write_index(&index, &options).unwrap();
//! println!("Wrote {} rules to {}", index.count(), path.display());
//! ```

pub mod collector;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod parser;

use std::path::{Path, PathBuf};

use collector::ScanFilter;
use config::Config;
use error::{IndexError, Result};
use model::IndexDocument;

/// Fully resolved options for one indexing run.
#[derive(Debug, Clone)]
pub struct IndexOptions {
    pub source_dir: PathBuf,
    pub output_path: PathBuf,
    pub filter: ScanFilter,
    pub pretty: bool,
}

impl IndexOptions {
    /// Resolve options from a config, filling in built-in defaults.
    pub fn from_config(config: &Config) -> Result<Self> {
        let source_dir = match &config.source {
            Some(source) => source.clone(),
            None => default_source()?,
        };
        let output_path = match &config.output {
            Some(output) => output.clone(),
            None => default_output()?,
        };

        Ok(Self {
            source_dir,
            output_path,
            filter: config.scan_filter(),
            pretty: config.pretty,
        })
    }
}

/// Directory holding the running executable. Both default paths hang off it.
pub fn tool_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| IndexError::Config(format!("cannot locate directory of {}", exe.display())))
}

/// `../sigma` relative to [`tool_dir`].
pub fn default_source() -> Result<PathBuf> {
    Ok(tool_dir()?.join("..").join("sigma"))
}

/// `data/rules.json` inside [`tool_dir`].
pub fn default_output() -> Result<PathBuf> {
    Ok(tool_dir()?.join("data").join("rules.json"))
}

/// Scan the source directory and assemble the index.
///
/// Fails only when the source directory does not exist; individual files
/// that cannot be read are left out.
pub fn build_index(options: &IndexOptions) -> Result<IndexDocument> {
    let source_dir = resolve_source(&options.source_dir)?;
    tracing::info!(source = %source_dir.display(), "scanning rules");

    let rules = collector::collect_rules(&source_dir, &options.filter);
    tracing::info!(count = rules.len(), "scan complete");

    Ok(IndexDocument::new(
        source_dir.to_string_lossy().into_owned(),
        rules,
    ))
}

/// Write a built index to the configured output path.
pub fn write_index(index: &IndexDocument, options: &IndexOptions) -> Result<PathBuf> {
    output::write(index, &options.output_path, options.pretty)
}

fn resolve_source(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        let shown = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        return Err(IndexError::SourceNotFound(shown));
    }
    Ok(path.canonicalize()?)
}
