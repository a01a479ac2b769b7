use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use streamlens_core::pipeline::PipelineConfig;

pub const DEFAULT_SOURCE_TABLE: &str = "workspace.default.popular_spotify_songs";
pub const DEFAULT_OUTPUT_TABLE: &str = "workspace.default.spotify_streams_analysis_final";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    pub root: PathBuf,
    pub source_table: String,
    pub output_table: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("catalog"),
            source_table: DEFAULT_SOURCE_TABLE.to_string(),
            output_table: DEFAULT_OUTPUT_TABLE.to_string(),
        }
    }
}

impl AppConfig {
    /// Loads the TOML config; a missing file means all defaults apply.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("failed to parse config {}", path.display()))
    }
}
