use std::collections::HashMap;

use polars::prelude::*;
use serde::Deserialize;

use crate::error::{PipelineError, Result};

pub const AUDIO_FEATURE_KEYWORDS: [&str; 6] = [
    "danceability",
    "energy",
    "acousticness",
    "instrumentalness",
    "liveness",
    "valence",
];

/// Replaces every character outside the alphanumeric set with exactly one
/// underscore. Idempotent: already-clean names pass through unchanged.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Renames all columns through `sanitize_name`, preserving order and
/// cardinality. Two distinct names collapsing to the same clean name is a
/// validation error, never a silent merge.
pub fn sanitize_columns(df: &DataFrame) -> Result<DataFrame> {
    let mut seen: HashMap<String, String> = HashMap::new();
    let mut renames: Vec<(String, String)> = Vec::new();

    for name in df.get_column_names() {
        let clean = sanitize_name(name.as_str());
        if let Some(previous) = seen.get(&clean) {
            return Err(PipelineError::Validation(format!(
                "columns {:?} and {:?} both sanitize to {:?}",
                previous,
                name.as_str(),
                clean
            )));
        }
        seen.insert(clean.clone(), name.as_str().to_string());
        if clean != name.as_str() {
            renames.push((name.as_str().to_string(), clean));
        }
    }

    let mut output = df.clone();
    for (old, new) in renames {
        output.rename(&old, new.into())?;
    }
    Ok(output)
}

/// Explicit role-to-column assignments from configuration. Any role left
/// unset falls back to the substring heuristic in [`ColumnRoles::resolve`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoleOverrides {
    pub artist: Option<String>,
    pub track: Option<String>,
    pub streams: Option<String>,
    pub released_year: Option<String>,
    pub released_month: Option<String>,
    pub released_day: Option<String>,
    pub audio_features: Vec<String>,
}

/// The logical columns the pipeline operates on, located once before any
/// stage runs. Stages that need an unresolved optional role are skipped.
#[derive(Debug, Clone)]
pub struct ColumnRoles {
    pub streams: String,
    pub artist: Option<String>,
    pub track: Option<String>,
    pub released_year: Option<String>,
    pub released_month: Option<String>,
    pub released_day: Option<String>,
    pub audio_features: Vec<String>,
}

impl ColumnRoles {
    /// Resolves each role against the sanitized column names. An explicit
    /// assignment must name an existing column or the run fails; unset roles
    /// take the first column whose name contains the role keyword. The
    /// streams role is the only required one.
    pub fn resolve(df: &DataFrame, overrides: &RoleOverrides) -> Result<Self> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.as_str().to_string())
            .collect();

        let streams = resolve_role(&names, overrides.streams.as_deref(), "streams")?
            .ok_or_else(|| {
                PipelineError::Validation(
                    "no streams column found; set [pipeline.columns] streams in the config".into(),
                )
            })?;

        let artist = resolve_role(&names, overrides.artist.as_deref(), "artist")?;
        let track = resolve_role(&names, overrides.track.as_deref(), "track")?;
        let released_year = resolve_role(&names, overrides.released_year.as_deref(), "released_year")?;
        let released_month =
            resolve_role(&names, overrides.released_month.as_deref(), "released_month")?;
        let released_day = resolve_role(&names, overrides.released_day.as_deref(), "released_day")?;

        let audio_features = if overrides.audio_features.is_empty() {
            names
                .iter()
                .filter(|name| {
                    AUDIO_FEATURE_KEYWORDS
                        .iter()
                        .any(|keyword| name.starts_with(keyword))
                })
                .cloned()
                .collect()
        } else {
            for name in &overrides.audio_features {
                if !names.iter().any(|candidate| candidate == name) {
                    return Err(PipelineError::Validation(format!(
                        "configured audio feature column {:?} does not exist in the source table",
                        name
                    )));
                }
            }
            overrides.audio_features.clone()
        };

        Ok(Self {
            streams,
            artist,
            track,
            released_year,
            released_month,
            released_day,
            audio_features,
        })
    }
}

fn resolve_role(names: &[String], explicit: Option<&str>, keyword: &str) -> Result<Option<String>> {
    if let Some(explicit) = explicit {
        if names.iter().any(|name| name == explicit) {
            return Ok(Some(explicit.to_string()));
        }
        return Err(PipelineError::Validation(format!(
            "configured {} column {:?} does not exist in the source table",
            keyword, explicit
        )));
    }

    Ok(names.iter().find(|name| name.contains(keyword)).cloned())
}
