use polars::prelude::DataFrame;
use serde::Deserialize;
use tracing::{info, warn};

use crate::aggregates::{self, AggregateReport};
use crate::columns::{sanitize_columns, ColumnRoles, RoleOverrides};
use crate::derive::{with_month_label, with_streams_millions};
use crate::error::Result;
use crate::outliers::{filter_excluded_artists, DEFAULT_EXCLUDED_ARTISTS};
use crate::segment::{streams_high_distribution, with_streams_high, HIGH_STREAMS_THRESHOLD};
use crate::streams::normalize_streams;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub excluded_artists: Vec<String>,
    pub high_streams_threshold: f64,
    pub top_artists_limit: u32,
    pub audio_profile_artists: usize,
    pub columns: RoleOverrides,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            excluded_artists: DEFAULT_EXCLUDED_ARTISTS
                .iter()
                .map(|name| name.to_string())
                .collect(),
            high_streams_threshold: HIGH_STREAMS_THRESHOLD,
            top_artists_limit: 10,
            audio_profile_artists: 5,
            columns: RoleOverrides::default(),
        }
    }
}

#[derive(Debug)]
pub struct PipelineOutput {
    /// The final annotated table, ready to persist.
    pub table: DataFrame,
    pub roles: ColumnRoles,
    pub aggregates: AggregateReport,
    pub high_streams_counts: DataFrame,
    pub rows_loaded: usize,
    pub rows_unparsable: usize,
    pub rows_excluded: usize,
}

/// Runs the full cleaning and aggregation chain over one snapshot of the
/// source table. Each stage consumes its input and hands a new frame to the
/// next; nothing feeds back except the top-artists view, which the audio
/// profile reuses for its leader filter.
pub fn run(source: DataFrame, config: &PipelineConfig) -> Result<PipelineOutput> {
    let rows_loaded = source.height();
    let table = sanitize_columns(&source)?;

    let roles = ColumnRoles::resolve(&table, &config.columns)?;
    info!(?roles, "resolved column roles");

    let table = normalize_streams(&table, &roles.streams)?;
    let rows_unparsable = rows_loaded - table.height();
    if rows_unparsable > 0 {
        info!(
            dropped = rows_unparsable,
            "dropped rows with unparsable stream counts"
        );
    }

    let table = with_streams_millions(&table, &roles.streams)?;

    let (table, rows_excluded) = match roles.artist.as_deref() {
        Some(artist_col) => {
            let filtered = filter_excluded_artists(&table, artist_col, &config.excluded_artists)?;
            let removed = table.height() - filtered.height();
            if removed > 0 {
                info!(removed, "removed deny-listed artists");
            }
            (filtered, removed)
        }
        None => {
            warn!("no artist column located; skipping the outlier filter");
            (table, 0)
        }
    };

    let table = match roles.released_month.as_deref() {
        Some(month_col) => with_month_label(&table, month_col)?,
        None => {
            warn!("no released_month column located; skipping the month label");
            table
        }
    };

    let aggregates = build_aggregates(&table, &roles, config)?;

    let table = with_streams_high(&table, &roles.streams, config.high_streams_threshold)?;
    let high_streams_counts = streams_high_distribution(&table)?;

    info!(rows = table.height(), "pipeline finished");
    Ok(PipelineOutput {
        table,
        roles,
        aggregates,
        high_streams_counts,
        rows_loaded,
        rows_unparsable,
        rows_excluded,
    })
}

fn build_aggregates(
    table: &DataFrame,
    roles: &ColumnRoles,
    config: &PipelineConfig,
) -> Result<AggregateReport> {
    let stream_summary = aggregates::stream_summary(table, &roles.streams)?;

    let top_artists = match roles.artist.as_deref() {
        Some(artist_col) => Some(aggregates::top_artists(
            table,
            artist_col,
            &roles.streams,
            config.top_artists_limit,
        )?),
        None => {
            warn!("no artist column located; skipping artist aggregates");
            None
        }
    };

    let track_streams = match (roles.artist.as_deref(), roles.track.as_deref()) {
        (Some(artist_col), Some(track_col)) => {
            Some(aggregates::track_streams(table, artist_col, track_col)?)
        }
        _ => None,
    };

    let streams_by_year = match roles.released_year.as_deref() {
        Some(year_col) => Some(aggregates::streams_by_year(table, year_col, &roles.streams)?),
        None => None,
    };

    let tracks_by_year = match roles.released_year.as_deref() {
        Some(year_col) => Some(aggregates::tracks_by_year(table, year_col)?),
        None => None,
    };

    let tracks_by_month = match roles.released_month.as_deref() {
        Some(_) => Some(aggregates::tracks_by_month(table)?),
        None => None,
    };

    let tracks_by_day = match roles.released_day.as_deref() {
        Some(day_col) => Some(aggregates::tracks_by_day(table, day_col)?),
        None => None,
    };

    let audio_profiles = match (roles.artist.as_deref(), top_artists.as_ref()) {
        (Some(artist_col), Some(top)) if !roles.audio_features.is_empty() => {
            Some(aggregates::audio_profiles(
                table,
                artist_col,
                &roles.audio_features,
                top,
                config.audio_profile_artists,
            )?)
        }
        (Some(_), Some(_)) => {
            warn!("no audio feature columns located; skipping audio profiles");
            None
        }
        _ => None,
    };

    Ok(AggregateReport {
        stream_summary,
        top_artists,
        track_streams,
        streams_by_year,
        tracks_by_year,
        tracks_by_month,
        tracks_by_day,
        audio_profiles,
    })
}
