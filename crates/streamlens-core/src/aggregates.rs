use std::collections::HashSet;

use polars::prelude::*;

use crate::derive::{format_millions, MONTH_LABEL, STREAMS_MILLIONS};

/// Read-only grouped views derived from the cleaned table. `None` means the
/// view was skipped because a column it needs could not be located.
#[derive(Debug, Clone)]
pub struct AggregateReport {
    pub stream_summary: DataFrame,
    pub top_artists: Option<DataFrame>,
    pub track_streams: Option<DataFrame>,
    pub streams_by_year: Option<DataFrame>,
    pub tracks_by_year: Option<DataFrame>,
    pub tracks_by_month: Option<DataFrame>,
    pub tracks_by_day: Option<DataFrame>,
    pub audio_profiles: Option<DataFrame>,
}

/// Descriptive statistics over the streams column.
pub fn stream_summary(df: &DataFrame, streams_col: &str) -> Result<DataFrame, PolarsError> {
    let streams = df.column(streams_col)?.f64()?;
    df!(
        "statistic" => &["count", "mean", "stddev", "min", "max"],
        "value" => &[
            (streams.len() - streams.null_count()) as f64,
            streams.mean().unwrap_or(f64::NAN),
            streams.std(1).unwrap_or(f64::NAN),
            streams.min().unwrap_or(f64::NAN),
            streams.max().unwrap_or(f64::NAN),
        ],
    )
}

/// Summed streams per artist, descending, cut to `limit` rows. Exact ties
/// keep the stable engine order so reruns are deterministic.
pub fn top_artists(
    df: &DataFrame,
    artist_col: &str,
    streams_col: &str,
    limit: u32,
) -> Result<DataFrame, PolarsError> {
    let mut totals = df
        .clone()
        .lazy()
        .group_by_stable([col(artist_col)])
        .agg([col(streams_col).sum().alias("streams_total")])
        .sort(
            ["streams_total"],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )
        .limit(limit)
        .collect()?;

    let labels: StringChunked = totals
        .column("streams_total")?
        .f64()?
        .into_iter()
        .map(|opt| opt.map(format_millions))
        .collect();
    totals.with_column(labels.into_series().with_name(STREAMS_MILLIONS.into()))?;
    Ok(totals)
}

/// Slim per-row projection for dispersion charts; no aggregation involved.
pub fn track_streams(
    df: &DataFrame,
    artist_col: &str,
    track_col: &str,
) -> Result<DataFrame, PolarsError> {
    df.select([artist_col, track_col, STREAMS_MILLIONS])
}

/// Summed streams per release year, ascending.
pub fn streams_by_year(
    df: &DataFrame,
    year_col: &str,
    streams_col: &str,
) -> Result<DataFrame, PolarsError> {
    df.clone()
        .lazy()
        .group_by_stable([col(year_col)])
        .agg([col(streams_col).sum().alias("streams_total")])
        .sort(
            [year_col],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()
}

/// Track count per release year, ascending.
pub fn tracks_by_year(df: &DataFrame, year_col: &str) -> Result<DataFrame, PolarsError> {
    count_by(df, year_col)
}

/// Track count per month label. The label string sorts chronologically by
/// construction.
pub fn tracks_by_month(df: &DataFrame) -> Result<DataFrame, PolarsError> {
    count_by(df, MONTH_LABEL)
}

/// Track count per release day of month, ascending.
pub fn tracks_by_day(df: &DataFrame, day_col: &str) -> Result<DataFrame, PolarsError> {
    count_by(df, day_col)
}

/// Mean of every audio-feature column per artist, restricted to the first
/// `profile_limit` rows of the already-ordered top-artists view. The leaders
/// are taken as-is, never re-ranked.
pub fn audio_profiles(
    df: &DataFrame,
    artist_col: &str,
    audio_cols: &[String],
    top_artists: &DataFrame,
    profile_limit: usize,
) -> Result<DataFrame, PolarsError> {
    let head = top_artists.column(artist_col)?.str()?;
    let take = profile_limit.min(head.len());
    let mut leaders: HashSet<&str> = HashSet::with_capacity(take);
    for idx in 0..take {
        if let Some(name) = head.get(idx) {
            leaders.insert(name);
        }
    }

    let artists = df.column(artist_col)?.str()?;
    let mask: BooleanChunked = artists
        .into_iter()
        .map(|opt| opt.is_some_and(|name| leaders.contains(name)))
        .collect();
    let restricted = df.filter(&mask)?;

    let means: Vec<Expr> = audio_cols
        .iter()
        .map(|name| col(name.as_str()).mean())
        .collect();

    restricted
        .lazy()
        .group_by_stable([col(artist_col)])
        .agg(means)
        .collect()
}

fn count_by(df: &DataFrame, key: &str) -> Result<DataFrame, PolarsError> {
    df.clone()
        .lazy()
        .group_by_stable([col(key)])
        .agg([len().alias("track_count")])
        .sort(
            [key],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()
}
