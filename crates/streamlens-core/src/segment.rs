use polars::prelude::*;

pub const STREAMS_HIGH: &str = "streams_high";
pub const HIGH_STREAMS_THRESHOLD: f64 = 70_000_000.0;

/// Flags rows at or above the threshold with 1 and everything else with 0.
/// A null stream count cannot reach the threshold and lands in bucket 0.
pub fn with_streams_high(
    df: &DataFrame,
    streams_col: &str,
    threshold: f64,
) -> Result<DataFrame, PolarsError> {
    let streams = df.column(streams_col)?.f64()?;
    let flags: Int32Chunked = streams
        .into_iter()
        .map(|opt| Some(i32::from(opt.is_some_and(|value| value >= threshold))))
        .collect();

    let mut output = df.clone();
    output.with_column(flags.into_series().with_name(STREAMS_HIGH.into()))?;
    Ok(output)
}

/// Row counts per bucket, low bucket first. The buckets partition the table:
/// the two counts always sum to its height.
pub fn streams_high_distribution(df: &DataFrame) -> Result<DataFrame, PolarsError> {
    df.clone()
        .lazy()
        .group_by_stable([col(STREAMS_HIGH)])
        .agg([len().alias("track_count")])
        .sort(
            [STREAMS_HIGH],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()
}
