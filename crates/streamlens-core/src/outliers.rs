use std::collections::HashSet;

use polars::prelude::*;

/// Artists whose catalog-wide totals distort the aggregates.
pub const DEFAULT_EXCLUDED_ARTISTS: [&str; 2] =
    ["Edison Lighthouse", "Carin Leon, Grupo Frontera"];

/// Removes every row whose artist exactly equals one of the deny-listed
/// names. Matching is exact string equality; null artists never match and
/// are retained.
pub fn filter_excluded_artists(
    df: &DataFrame,
    artist_col: &str,
    excluded: &[String],
) -> Result<DataFrame, PolarsError> {
    let denied: HashSet<&str> = excluded.iter().map(String::as_str).collect();
    let artists = df.column(artist_col)?.str()?;

    let mask: BooleanChunked = artists
        .into_iter()
        .map(|opt| match opt {
            Some(name) => !denied.contains(name),
            None => true,
        })
        .collect();

    df.filter(&mask)
}
