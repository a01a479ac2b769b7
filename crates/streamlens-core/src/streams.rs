use polars::prelude::*;

/// Strips every character that is not an ASCII digit or a decimal point and
/// parses the remainder as a float. Empty remainders and strings with more
/// than one decimal point fail to parse.
pub fn parse_stream_count(raw: &str) -> Option<f64> {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<f64>().ok()
}

/// Coerces the streams column to Float64 and drops rows whose value could not
/// be parsed. The raw string form is not retained; the drop is permanent.
pub fn normalize_streams(df: &DataFrame, streams_col: &str) -> Result<DataFrame, PolarsError> {
    let raw = df.column(streams_col)?;

    let values: Float64Chunked = match raw.dtype() {
        DataType::String => raw
            .str()?
            .into_iter()
            .map(|opt| opt.and_then(parse_stream_count))
            .collect(),
        _ => raw.cast(&DataType::Float64)?.f64()?.clone(),
    };

    let mut output = df.clone();
    output.with_column(values.into_series().with_name(streams_col.into()))?;

    let mask = output.column(streams_col)?.f64()?.is_not_null();
    output.filter(&mask)
}
