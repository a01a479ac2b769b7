use polars::prelude::*;

pub const STREAMS_MILLIONS: &str = "streams_millions";
pub const MONTH_LABEL: &str = "released_month_full_label";

/// Month labels carry the zero-padded number so that lexicographic order
/// equals calendar order on chart axes.
pub const MONTH_LABELS: [&str; 12] = [
    "01-Janvier",
    "02-Février",
    "03-Mars",
    "04-Avril",
    "05-Mai",
    "06-Juin",
    "07-Juillet",
    "08-Août",
    "09-Septembre",
    "10-Octobre",
    "11-Novembre",
    "12-Décembre",
];

/// Total over any month value: 1-11 map to their label, everything else
/// (including 12, nulls and out-of-range values) collapses into December.
/// The catch-all matches the upstream dataset's `otherwise` branch and is
/// intentional, not a validation gap.
pub fn month_label(month: Option<i32>) -> &'static str {
    match month {
        Some(m @ 1..=11) => MONTH_LABELS[(m - 1) as usize],
        _ => MONTH_LABELS[11],
    }
}

/// Formats a stream count in millions with one decimal and thousands
/// separators in the integer part, e.g. 1_200_000.0 -> "1.2".
pub fn format_millions(streams: f64) -> String {
    group_thousands(&format!("{:.1}", streams / 1_000_000.0))
}

fn group_thousands(formatted: &str) -> String {
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted, ""));
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(formatted.len() + digits.len() / 3);
    grouped.push_str(sign);
    for (idx, c) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if !frac_part.is_empty() {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}

/// Adds the display-formatted `streams_millions` column. The result is text
/// for reporting, not a numeric column for further arithmetic.
pub fn with_streams_millions(df: &DataFrame, streams_col: &str) -> Result<DataFrame, PolarsError> {
    let streams = df.column(streams_col)?.f64()?;
    let labels: StringChunked = streams
        .into_iter()
        .map(|opt| opt.map(format_millions))
        .collect();

    let mut output = df.clone();
    output.with_column(labels.into_series().with_name(STREAMS_MILLIONS.into()))?;
    Ok(output)
}

/// Adds the calendar-ordered `released_month_full_label` column.
pub fn with_month_label(df: &DataFrame, month_col: &str) -> Result<DataFrame, PolarsError> {
    let months = df.column(month_col)?.cast(&DataType::Int32)?;
    let labels: StringChunked = months
        .i32()?
        .into_iter()
        .map(|opt| Some(month_label(opt)))
        .collect();

    let mut output = df.clone();
    output.with_column(labels.into_series().with_name(MONTH_LABEL.into()))?;
    Ok(output)
}
