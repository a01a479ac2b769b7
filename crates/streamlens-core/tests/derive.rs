use std::collections::HashSet;

use polars::prelude::*;
use streamlens_core::derive::{
    format_millions, month_label, with_month_label, with_streams_millions, MONTH_LABEL,
    STREAMS_MILLIONS,
};

#[test]
fn month_labels_are_injective_and_order_preserving_for_1_to_11() {
    let labels: Vec<&str> = (1..=11).map(|m| month_label(Some(m))).collect();

    let distinct: HashSet<&&str> = labels.iter().collect();
    assert_eq!(distinct.len(), 11);

    let mut sorted = labels.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, labels, "lexicographic order must equal calendar order");
    assert_eq!(labels[0], "01-Janvier");
    assert_eq!(labels[10], "11-Novembre");
}

#[test]
fn every_value_outside_1_to_11_collapses_into_december() {
    // documented fallback behavior, not a validated range check
    assert_eq!(month_label(Some(12)), "12-Décembre");
    assert_eq!(month_label(Some(0)), "12-Décembre");
    assert_eq!(month_label(Some(13)), "12-Décembre");
    assert_eq!(month_label(Some(-3)), "12-Décembre");
    assert_eq!(month_label(None), "12-Décembre");
}

#[test]
fn formats_streams_in_millions_with_one_decimal() {
    assert_eq!(format_millions(1_200_000.0), "1.2");
    assert_eq!(format_millions(500.0), "0.0");
    assert_eq!(format_millions(70_000_000.0), "70.0");
    assert_eq!(format_millions(14_921_890_000.0), "14,921.9");
    assert_eq!(format_millions(999_950_000.0), "1,000.0");
}

#[test]
fn streams_millions_is_display_text() -> PolarsResult<()> {
    let df = df!("streams" => &[1_200_000.0f64, 703_800_000.0])?;

    let out = with_streams_millions(&df, "streams")?;
    let labels = out.column(STREAMS_MILLIONS)?.str()?;
    assert_eq!(labels.get(0), Some("1.2"));
    assert_eq!(labels.get(1), Some("703.8"));
    Ok(())
}

#[test]
fn month_label_column_follows_the_mapping() -> PolarsResult<()> {
    let df = df!("released_month" => &[1i64, 9, 12, 13])?;

    let out = with_month_label(&df, "released_month")?;
    let labels = out.column(MONTH_LABEL)?.str()?;
    assert_eq!(labels.get(0), Some("01-Janvier"));
    assert_eq!(labels.get(1), Some("09-Septembre"));
    assert_eq!(labels.get(2), Some("12-Décembre"));
    assert_eq!(labels.get(3), Some("12-Décembre"));
    Ok(())
}
