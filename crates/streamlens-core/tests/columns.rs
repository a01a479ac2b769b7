use polars::prelude::*;
use streamlens_core::columns::{sanitize_columns, sanitize_name, ColumnRoles, RoleOverrides};
use streamlens_core::error::PipelineError;

#[test]
fn sanitize_replaces_each_disallowed_char_with_one_underscore() {
    assert_eq!(sanitize_name("artist(s)_name"), "artist_s__name");
    assert_eq!(sanitize_name("track name"), "track_name");
    assert_eq!(sanitize_name("a b\tc"), "a_b_c");
    assert_eq!(sanitize_name("streams"), "streams");

    // one underscore per disallowed character, so character count is preserved
    let raw = "x-y=z, [w]";
    assert_eq!(sanitize_name(raw).chars().count(), raw.chars().count());
    assert!(sanitize_name(raw)
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_'));
}

#[test]
fn sanitize_is_idempotent() {
    let once = sanitize_name("artist(s) name");
    assert_eq!(sanitize_name(&once), once);
}

#[test]
fn sanitize_columns_preserves_order_and_cardinality() -> PolarsResult<()> {
    let df = df!(
        "artist(s) name" => &["A"],
        "track name" => &["t"],
        "streams" => &["1"],
    )?;

    let clean = sanitize_columns(&df).expect("sanitization succeeded");
    let names: Vec<String> = clean
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(names, vec!["artist_s__name", "track_name", "streams"]);
    Ok(())
}

#[test]
fn sanitize_columns_surfaces_collisions_instead_of_merging() -> PolarsResult<()> {
    let df = df!(
        "a b" => &[1i64],
        "a_b" => &[2i64],
    )?;

    let err = sanitize_columns(&df).expect_err("collision must be an error");
    assert!(matches!(err, PipelineError::Validation(_)));
    Ok(())
}

fn wide_frame() -> DataFrame {
    df!(
        "artist_s__name" => &["A"],
        "track_name" => &["t"],
        "streams" => &["1"],
        "released_year" => &[2020i64],
        "released_month" => &[1i64],
        "released_day" => &[5i64],
        "danceability__" => &[50i64],
        "energy__" => &[60i64],
    )
    .unwrap()
}

#[test]
fn roles_fall_back_to_substring_search() {
    let roles = ColumnRoles::resolve(&wide_frame(), &RoleOverrides::default()).expect("resolved");

    assert_eq!(roles.streams, "streams");
    assert_eq!(roles.artist.as_deref(), Some("artist_s__name"));
    assert_eq!(roles.track.as_deref(), Some("track_name"));
    assert_eq!(roles.released_year.as_deref(), Some("released_year"));
    assert_eq!(roles.released_month.as_deref(), Some("released_month"));
    assert_eq!(roles.released_day.as_deref(), Some("released_day"));
    assert_eq!(roles.audio_features, vec!["danceability__", "energy__"]);
}

#[test]
fn explicit_role_mapping_beats_the_heuristic() -> PolarsResult<()> {
    let df = df!(
        "artist_alias" => &["alias"],
        "artist_s__name" => &["A"],
        "streams" => &["1"],
    )?;

    let overrides = RoleOverrides {
        artist: Some("artist_s__name".to_string()),
        ..RoleOverrides::default()
    };
    let roles = ColumnRoles::resolve(&df, &overrides).expect("resolved");
    assert_eq!(roles.artist.as_deref(), Some("artist_s__name"));

    // the heuristic alone would have picked the first match
    let heuristic = ColumnRoles::resolve(&df, &RoleOverrides::default()).expect("resolved");
    assert_eq!(heuristic.artist.as_deref(), Some("artist_alias"));
    Ok(())
}

#[test]
fn explicit_role_mapping_must_name_an_existing_column() {
    let overrides = RoleOverrides {
        artist: Some("no_such_column".to_string()),
        ..RoleOverrides::default()
    };
    let err = ColumnRoles::resolve(&wide_frame(), &overrides).expect_err("must fail");
    assert!(matches!(err, PipelineError::Validation(_)));
}

#[test]
fn missing_streams_column_is_fatal() -> PolarsResult<()> {
    let df = df!("artist_s__name" => &["A"])?;
    let err = ColumnRoles::resolve(&df, &RoleOverrides::default()).expect_err("must fail");
    assert!(matches!(err, PipelineError::Validation(_)));
    Ok(())
}

#[test]
fn missing_optional_roles_resolve_to_none() -> PolarsResult<()> {
    let df = df!("streams" => &["1"])?;
    let roles = ColumnRoles::resolve(&df, &RoleOverrides::default()).expect("resolved");

    assert!(roles.artist.is_none());
    assert!(roles.track.is_none());
    assert!(roles.released_year.is_none());
    assert!(roles.audio_features.is_empty());
    Ok(())
}
