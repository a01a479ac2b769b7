use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::Table;
use polars::prelude::*;

const PREVIEW_ROWS: usize = 12;

/// Renders the head of a frame as a console table.
pub fn render(df: &DataFrame) -> Result<String, PolarsError> {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(
        df.get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect::<Vec<_>>(),
    );

    let rows = df.height().min(PREVIEW_ROWS);
    for idx in 0..rows {
        let mut cells = Vec::with_capacity(df.width());
        for column in df.get_columns() {
            cells.push(display_value(column.get(idx)?));
        }
        table.add_row(cells);
    }

    Ok(table.to_string())
}

fn display_value(value: AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}
