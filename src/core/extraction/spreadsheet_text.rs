// Renders every tab of a spreadsheet as a pipe table. Each tab costs one
// values request; a tab that fails to load gets a placeholder and the rest
// are still read.

use crate::core::drive::{DriveApi, Spreadsheet};

/// Fixed window read from every tab. Cells outside it are not extracted.
pub const SHEET_RANGE: &str = "A1:Z1000";

pub const EMPTY_SHEET: &str = "(Empty sheet)";
pub const UNREADABLE_SHEET: &str = "(Unable to read sheet data)";

/// A1 range covering `SHEET_RANGE` on the named tab. The title is always
/// quoted so names with spaces or punctuation stay valid.
pub fn sheet_range(title: &str) -> String {
    format!("'{}'!{}", title.replace('\'', "''"), SHEET_RANGE)
}

/// One `| a | b |` line per row, with short rows padded by empty cells to the
/// width of the widest row.
pub fn render_rows(rows: &[Vec<String>]) -> Vec<String> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    rows.iter()
        .map(|row| {
            let mut cells: Vec<&str> = row.iter().map(String::as_str).collect();
            cells.resize(width, "");
            format!("| {} |", cells.join(" | "))
        })
        .collect()
}

/// Reads the values of every tab of an already fetched spreadsheet.
pub async fn render_spreadsheet<C: DriveApi + ?Sized>(
    client: &C,
    spreadsheet_id: &str,
    spreadsheet: &Spreadsheet,
) -> String {
    let mut parts = vec![format!("Spreadsheet: {}\n", spreadsheet.title())];

    for sheet in &spreadsheet.sheets {
        let title = &sheet.properties.title;
        parts.push(format!("\n## Sheet: {}\n", title));

        match client
            .get_sheet_values(spreadsheet_id, &sheet_range(title))
            .await
        {
            Ok(values) => {
                let rows = values.into_rows();
                if rows.is_empty() {
                    parts.push(EMPTY_SHEET.to_string());
                } else {
                    parts.extend(render_rows(&rows));
                }
            }
            Err(e) => {
                tracing::warn!("Error reading sheet '{}': {}", title, e);
                parts.push(UNREADABLE_SHEET.to_string());
            }
        }
    }

    parts.join("\n")
}
