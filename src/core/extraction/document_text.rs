// Flattens a Docs body into plain text. Paragraphs become their text runs,
// tables become `| cell | cell |` lines, and cells are flattened with the
// same rules (so tables nested in cells work).

use crate::core::drive::{Block, Document, TableCell};

/// Returned instead of an empty string when a document has no text.
pub const EMPTY_DOCUMENT: &str = "Document is empty.";

fn block_text(block: &Block) -> String {
    match block {
        Block::Paragraph(paragraph) => paragraph
            .elements
            .iter()
            .filter_map(|element| element.text_run.as_ref())
            .map(|run| run.content.as_str())
            .collect(),
        Block::Table(table) => table
            .table_rows
            .iter()
            .map(|row| {
                let cells: Vec<String> = row.table_cells.iter().map(cell_text).collect();
                format!("| {} |\n", cells.join(" | "))
            })
            .collect(),
        Block::Other => String::new(),
    }
}

fn cell_text(cell: &TableCell) -> String {
    let text: String = cell.content.iter().map(block_text).collect();
    text.trim().to_string()
}

/// Joins the text of every non-blank top-level block with newlines.
pub fn flatten_document(document: &Document) -> String {
    let parts: Vec<String> = document
        .body
        .content
        .iter()
        .map(block_text)
        .filter(|text| !text.trim().is_empty())
        .collect();

    let text = parts.join("\n");
    if text.trim().is_empty() {
        EMPTY_DOCUMENT.to_string()
    } else {
        text
    }
}
