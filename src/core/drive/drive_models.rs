// =============================================================================
// REMOTE OBJECT SCHEMAS
// =============================================================================
//
// Typed views of the Drive, Docs, Sheets and Slides payloads we read. Only
// the fields the extractors use are modelled. Every field that Google may
// omit carries `#[serde(default)]` (or is an `Option`), so a missing field
// always reads as empty rather than failing the whole document.

use serde::Deserialize;

// -----------------------------------------------------------------------------
// Drive
// -----------------------------------------------------------------------------

/// A file or folder as listed by the Drive v3 `files` resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mime_type: String,
    /// Drive may report several parents; only the first one is ever followed.
    #[serde(default)]
    pub parents: Vec<String>,
}

impl DriveFile {
    pub fn first_parent(&self) -> Option<&str> {
        self.parents.first().map(String::as_str)
    }
}

// -----------------------------------------------------------------------------
// Docs
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: Body,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Body {
    #[serde(default)]
    pub content: Vec<Block>,
}

/// One structural element of a document body or table cell.
///
/// The API sends an object with at most one of `paragraph`, `table`,
/// `sectionBreak`, `tableOfContents`... set. We collapse that into a sum type
/// so extraction can `match` instead of probing optional fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawStructuralElement")]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
    /// Section breaks, tables of contents and anything else without text we read.
    Other,
}

#[derive(Deserialize)]
struct RawStructuralElement {
    paragraph: Option<Paragraph>,
    table: Option<Table>,
}

impl From<RawStructuralElement> for Block {
    fn from(raw: RawStructuralElement) -> Self {
        match (raw.paragraph, raw.table) {
            (Some(paragraph), _) => Block::Paragraph(paragraph),
            (None, Some(table)) => Block::Table(table),
            (None, None) => Block::Other,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub elements: Vec<ParagraphElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphElement {
    pub text_run: Option<TextRun>,
}

/// A run of text with uniform style. Shared by Docs and Slides.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TextRun {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default)]
    pub table_rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    #[serde(default)]
    pub table_cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TableCell {
    #[serde(default)]
    pub content: Vec<Block>,
}

// -----------------------------------------------------------------------------
// Sheets
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spreadsheet {
    #[serde(default)]
    pub properties: SpreadsheetProperties,
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

impl Spreadsheet {
    pub fn title(&self) -> &str {
        self.properties.title.as_deref().unwrap_or("Untitled")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpreadsheetProperties {
    pub title: Option<String>,
}

/// One tab of a spreadsheet.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sheet {
    #[serde(default)]
    pub properties: SheetProperties,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SheetProperties {
    #[serde(default)]
    pub title: String,
}

/// Result of `spreadsheets.values.get`. Trailing empty rows and cells are
/// omitted by the API, so rows can be ragged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValueRange {
    #[serde(default)]
    pub values: Vec<Vec<serde_json::Value>>,
}

impl ValueRange {
    /// Converts the cell grid to strings: strings as-is, numbers and booleans
    /// as their JSON text, null as empty.
    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect()
    }
}

fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

// -----------------------------------------------------------------------------
// Slides
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    pub title: Option<String>,
    #[serde(default)]
    pub slides: Vec<Page>,
}

impl Presentation {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default)]
    pub page_elements: Vec<PageElement>,
}

/// A page element; only shapes carry text we extract (images, tables, lines
/// and groups are skipped).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageElement {
    pub shape: Option<Shape>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Shape {
    pub text: Option<TextContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    #[serde(default)]
    pub text_elements: Vec<TextElement>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    pub text_run: Option<TextRun>,
}
