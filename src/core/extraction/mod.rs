// Text extraction for the three document kinds plus the probing export.

pub mod document_reader;
pub mod document_text;
pub mod presentation_text;
pub mod spreadsheet_text;

pub use document_reader::{DocumentReader, ExportFormat, ExtractError};
