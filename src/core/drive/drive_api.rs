// The port through which core logic talks to Google. The infra layer provides
// the HTTP implementation; tests provide in-memory fakes.

use async_trait::async_trait;
use thiserror::Error;

use super::drive_models::{Document, DriveFile, Presentation, Spreadsheet, ValueRange};

/// Errors raised by a single remote call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DriveError {
    #[error("Google API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Request to Google failed: {0}")]
    Transport(String),

    #[error("Unexpected response from Google: {0}")]
    Decode(String),

    #[error("Authentication failed: {0}")]
    Auth(String),
}

/// The remote operations the locator and extractors need: one Drive listing
/// call, one Drive metadata call and one fetch per document kind.
///
/// Every call is a network round trip. Nothing is cached behind this trait.
#[async_trait]
pub trait DriveApi: Send + Sync {
    /// Runs a Drive `files.list` query and returns the first page only.
    async fn list_files(&self, query: &str, page_size: u32) -> Result<Vec<DriveFile>, DriveError>;

    /// Fetches `id, name, mimeType, parents` of one file or folder.
    async fn get_file(&self, file_id: &str) -> Result<DriveFile, DriveError>;

    async fn get_document(&self, document_id: &str) -> Result<Document, DriveError>;

    async fn get_spreadsheet(&self, spreadsheet_id: &str) -> Result<Spreadsheet, DriveError>;

    /// Fetches the cell grid of one A1 range.
    async fn get_sheet_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<ValueRange, DriveError>;

    async fn get_presentation(&self, presentation_id: &str) -> Result<Presentation, DriveError>;
}
