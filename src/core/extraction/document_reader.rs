// =============================================================================
// DOCUMENT READER
// =============================================================================
//
// Turns a resolved Drive id into text. Typed reads trust the caller's kind;
// the generic export probes the Docs, Sheets and Slides APIs in that order
// and renders whichever one accepts the id.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::document_text::flatten_document;
use super::presentation_text::flatten_presentation;
use super::spreadsheet_text::render_spreadsheet;
use crate::core::drive::{DriveApi, DriveError};
use crate::core::paths::DocumentKind;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Error reading {kind}: {source}")]
    Fetch {
        kind: DocumentKind,
        #[source]
        source: DriveError,
    },

    #[error("Unable to determine document type for ID: {0}")]
    UnknownType(String),

    #[error("Unsupported export format: '{0}'. Use one of: markdown, text, csv")]
    UnknownFormat(String),
}

// =============================================================================
// EXPORT FORMAT
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Markdown,
    Text,
    Csv,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "markdown",
            ExportFormat::Text => "text",
            ExportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" => Ok(ExportFormat::Markdown),
            "text" => Ok(ExportFormat::Text),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(ExtractError::UnknownFormat(s.to_string())),
        }
    }
}

/// Converts the pipe-table lines of rendered text into CSV rows. Only lines
/// that start and end with `|` are kept; every cell is trimmed and quoted.
pub fn table_to_csv(text: &str) -> String {
    text.lines()
        .filter(|line| line.len() >= 2 && line.starts_with('|') && line.ends_with('|'))
        .map(|line| {
            line[1..line.len() - 1]
                .split('|')
                .map(|cell| format!("\"{}\"", cell.trim().replace('"', "\"\"")))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// READER
// =============================================================================

pub struct DocumentReader<'a, C: DriveApi + ?Sized> {
    client: &'a C,
}

impl<'a, C: DriveApi + ?Sized> DocumentReader<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Reads `id` as a document of the given kind.
    pub async fn read(&self, kind: DocumentKind, id: &str) -> Result<String, ExtractError> {
        let text = self
            .render(kind, id)
            .await
            .map_err(|source| ExtractError::Fetch { kind, source })?;

        tracing::info!("Successfully read {} ({} characters)", kind, text.len());
        Ok(text)
    }

    /// Reads `id` without knowing its kind. The first API that accepts the id
    /// decides; only spreadsheets are converted when `format` is CSV, the
    /// other kinds always come back as text.
    pub async fn export(&self, id: &str, format: ExportFormat) -> Result<String, ExtractError> {
        for kind in DocumentKind::PROBE_ORDER {
            match self.render(kind, id).await {
                Ok(text) => {
                    tracing::info!("Exporting {} as {} ({})", id, kind, format);
                    return Ok(match (kind, format) {
                        (DocumentKind::Spreadsheet, ExportFormat::Csv) => table_to_csv(&text),
                        _ => text,
                    });
                }
                Err(e) => tracing::debug!("{} is not a {}: {}", id, kind, e),
            }
        }

        Err(ExtractError::UnknownType(id.to_string()))
    }

    /// Fetches the payload of one kind and flattens it. Spreadsheets cost an
    /// extra values request per tab.
    async fn render(&self, kind: DocumentKind, id: &str) -> Result<String, DriveError> {
        let text = match kind {
            DocumentKind::Document => {
                let document = self.client.get_document(id).await?;
                tracing::info!("Retrieved document: {}", document.title);
                flatten_document(&document)
            }
            DocumentKind::Spreadsheet => {
                let spreadsheet = self.client.get_spreadsheet(id).await?;
                tracing::info!(
                    "Retrieved spreadsheet: {} ({} sheets)",
                    spreadsheet.title(),
                    spreadsheet.sheets.len()
                );
                render_spreadsheet(self.client, id, &spreadsheet).await
            }
            DocumentKind::Presentation => {
                let presentation = self.client.get_presentation(id).await?;
                tracing::info!(
                    "Retrieved presentation: {} ({} slides)",
                    presentation.title(),
                    presentation.slides.len()
                );
                flatten_presentation(&presentation)
            }
        };
        Ok(text)
    }
}
