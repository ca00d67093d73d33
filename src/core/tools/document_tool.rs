// =============================================================================
// TOOL DISPATCH
// =============================================================================
//
// The four agent-facing operations, independent of any transport. A call is
// handled in two steps so that argument problems are reported before any
// remote work (and before credentials are even needed):
//
// 1. `ToolCall::prepare` checks the path, its extension and the format.
// 2. `ToolCall::run` locates the document and extracts its text.

use std::fmt;

use super::tool_error::ToolError;
use crate::core::drive::DriveApi;
use crate::core::extraction::{DocumentReader, ExportFormat};
use crate::core::locator::DocumentLocator;
use crate::core::paths::{parse_virtual_path, DocumentKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentTool {
    ReadDocument,
    ReadSpreadsheet,
    ReadPresentation,
    Export,
}

impl DocumentTool {
    pub fn name(self) -> &'static str {
        match self {
            DocumentTool::ReadDocument => "read_google_doc",
            DocumentTool::ReadSpreadsheet => "read_google_sheets",
            DocumentTool::ReadPresentation => "read_google_slides",
            DocumentTool::Export => "export_google_document",
        }
    }

    /// The kind a typed read insists on. The export accepts any kind.
    pub fn required_kind(self) -> Option<DocumentKind> {
        match self {
            DocumentTool::ReadDocument => Some(DocumentKind::Document),
            DocumentTool::ReadSpreadsheet => Some(DocumentKind::Spreadsheet),
            DocumentTool::ReadPresentation => Some(DocumentKind::Presentation),
            DocumentTool::Export => None,
        }
    }

    /// Text placed in front of every successful reply.
    pub fn banner(self, format: ExportFormat) -> String {
        match self.required_kind() {
            Some(kind) => format!("{} Content:\n\n", kind.label()),
            None => format!("Exported Document ({}):\n\n", format),
        }
    }

    /// The text returned to the agent when this tool fails.
    pub fn error_reply(self, error: &ToolError) -> String {
        format!("Error executing tool '{}': {}", self.name(), error)
    }
}

impl fmt::Display for DocumentTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated tool invocation, ready to run against a client.
#[derive(Debug, Clone)]
pub struct ToolCall {
    tool: DocumentTool,
    path: String,
    format: ExportFormat,
}

impl ToolCall {
    /// Validates the arguments. Never touches the network.
    pub fn prepare(
        tool: DocumentTool,
        path: &str,
        format: Option<&str>,
    ) -> Result<Self, ToolError> {
        if path.trim().is_empty() {
            return Err(ToolError::Configuration(
                "document_name_in_filesystem is required".to_string(),
            ));
        }

        match (tool.required_kind(), parse_virtual_path(path)) {
            (None, result) => {
                result?;
            }
            (Some(required), Ok(parsed)) if parsed.kind == required => {}
            (Some(required), _) => {
                return Err(ToolError::Configuration(format!(
                    "File must be a {} file",
                    required.extension()
                )))
            }
        }

        let format = match format {
            Some(f) => f.parse::<ExportFormat>()?,
            None => ExportFormat::default(),
        };

        Ok(Self {
            tool,
            path: path.to_string(),
            format,
        })
    }

    /// Finds the document and returns the bannered reply text.
    pub async fn run<C: DriveApi + ?Sized>(&self, client: &C) -> Result<String, ToolError> {
        tracing::info!("Processing document: {}", self.path);

        let id = DocumentLocator::new(client)
            .locate(&self.path)
            .await?
            .ok_or_else(|| ToolError::NotFound(self.path.clone()))?;
        tracing::info!("Extracted document ID: {}", id);

        let reader = DocumentReader::new(client);
        let content = match self.tool.required_kind() {
            Some(kind) => reader.read(kind, &id).await?,
            None => {
                tracing::info!("Exporting document to {} format", self.format);
                reader.export(&id, self.format).await?
            }
        };

        tracing::info!(
            "Successfully ran {}, returning {} characters",
            self.tool,
            content.len()
        );
        Ok(format!("{}{}", self.tool.banner(self.format), content))
    }
}
