// =============================================================================
// MCP SERVER
// =============================================================================
//
// Exposes the four document tools over MCP. This layer only decodes
// arguments and wraps replies; the work happens in `core::tools`.
//
// Failures are returned as error results carrying the message text, never as
// protocol errors, so the agent always gets something it can show the user.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;

use crate::core::tools::{ClientGate, DocumentTool, ToolCall, ToolError};
use crate::infra::google::{CredentialSources, GoogleApis};

#[derive(Clone)]
pub struct DriveDocsServer {
    /// Built on first use; sign-in may be interactive.
    client: Arc<ClientGate<GoogleApis>>,
    credentials: Arc<CredentialSources>,
    tool_router: ToolRouter<Self>,
}

impl DriveDocsServer {
    pub fn new(credentials: CredentialSources) -> Self {
        Self {
            client: Arc::new(ClientGate::new()),
            credentials: Arc::new(credentials),
            tool_router: Self::tool_router(),
        }
    }

    async fn execute(
        &self,
        tool: DocumentTool,
        path: &str,
        format: Option<&str>,
    ) -> Result<String, ToolError> {
        let call = ToolCall::prepare(tool, path, format)?;

        if !self.client.is_initialized() {
            tracing::debug!("No Google client yet; signing in before {}", tool);
        }
        let credentials = Arc::clone(&self.credentials);
        let client = self
            .client
            .get_or_init(|| async move { GoogleApis::connect(&credentials).await })
            .await?;

        call.run(client.as_ref()).await
    }

    async fn reply(&self, tool: DocumentTool, path: &str, format: Option<&str>) -> CallToolResult {
        tracing::info!("Tool called: {} with document: {}", tool, path);

        match self.execute(tool, path, format).await {
            Ok(text) => CallToolResult::success(vec![Content::text(text)]),
            Err(e) => {
                let message = tool.error_reply(&e);
                tracing::error!("{}", message);
                CallToolResult::error(vec![Content::text(message)])
            }
        }
    }
}

#[tool_handler]
impl ServerHandler for DriveDocsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("Reads Google Docs, Sheets and Slides that appear as .gdoc, .gsheet and .gslides files on the Google Drive virtual drive. Always pass the FULL filesystem path (drive letter, folders and file name), e.g. 'G:\\My Drive\\Projects\\Document.gdoc'.".into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }
}

// ============================================================================
// Tool Input Schemas
// ============================================================================

// The path defaults to empty when omitted so the call still reaches the tool
// and gets a readable error; the schema keeps advertising it as required.

#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[schemars(extend("required" = ["document_name_in_filesystem"]))]
pub struct DocumentRequest {
    /// Full virtual-drive path of the document
    #[serde(default)]
    #[schemars(
        description = "REQUIRED: The FULL filesystem path to the file, including drive letter and all folder names. Example: 'G:\\My Drive\\Projects\\Aideia\\Document.gdoc' or 'u:\\My Drive\\Folder\\Subfolder\\MyDocument.gdoc'. Do NOT provide just the filename - the complete path is required."
    )]
    pub document_name_in_filesystem: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[schemars(extend("required" = ["document_name_in_filesystem"]))]
pub struct ExportRequest {
    /// Full virtual-drive path of the document
    #[serde(default)]
    #[schemars(
        description = "REQUIRED: The FULL filesystem path to the Google Drive document file (.gdoc, .gsheet or .gslides), including drive letter and all folder names. Do NOT provide just the filename - the complete path is required."
    )]
    pub document_name_in_filesystem: String,

    /// Output format (default: markdown)
    #[schemars(
        description = "Export format: 'markdown', 'text', 'csv' (for sheets). Default: 'markdown'",
        extend("enum" = ["markdown", "text", "csv"], "default" = "markdown")
    )]
    pub format: Option<String>,
}

// ============================================================================
// Tools
// ============================================================================

#[tool_router]
impl DriveDocsServer {
    #[tool(description = "Read content from a Google Doc (.gdoc) file accessible via the Windows virtual drive. REQUIRES THE FULL FILESYSTEM PATH, not just the filename (e.g., 'G:\\My Drive\\Projects\\Document.gdoc').")]
    pub async fn read_google_doc(
        &self,
        Parameters(request): Parameters<DocumentRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .reply(DocumentTool::ReadDocument, &request.document_name_in_filesystem, None)
            .await)
    }

    #[tool(description = "Read content from a Google Sheet (.gsheet) file accessible via the Windows virtual drive. REQUIRES THE FULL FILESYSTEM PATH, not just the filename (e.g., 'G:\\My Drive\\Projects\\Spreadsheet.gsheet').")]
    pub async fn read_google_sheets(
        &self,
        Parameters(request): Parameters<DocumentRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .reply(DocumentTool::ReadSpreadsheet, &request.document_name_in_filesystem, None)
            .await)
    }

    #[tool(description = "Read content from a Google Slides (.gslides) file accessible via the Windows virtual drive. REQUIRES THE FULL FILESYSTEM PATH, not just the filename (e.g., 'G:\\My Drive\\Projects\\Presentation.gslides').")]
    pub async fn read_google_slides(
        &self,
        Parameters(request): Parameters<DocumentRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .reply(DocumentTool::ReadPresentation, &request.document_name_in_filesystem, None)
            .await)
    }

    #[tool(description = "Export a Google Drive document (.gdoc, .gsheet, or .gslides) to markdown or other formats. REQUIRES THE FULL FILESYSTEM PATH, not just the filename. The path must include the drive letter, folder structure, and filename.")]
    pub async fn export_google_document(
        &self,
        Parameters(request): Parameters<ExportRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .reply(
                DocumentTool::Export,
                &request.document_name_in_filesystem,
                request.format.as_deref(),
            )
            .await)
    }
}
