// =============================================================================
// GOOGLE API CLIENT
// =============================================================================
//
// The process-wide client handle: one authenticated session shared by four
// thin sub-clients, one per Google API we read from.
//
// | Sub-client      | API          | Calls                                  |
// |-----------------|--------------|----------------------------------------|
// | `DriveFilesApi` | Drive v3     | `files.list`, `files.get`              |
// | `DocsApi`       | Docs v1      | `documents.get`                        |
// | `SheetsApi`     | Sheets v4    | `spreadsheets.get`, `values.get`       |
// | `SlidesApi`     | Slides v1    | `presentations.get`                    |
//
// Each call is a single GET with a bearer token. There are no retries.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::credentials::{AuthError, CredentialSources};
use super::oauth::OAuthSession;
use super::token_store::TokenFile;
use crate::core::drive::{
    Document, DriveApi, DriveError, DriveFile, Presentation, Spreadsheet, ValueRange,
};

/// Fields requested for every Drive file or folder.
const FILE_FIELDS: &str = "id, name, mimeType, parents";

/// Root URLs of the four APIs.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub drive: String,
    pub docs: String,
    pub sheets: String,
    pub slides: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            drive: "https://www.googleapis.com/drive/v3".to_string(),
            docs: "https://docs.googleapis.com/v1".to_string(),
            sheets: "https://sheets.googleapis.com/v4".to_string(),
            slides: "https://slides.googleapis.com/v1".to_string(),
        }
    }
}

/// `{base}/{segments...}?{query}`, with every segment percent-encoded.
fn endpoint_url(base: &str, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, DriveError> {
    let mut url = Url::parse(base).map_err(|e| DriveError::Transport(format!("{}: {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| DriveError::Transport(format!("{} cannot be a base URL", base)))?
        .pop_if_empty()
        .extend(segments);
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

// =============================================================================
// SESSION
// =============================================================================

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    error: GoogleErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    #[serde(default)]
    message: String,
}

/// Turns a failed response into a `DriveError`, preferring the message Google
/// puts in its JSON error body.
fn api_error(status: u16, body: &str) -> DriveError {
    let message = serde_json::from_str::<GoogleErrorBody>(body)
        .ok()
        .map(|parsed| parsed.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());
    DriveError::Api { status, message }
}

/// The authenticated HTTP session every sub-client shares.
pub struct ApiSession {
    http: Client,
    auth: OAuthSession,
}

impl ApiSession {
    pub fn new(http: Client, auth: OAuthSession) -> Self {
        Self { http, auth }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, DriveError> {
        let token = self
            .auth
            .access_token()
            .await
            .map_err(|e| DriveError::Auth(e.to_string()))?;

        tracing::debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| DriveError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DriveError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| DriveError::Decode(e.to_string()))
    }
}

// =============================================================================
// SUB-CLIENTS
// =============================================================================

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

pub struct DriveFilesApi {
    session: Arc<ApiSession>,
    base: String,
}

impl DriveFilesApi {
    pub async fn list(&self, query: &str, page_size: u32) -> Result<Vec<DriveFile>, DriveError> {
        let page_size = page_size.to_string();
        let fields = format!("files({})", FILE_FIELDS);
        let url = endpoint_url(
            &self.base,
            &["files"],
            &[
                ("q", query),
                ("pageSize", page_size.as_str()),
                ("fields", fields.as_str()),
            ],
        )?;
        let list: FileList = self.session.get_json(url).await?;
        Ok(list.files)
    }

    pub async fn get(&self, file_id: &str) -> Result<DriveFile, DriveError> {
        let url = endpoint_url(&self.base, &["files", file_id], &[("fields", FILE_FIELDS)])?;
        self.session.get_json(url).await
    }
}

pub struct DocsApi {
    session: Arc<ApiSession>,
    base: String,
}

impl DocsApi {
    pub async fn get(&self, document_id: &str) -> Result<Document, DriveError> {
        let url = endpoint_url(&self.base, &["documents", document_id], &[])?;
        self.session.get_json(url).await
    }
}

pub struct SheetsApi {
    session: Arc<ApiSession>,
    base: String,
}

impl SheetsApi {
    pub async fn get(&self, spreadsheet_id: &str) -> Result<Spreadsheet, DriveError> {
        let url = endpoint_url(
            &self.base,
            &["spreadsheets", spreadsheet_id],
            &[("fields", "properties.title,sheets.properties.title")],
        )?;
        self.session.get_json(url).await
    }

    pub async fn values(&self, spreadsheet_id: &str, range: &str) -> Result<ValueRange, DriveError> {
        let url = endpoint_url(
            &self.base,
            &["spreadsheets", spreadsheet_id, "values", range],
            &[],
        )?;
        self.session.get_json(url).await
    }
}

pub struct SlidesApi {
    session: Arc<ApiSession>,
    base: String,
}

impl SlidesApi {
    pub async fn get(&self, presentation_id: &str) -> Result<Presentation, DriveError> {
        let url = endpoint_url(&self.base, &["presentations", presentation_id], &[])?;
        self.session.get_json(url).await
    }
}

// =============================================================================
// CLIENT HANDLE
// =============================================================================

/// One signed-in session and the four API clients built on it.
pub struct GoogleApis {
    pub drive: DriveFilesApi,
    pub docs: DocsApi,
    pub sheets: SheetsApi,
    pub slides: SlidesApi,
}

impl GoogleApis {
    pub fn new(session: ApiSession, endpoints: Endpoints) -> Self {
        let session = Arc::new(session);
        Self {
            drive: DriveFilesApi {
                session: Arc::clone(&session),
                base: endpoints.drive,
            },
            docs: DocsApi {
                session: Arc::clone(&session),
                base: endpoints.docs,
            },
            sheets: SheetsApi {
                session: Arc::clone(&session),
                base: endpoints.sheets,
            },
            slides: SlidesApi {
                session,
                base: endpoints.slides,
            },
        }
    }

    /// Resolves credentials, signs in (interactively if needed) and builds
    /// the client.
    pub async fn connect(sources: &CredentialSources) -> Result<Self, AuthError> {
        tracing::info!("Initializing Google Drive client...");
        let secrets = sources.resolve()?;

        tracing::info!("Authenticating with Google using OAuth2...");
        let http = Client::new();
        let auth = OAuthSession::establish(secrets, TokenFile::from_env(), http.clone()).await?;

        tracing::info!("Google Drive client initialized successfully");
        Ok(Self::new(ApiSession::new(http, auth), Endpoints::default()))
    }
}

#[async_trait]
impl DriveApi for GoogleApis {
    async fn list_files(&self, query: &str, page_size: u32) -> Result<Vec<DriveFile>, DriveError> {
        self.drive.list(query, page_size).await
    }

    async fn get_file(&self, file_id: &str) -> Result<DriveFile, DriveError> {
        self.drive.get(file_id).await
    }

    async fn get_document(&self, document_id: &str) -> Result<Document, DriveError> {
        self.docs.get(document_id).await
    }

    async fn get_spreadsheet(&self, spreadsheet_id: &str) -> Result<Spreadsheet, DriveError> {
        self.sheets.get(spreadsheet_id).await
    }

    async fn get_sheet_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<ValueRange, DriveError> {
        self.sheets.values(spreadsheet_id, range).await
    }

    async fn get_presentation(&self, presentation_id: &str) -> Result<Presentation, DriveError> {
        self.slides.get(presentation_id).await
    }
}
