// In-memory `DriveApi` used by tests across the core layer. Every call is
// recorded so tests can assert which round trips happened.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use dashmap::DashMap;

use super::drive_api::{DriveApi, DriveError};
use super::drive_models::{Document, DriveFile, Presentation, Spreadsheet, ValueRange};

#[derive(Default)]
pub struct FakeDrive {
    listing: Vec<DriveFile>,
    list_error: Option<DriveError>,
    files: HashMap<String, DriveFile>,
    failing_files: HashSet<String>,
    documents: HashMap<String, Document>,
    spreadsheets: HashMap<String, Spreadsheet>,
    values: HashMap<String, ValueRange>,
    failing_ranges: HashSet<String>,
    presentations: HashMap<String, Presentation>,
    calls: DashMap<String, usize>,
}

fn not_found(id: &str) -> DriveError {
    DriveError::Api {
        status: 404,
        message: format!("File not found: {}", id),
    }
}

pub fn file(id: &str, name: &str, mime_type: &str, parent: Option<&str>) -> DriveFile {
    DriveFile {
        id: id.to_string(),
        name: name.to_string(),
        mime_type: mime_type.to_string(),
        parents: parent.map(|p| vec![p.to_string()]).unwrap_or_default(),
    }
}

impl FakeDrive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files returned by every `list_files` call, in order.
    pub fn with_listing(mut self, files: Vec<DriveFile>) -> Self {
        for f in &files {
            self.files.insert(f.id.clone(), f.clone());
        }
        self.listing = files;
        self
    }

    pub fn with_list_error(mut self, error: DriveError) -> Self {
        self.list_error = Some(error);
        self
    }

    /// Registers a folder reachable through `get_file`.
    pub fn with_folder(mut self, id: &str, name: &str, parent: Option<&str>) -> Self {
        self.files.insert(
            id.to_string(),
            file(id, name, "application/vnd.google-apps.folder", parent),
        );
        self
    }

    pub fn with_file(mut self, f: DriveFile) -> Self {
        self.files.insert(f.id.clone(), f);
        self
    }

    pub fn with_failing_file(mut self, id: &str) -> Self {
        self.failing_files.insert(id.to_string());
        self
    }

    pub fn with_document(mut self, id: &str, document: Document) -> Self {
        self.documents.insert(id.to_string(), document);
        self
    }

    pub fn with_spreadsheet(mut self, id: &str, spreadsheet: Spreadsheet) -> Self {
        self.spreadsheets.insert(id.to_string(), spreadsheet);
        self
    }

    pub fn with_values(mut self, range: &str, values: ValueRange) -> Self {
        self.values.insert(range.to_string(), values);
        self
    }

    pub fn with_failing_range(mut self, range: &str) -> Self {
        self.failing_ranges.insert(range.to_string());
        self
    }

    pub fn with_presentation(mut self, id: &str, presentation: Presentation) -> Self {
        self.presentations.insert(id.to_string(), presentation);
        self
    }

    /// How many times a call key (e.g. `get_file:abc`) was made.
    pub fn calls_to(&self, key: &str) -> usize {
        self.calls.get(key).map(|count| *count).unwrap_or(0)
    }

    /// Every recorded call key, for debugging failed assertions.
    pub fn call_keys(&self) -> Vec<String> {
        self.calls.iter().map(|entry| entry.key().clone()).collect()
    }

    fn record(&self, key: String) {
        *self.calls.entry(key).or_insert(0) += 1;
    }
}

#[async_trait]
impl DriveApi for FakeDrive {
    async fn list_files(&self, query: &str, page_size: u32) -> Result<Vec<DriveFile>, DriveError> {
        self.record(format!("list_files:{}", query));
        if let Some(error) = &self.list_error {
            return Err(error.clone());
        }
        Ok(self
            .listing
            .iter()
            .take(page_size as usize)
            .cloned()
            .collect())
    }

    async fn get_file(&self, file_id: &str) -> Result<DriveFile, DriveError> {
        self.record(format!("get_file:{}", file_id));
        if self.failing_files.contains(file_id) {
            return Err(DriveError::Transport("connection reset".to_string()));
        }
        self.files.get(file_id).cloned().ok_or_else(|| not_found(file_id))
    }

    async fn get_document(&self, document_id: &str) -> Result<Document, DriveError> {
        self.record(format!("get_document:{}", document_id));
        self.documents
            .get(document_id)
            .cloned()
            .ok_or_else(|| not_found(document_id))
    }

    async fn get_spreadsheet(&self, spreadsheet_id: &str) -> Result<Spreadsheet, DriveError> {
        self.record(format!("get_spreadsheet:{}", spreadsheet_id));
        self.spreadsheets
            .get(spreadsheet_id)
            .cloned()
            .ok_or_else(|| not_found(spreadsheet_id))
    }

    async fn get_sheet_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<ValueRange, DriveError> {
        self.record(format!("get_sheet_values:{}:{}", spreadsheet_id, range));
        if self.failing_ranges.contains(range) {
            return Err(DriveError::Api {
                status: 400,
                message: format!("Unable to parse range: {}", range),
            });
        }
        Ok(self.values.get(range).cloned().unwrap_or_default())
    }

    async fn get_presentation(&self, presentation_id: &str) -> Result<Presentation, DriveError> {
        self.record(format!("get_presentation:{}", presentation_id));
        self.presentations
            .get(presentation_id)
            .cloned()
            .ok_or_else(|| not_found(presentation_id))
    }
}
