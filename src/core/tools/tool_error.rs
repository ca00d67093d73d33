use thiserror::Error;

use crate::core::extraction::ExtractError;
use crate::core::locator::LocateError;
use crate::core::paths::PathError;

/// Everything a tool call can fail with, reduced to four kinds. Each kind has
/// one canonical message; module errors are folded in through `From`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolError {
    /// Missing or invalid credentials, arguments or path extension.
    #[error("{0}")]
    Configuration(String),

    /// No candidate sat in the expected folders. Holds the path as given.
    #[error(
        "Could not find document in Google Drive: {0}. Make sure the document exists in your Google Drive and you have access to it."
    )]
    NotFound(String),

    /// A required remote call failed (the name search or the primary fetch).
    #[error("{0}")]
    Upstream(String),

    /// Every probe of the generic export rejected the id.
    #[error("Unable to determine document type for ID: {0}")]
    UnsupportedType(String),
}

impl From<PathError> for ToolError {
    fn from(e: PathError) -> Self {
        ToolError::Configuration(e.to_string())
    }
}

impl From<LocateError> for ToolError {
    fn from(e: LocateError) -> Self {
        match e {
            LocateError::InvalidPath(path) => path.into(),
            LocateError::Search(_) => ToolError::Upstream(e.to_string()),
        }
    }
}

impl From<ExtractError> for ToolError {
    fn from(e: ExtractError) -> Self {
        match e {
            ExtractError::Fetch { .. } => ToolError::Upstream(e.to_string()),
            ExtractError::UnknownType(id) => ToolError::UnsupportedType(id),
            ExtractError::UnknownFormat(_) => ToolError::Configuration(e.to_string()),
        }
    }
}
