// The three Google Workspace document kinds the virtual drive exposes as files.
// A kind ties together the placeholder file extension the mount shows, the
// MIME type Drive stores, and the label we use in banners and errors.

use std::fmt;

/// A Google Workspace document kind, as seen through the virtual drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Document,
    Spreadsheet,
    Presentation,
}

impl DocumentKind {
    /// Probe order used when the kind of a remote id is unknown.
    pub const PROBE_ORDER: [DocumentKind; 3] = [
        DocumentKind::Document,
        DocumentKind::Spreadsheet,
        DocumentKind::Presentation,
    ];

    /// Maps a placeholder extension (with its leading dot) to a kind.
    /// Matching is case-insensitive because Windows paths are.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            ".gdoc" => Some(DocumentKind::Document),
            ".gsheet" => Some(DocumentKind::Spreadsheet),
            ".gslides" => Some(DocumentKind::Presentation),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            DocumentKind::Document => ".gdoc",
            DocumentKind::Spreadsheet => ".gsheet",
            DocumentKind::Presentation => ".gslides",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            DocumentKind::Document => "application/vnd.google-apps.document",
            DocumentKind::Spreadsheet => "application/vnd.google-apps.spreadsheet",
            DocumentKind::Presentation => "application/vnd.google-apps.presentation",
        }
    }

    /// Human-readable product name ("Google Doc", ...).
    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::Document => "Google Doc",
            DocumentKind::Spreadsheet => "Google Sheet",
            DocumentKind::Presentation => "Google Slides",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_map_to_kinds_case_insensitively() {
        assert_eq!(
            DocumentKind::from_extension(".gdoc"),
            Some(DocumentKind::Document)
        );
        assert_eq!(
            DocumentKind::from_extension(".GSHEET"),
            Some(DocumentKind::Spreadsheet)
        );
        assert_eq!(
            DocumentKind::from_extension(".gSlides"),
            Some(DocumentKind::Presentation)
        );
        assert_eq!(DocumentKind::from_extension(".docx"), None);
        assert_eq!(DocumentKind::from_extension("gdoc"), None);
        assert_eq!(DocumentKind::from_extension(""), None);
    }

    #[test]
    fn every_kind_round_trips_through_its_extension() {
        for kind in DocumentKind::PROBE_ORDER {
            assert_eq!(DocumentKind::from_extension(kind.extension()), Some(kind));
            assert!(kind.mime_type().starts_with("application/vnd.google-apps."));
        }
    }
}
