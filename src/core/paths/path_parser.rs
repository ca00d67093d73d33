// Splits a virtual-drive path like `G:\My Drive\Projects\Doc.gdoc` into the
// pieces the locator needs: the document name, the folder segments above it,
// and the placeholder extension that tells us the document kind.
//
// The virtual drive injects two things Drive itself knows nothing about: the
// drive letter and a root label ("My Drive", "Shared drives", ...). Only the
// drive letter is stripped here. The root label stays in the folder list and
// the suffix match in `path_matcher` absorbs it later.

use thiserror::Error;

use super::document_kind::DocumentKind;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("Unknown file extension '{0}'. Expected one of .gdoc, .gsheet, .gslides")]
    UnknownExtension(String),
}

/// The result of parsing a virtual-drive path. Built once per lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    /// File name without the placeholder extension.
    pub name: String,
    /// Folder segments above the file, root label included, drive letter removed.
    pub folders: Vec<String>,
    /// The placeholder extension as written, leading dot included.
    pub extension: String,
    pub kind: DocumentKind,
}

impl ParsedPath {
    /// Folder segments joined with `/`.
    pub fn folder_path(&self) -> String {
        self.folders.join("/")
    }
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Splits a file name into (stem, suffix) the way filesystem paths do: the
/// suffix is the last dot-part, and a leading dot does not start one.
fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 && idx < file_name.len() - 1 => {
            (&file_name[..idx], &file_name[idx..])
        }
        _ => (file_name, ""),
    }
}

/// `u:` with nothing after it.
fn is_bare_drive(parent: &str) -> bool {
    let mut chars = parent.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(letter), Some(':'), None) if letter.is_ascii_alphabetic()
    )
}

/// Turns the parent-directory part of a path into folder segments.
fn folder_segments(parent: &str) -> Vec<String> {
    let mut normalized = parent.replace('\\', "/");

    if normalized.is_empty() || normalized == "." || normalized == "./" {
        return Vec::new();
    }

    // "u:/My Drive/Projects" -> "My Drive/Projects"
    if let Some((_, rest)) = normalized.split_once(":/") {
        normalized = rest.to_string();
    } else if is_bare_drive(&normalized) {
        return Vec::new();
    }

    normalized
        .trim_matches('/')
        .split('/')
        .map(str::trim)
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .map(str::to_string)
        .collect()
}

/// Parses a virtual-drive path. Fails only when the extension does not map to
/// a known document kind; a path without folders is fine.
pub fn parse_virtual_path(raw: &str) -> Result<ParsedPath, PathError> {
    let trimmed = raw.trim().trim_end_matches(is_separator);

    let (parent, file_name) = match trimmed.rfind(is_separator) {
        Some(idx) => (&trimmed[..idx], &trimmed[idx + 1..]),
        None => ("", trimmed),
    };

    let (name, extension) = split_extension(file_name);
    let kind = DocumentKind::from_extension(extension)
        .ok_or_else(|| PathError::UnknownExtension(extension.to_string()))?;

    let parsed = ParsedPath {
        name: name.to_string(),
        folders: folder_segments(parent),
        extension: extension.to_string(),
        kind,
    };

    tracing::debug!(
        "Parsed path - Document: '{}', Folder: '{}', Type: {}",
        parsed.name,
        parsed.folder_path(),
        kind.mime_type()
    );

    Ok(parsed)
}
