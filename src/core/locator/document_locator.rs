// Finds the Drive id behind a virtual-drive path.
//
// Strategy:
// 1. Parse the path (fails fast on an unknown extension).
// 2. List every non-trashed object with exactly that name and MIME type.
// 3. For each candidate, in listing order, walk its parent chain and compare
//    the reconstructed folders against the expected ones with the backwards
//    suffix match.
// 4. The first candidate that matches wins; the rest are never inspected.

use thiserror::Error;

use super::path_resolver::resolve_actual_path;
use crate::core::drive::{DriveApi, DriveError};
use crate::core::paths::{match_backwards, normalize, parse_virtual_path, ParsedPath, PathError};

/// Only the first page of name matches is considered. With more than this
/// many same-named documents of one kind, the one the path points to may be
/// missed.
pub const SEARCH_PAGE_SIZE: u32 = 50;

#[derive(Debug, Error)]
pub enum LocateError {
    #[error(transparent)]
    InvalidPath(#[from] PathError),

    #[error("Error searching Google Drive: {0}")]
    Search(#[source] DriveError),
}

/// Escapes a value for use inside a single-quoted Drive query literal.
fn escape_query_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Drive query for non-trashed objects with exactly this name and MIME type.
pub fn name_query(name: &str, mime_type: &str) -> String {
    format!(
        "name='{}' and mimeType='{}' and trashed=false",
        escape_query_literal(name),
        escape_query_literal(mime_type)
    )
}

/// Resolves virtual-drive paths to Drive ids.
pub struct DocumentLocator<'a, C: DriveApi + ?Sized> {
    client: &'a C,
}

impl<'a, C: DriveApi + ?Sized> DocumentLocator<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Returns the id of the document at `virtual_path`, or `None` when no
    /// candidate sits in the expected folders.
    pub async fn locate(&self, virtual_path: &str) -> Result<Option<String>, LocateError> {
        tracing::info!("Searching Google Drive for document: {}", virtual_path);
        let parsed = parse_virtual_path(virtual_path)?;
        self.locate_parsed(&parsed).await
    }

    async fn locate_parsed(&self, parsed: &ParsedPath) -> Result<Option<String>, LocateError> {
        let mime_type = parsed.kind.mime_type();
        let expected = normalize(&parsed.folder_path());

        tracing::info!(
            "Searching for document '{}{}' (type: {}), expected in folder: '{}'",
            parsed.name,
            parsed.extension,
            mime_type,
            expected
        );

        let query = name_query(&parsed.name, mime_type);
        tracing::debug!("Document search query: {}", query);

        let candidates = self
            .client
            .list_files(&query, SEARCH_PAGE_SIZE)
            .await
            .map_err(LocateError::Search)?;

        if candidates.is_empty() {
            tracing::warn!(
                "No documents found matching name '{}' (type: {})",
                parsed.name,
                mime_type
            );
            return Ok(None);
        }

        tracing::info!(
            "Found {} document(s) with name '{}', checking paths...",
            candidates.len(),
            parsed.name
        );

        for (index, candidate) in candidates.iter().enumerate() {
            tracing::debug!(
                "Checking document {}/{}: '{}' (ID: {})",
                index + 1,
                candidates.len(),
                candidate.name,
                candidate.id
            );

            // A candidate whose parents cannot be walked is treated as having
            // no folders at all; it can still match a root-level path.
            let actual = match resolve_actual_path(self.client, &candidate.id).await {
                Ok(folders) => normalize(&folders.join("/")),
                Err(e) => {
                    tracing::debug!("Error getting path for file {}: {}", candidate.id, e);
                    String::new()
                }
            };

            if match_backwards(&expected, &actual) {
                tracing::info!(
                    "Path match! Found document '{}' (ID: {}) in folder '{}'",
                    candidate.name,
                    candidate.id,
                    actual
                );
                self.verify(&candidate.id).await;
                return Ok(Some(candidate.id.clone()));
            }

            tracing::debug!(
                "  Path mismatch: expected path '{}' not found in actual path '{}'",
                expected,
                actual
            );
        }

        tracing::warn!(
            "None of the {} documents matched the expected path: '{}'",
            candidates.len(),
            expected
        );
        Ok(None)
    }

    /// Re-reads the matched object for the log. The match stands either way.
    async fn verify(&self, file_id: &str) {
        match self.client.get_file(file_id).await {
            Ok(file) => tracing::info!(
                "Verified document '{}' with ID: {} (MIME: {})",
                file.name,
                file_id,
                file.mime_type
            ),
            Err(e) => tracing::warn!(
                "Failed to verify document {} ({}); returning it anyway since the path matched",
                file_id,
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::drive::fake_drive::{file, FakeDrive};

    const DOC_MIME: &str = "application/vnd.google-apps.document";

    /// Two documents named "Doc": `in-aideia` lives in My Drive/Projects/Aideia,
    /// `in-archive` in My Drive/Archive. `ids` sets the listing order.
    fn two_candidates(ids: [&str; 2]) -> FakeDrive {
        let parent_of = |id: &str| if id == "in-aideia" { "aideia" } else { "archive" };
        FakeDrive::new()
            .with_listing(
                ids.iter()
                    .map(|&id| file(id, "Doc", DOC_MIME, Some(parent_of(id))))
                    .collect(),
            )
            .with_folder("aideia", "Aideia", Some("projects"))
            .with_folder("projects", "Projects", Some("my-drive"))
            .with_folder("archive", "Archive", Some("my-drive"))
            .with_folder("my-drive", "My Drive", None)
    }

    #[test]
    fn query_matches_exact_name_and_type() {
        assert_eq!(
            name_query("Doc", DOC_MIME),
            "name='Doc' and mimeType='application/vnd.google-apps.document' and trashed=false"
        );
    }

    #[test]
    fn query_escapes_quotes_and_backslashes() {
        assert_eq!(
            name_query(r"Bob's \ notes", DOC_MIME),
            r"name='Bob\'s \\ notes' and mimeType='application/vnd.google-apps.document' and trashed=false"
        );
    }

    #[tokio::test]
    async fn first_matching_candidate_wins_and_later_ones_are_not_inspected() {
        let drive = two_candidates(["in-aideia", "in-archive"]);
        let locator = DocumentLocator::new(&drive);

        let id = locator.locate("Projects/Aideia/Doc.gdoc").await.unwrap();

        assert_eq!(id.as_deref(), Some("in-aideia"));
        assert_eq!(
            drive.calls_to("get_file:in-archive"),
            0,
            "calls made: {:?}",
            drive.call_keys()
        );
    }

    #[tokio::test]
    async fn later_candidate_is_returned_when_earlier_ones_do_not_match() {
        let drive = two_candidates(["in-archive", "in-aideia"]);
        let locator = DocumentLocator::new(&drive);

        let id = locator
            .locate(r"G:\My Drive\Projects\Aideia\Doc.gdoc")
            .await
            .unwrap();

        assert_eq!(id.as_deref(), Some("in-aideia"));
    }

    #[tokio::test]
    async fn search_queries_by_exact_name_and_type() {
        let drive = two_candidates(["in-aideia", "in-archive"]);
        let locator = DocumentLocator::new(&drive);

        locator.locate(r"G:\My Drive\Archive\Doc.gdoc").await.unwrap();

        let query = format!("list_files:{}", name_query("Doc", DOC_MIME));
        assert_eq!(drive.calls_to(&query), 1);
    }

    #[tokio::test]
    async fn no_candidate_in_expected_folder_is_not_found() {
        let drive = two_candidates(["in-aideia", "in-archive"]);
        let locator = DocumentLocator::new(&drive);

        let id = locator
            .locate(r"G:\My Drive\Elsewhere\Doc.gdoc")
            .await
            .unwrap();

        assert_eq!(id, None);
    }

    #[tokio::test]
    async fn empty_listing_is_not_found() {
        let drive = FakeDrive::new();
        let locator = DocumentLocator::new(&drive);

        assert_eq!(locator.locate(r"G:\My Drive\Doc.gdoc").await.unwrap(), None);
    }

    #[tokio::test]
    async fn root_level_path_accepts_the_first_candidate() {
        let drive = two_candidates(["in-archive", "in-aideia"]);
        let locator = DocumentLocator::new(&drive);

        let id = locator.locate("Doc.gdoc").await.unwrap();

        assert_eq!(id.as_deref(), Some("in-archive"));
    }

    #[tokio::test]
    async fn unknown_extension_fails_before_any_remote_call() {
        let drive = FakeDrive::new();
        let locator = DocumentLocator::new(&drive);

        let err = locator.locate(r"G:\My Drive\Doc.pdf").await.unwrap_err();

        assert!(matches!(err, LocateError::InvalidPath(_)));
        assert!(drive.call_keys().is_empty());
    }

    #[tokio::test]
    async fn search_failure_is_propagated() {
        let drive = FakeDrive::new().with_list_error(DriveError::Api {
            status: 403,
            message: "insufficient permissions".to_string(),
        });
        let locator = DocumentLocator::new(&drive);

        let err = locator.locate(r"G:\My Drive\Doc.gdoc").await.unwrap_err();

        assert!(matches!(err, LocateError::Search(DriveError::Api { status: 403, .. })));
    }

    #[tokio::test]
    async fn unresolvable_candidate_only_matches_root_level_paths() {
        let drive = FakeDrive::new()
            .with_listing(vec![file("broken", "Doc", DOC_MIME, Some("p"))])
            .with_failing_file("broken");
        let locator = DocumentLocator::new(&drive);

        assert_eq!(locator.locate(r"G:\My Drive\Doc.gdoc").await.unwrap(), None);
        // Root-level path: the parent walk fails, verification fails too, and
        // the path match still stands.
        assert_eq!(
            locator.locate("Doc.gdoc").await.unwrap().as_deref(),
            Some("broken")
        );
    }
}
