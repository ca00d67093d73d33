// Reconstructs the folder path of a Drive object by walking its parent chain
// up to the root. Drive has no "get path" call, so this costs one round trip
// per ancestor and nothing is cached between candidates or calls.
//
// Objects with several parents are resolved through their first parent only.

use std::collections::HashSet;

use thiserror::Error;

use crate::core::drive::{DriveApi, DriveError};

/// The id Drive accepts as an alias for the user's root folder. Listings
/// usually report the real root id instead, in which case the walk ends at the
/// first folder without parents (named "My Drive").
pub const ROOT_SENTINEL: &str = "root";

/// Upper bound on the number of ancestors fetched for one object.
pub const MAX_PARENT_DEPTH: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Failed to fetch '{id}' while walking parents: {source}")]
    Fetch {
        id: String,
        #[source]
        source: DriveError,
    },

    #[error("Parent chain of '{0}' loops back on itself")]
    Cycle(String),

    #[error("Parent chain of '{0}' is deeper than {MAX_PARENT_DEPTH} folders")]
    TooDeep(String),
}

/// Returns the folder names above `file_id`, outermost first.
///
/// An object without parents resolves to an empty path. Only the first parent
/// of each object is followed (Drive allows several, but a virtual-drive path
/// can only show one of them). Folders with an empty name are skipped.
pub async fn resolve_actual_path<C: DriveApi + ?Sized>(
    client: &C,
    file_id: &str,
) -> Result<Vec<String>, ResolveError> {
    let fetch = |id: &str| {
        let id = id.to_string();
        move |source: DriveError| ResolveError::Fetch { id, source }
    };

    let file = client.get_file(file_id).await.map_err(fetch(file_id))?;
    let Some(first_parent) = file.first_parent() else {
        return Ok(Vec::new());
    };

    let mut folders = Vec::new();
    let mut visited = HashSet::from([file_id.to_string()]);
    let mut current = first_parent.to_string();

    while current != ROOT_SENTINEL {
        if !visited.insert(current.clone()) {
            return Err(ResolveError::Cycle(file_id.to_string()));
        }
        if visited.len() > MAX_PARENT_DEPTH + 1 {
            return Err(ResolveError::TooDeep(file_id.to_string()));
        }

        let folder = client.get_file(&current).await.map_err(fetch(&current))?;
        if !folder.name.is_empty() {
            folders.push(folder.name.clone());
        }

        match folder.first_parent() {
            None | Some(ROOT_SENTINEL) => break,
            Some(parent) => current = parent.to_string(),
        }
    }

    folders.reverse();
    tracing::debug!("Constructed path for {}: '{}'", file_id, folders.join("/"));
    Ok(folders)
}
