// Virtual-drive path handling: parsing, normalization and suffix matching.
// Everything here is pure; no remote calls.

pub mod document_kind;
pub mod path_matcher;
pub mod path_parser;

pub use document_kind::DocumentKind;
pub use path_matcher::{match_backwards, normalize};
pub use path_parser::{parse_virtual_path, ParsedPath, PathError};
