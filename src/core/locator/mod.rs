// Path-to-id resolution: the parent-chain walk and the locator that drives
// it for every name-matching candidate.

pub mod document_locator;
pub mod path_resolver;

pub use document_locator::{DocumentLocator, LocateError};
