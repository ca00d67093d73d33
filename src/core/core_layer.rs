// The core module contains all business logic.
// Nothing in here speaks HTTP or MCP; remote calls go through `drive::DriveApi`.

#[path = "paths/mod.rs"]
pub mod paths;

#[path = "drive/mod.rs"]
pub mod drive;

#[path = "locator/mod.rs"]
pub mod locator;

#[path = "extraction/mod.rs"]
pub mod extraction;

#[path = "tools/mod.rs"]
pub mod tools;
