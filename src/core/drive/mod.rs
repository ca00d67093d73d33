// Remote-service boundary of the core layer: the `DriveApi` port and the
// typed payloads it returns.

pub mod drive_api;
pub mod drive_models;

#[cfg(test)]
pub mod fake_drive;

pub use drive_api::{DriveApi, DriveError};
pub use drive_models::{
    Block, Document, DriveFile, Presentation, Spreadsheet, TableCell, ValueRange,
};
