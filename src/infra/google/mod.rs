// Google implementation of the core `DriveApi` port, plus everything needed
// to sign in: credential resolution, token persistence and the OAuth flow.

pub mod credentials;
pub mod drive_client;
pub mod oauth;
pub mod token_store;

pub use credentials::CredentialSources;
pub use drive_client::GoogleApis;
