// =============================================================================
// OAUTH CLIENT CREDENTIALS
// =============================================================================
//
// The server signs in as the user through an OAuth "installed app" client.
// The client id and secret can come from (first match wins):
//
// 1. `GOOGLE_CLIENT_ID` + `GOOGLE_CLIENT_SECRET`
// 2. `GOOGLE_CREDENTIALS`, holding the client JSON itself or a path to it
// 3. the first command-line argument, same format as (2)
//
// The client JSON is the file Google Cloud Console offers for download: an
// object with an `installed` (or `web`) key holding `client_id` and
// `client_secret`.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::core::tools::ToolError;

pub const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

const MISSING_CREDENTIALS: &str = "Google OAuth credentials not provided. Set either:\n  \
     - GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET environment variables, or\n  \
     - GOOGLE_CREDENTIALS environment variable with OAuth2 credentials JSON or file path.";

const INVALID_FORMAT: &str = "Invalid OAuth2 credentials format. Credentials must contain \
     'installed' or 'web' key with client_id and client_secret.";

/// Everything that can go wrong between reading credentials and holding a
/// usable access token.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Configuration(String),

    #[error("Token file {path}: {message}")]
    TokenFile { path: String, message: String },

    #[error("OAuth2 authorization failed: {0}")]
    Authorization(String),

    #[error("Token request failed: {0}")]
    TokenRequest(String),
}

impl From<AuthError> for ToolError {
    fn from(e: AuthError) -> Self {
        ToolError::Configuration(e.to_string())
    }
}

/// The OAuth client the server authenticates as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    pub auth_uri: String,
    pub token_uri: String,
}

#[derive(Deserialize)]
struct ClientConfigFile {
    installed: Option<ClientConfig>,
    web: Option<ClientConfig>,
}

#[derive(Deserialize)]
struct ClientConfig {
    client_id: String,
    client_secret: String,
    auth_uri: Option<String>,
    token_uri: Option<String>,
}

impl ClientSecrets {
    pub fn from_pair(client_id: &str, client_secret: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            auth_uri: DEFAULT_AUTH_URI.to_string(),
            token_uri: DEFAULT_TOKEN_URI.to_string(),
        }
    }

    /// Parses a downloaded client JSON. `installed` wins over `web`.
    pub fn from_json(json: &str) -> Result<Self, AuthError> {
        let file: ClientConfigFile = serde_json::from_str(json)
            .map_err(|e| AuthError::Configuration(format!("{} ({})", INVALID_FORMAT, e)))?;

        let config = file
            .installed
            .or(file.web)
            .ok_or_else(|| AuthError::Configuration(INVALID_FORMAT.to_string()))?;

        Ok(Self {
            client_id: config.client_id,
            client_secret: config.client_secret,
            auth_uri: config.auth_uri.unwrap_or_else(|| DEFAULT_AUTH_URI.to_string()),
            token_uri: config.token_uri.unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
        })
    }

    /// Accepts either the JSON itself or the path of a file holding it.
    pub fn from_blob_or_path(value: &str) -> Result<Self, AuthError> {
        if serde_json::from_str::<serde_json::Value>(value).is_ok() {
            tracing::debug!("Loaded credentials from JSON string");
            return Self::from_json(value);
        }

        if Path::new(value).is_file() {
            tracing::info!("Loading credentials from file: {}", value);
            let content = std::fs::read_to_string(value).map_err(|e| {
                AuthError::Configuration(format!("Could not read credentials file {}: {}", value, e))
            })?;
            return Self::from_json(&content);
        }

        Err(AuthError::Configuration(format!("Invalid credentials: {}", value)))
    }
}

/// The places credentials may come from, captured once at startup.
#[derive(Debug, Clone, Default)]
pub struct CredentialSources {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub credentials: Option<String>,
    pub explicit: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl CredentialSources {
    /// Reads the environment; `explicit` is the command-line value, if any.
    pub fn from_env(explicit: Option<String>) -> Self {
        Self {
            client_id: non_empty(std::env::var("GOOGLE_CLIENT_ID").ok()),
            client_secret: non_empty(std::env::var("GOOGLE_CLIENT_SECRET").ok()),
            credentials: non_empty(std::env::var("GOOGLE_CREDENTIALS").ok()),
            explicit: non_empty(explicit),
        }
    }

    pub fn resolve(&self) -> Result<ClientSecrets, AuthError> {
        if let (Some(id), Some(secret)) = (&self.client_id, &self.client_secret) {
            tracing::info!("Using OAuth credentials from GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET");
            return Ok(ClientSecrets::from_pair(id, secret));
        }

        if let Some(value) = &self.credentials {
            tracing::info!("Using OAuth credentials from GOOGLE_CREDENTIALS");
            return ClientSecrets::from_blob_or_path(value);
        }

        if let Some(value) = &self.explicit {
            tracing::info!("Using OAuth credentials passed on the command line");
            return ClientSecrets::from_blob_or_path(value);
        }

        tracing::error!("{}", MISSING_CREDENTIALS);
        Err(AuthError::Configuration(MISSING_CREDENTIALS.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const INSTALLED: &str = r#"{
        "installed": {
            "client_id": "id-from-json",
            "client_secret": "secret-from-json",
            "token_uri": "https://example.invalid/token",
            "redirect_uris": ["http://localhost"]
        }
    }"#;

    fn sources() -> CredentialSources {
        CredentialSources::default()
    }

    #[test]
    fn env_pair_wins_over_everything() {
        let secrets = CredentialSources {
            client_id: Some("id".to_string()),
            client_secret: Some("secret".to_string()),
            credentials: Some(INSTALLED.to_string()),
            explicit: Some(INSTALLED.to_string()),
        }
        .resolve()
        .unwrap();

        assert_eq!(secrets, ClientSecrets::from_pair("id", "secret"));
        assert_eq!(secrets.token_uri, DEFAULT_TOKEN_URI);
    }

    #[test]
    fn half_a_pair_is_ignored() {
        let secrets = CredentialSources {
            client_id: Some("id".to_string()),
            explicit: Some(INSTALLED.to_string()),
            ..sources()
        }
        .resolve()
        .unwrap();

        assert_eq!(secrets.client_id, "id-from-json");
    }

    #[test]
    fn env_blob_wins_over_the_explicit_argument() {
        let web = r#"{ "web": { "client_id": "web-id", "client_secret": "s" } }"#;
        let secrets = CredentialSources {
            credentials: Some(web.to_string()),
            explicit: Some(INSTALLED.to_string()),
            ..sources()
        }
        .resolve()
        .unwrap();

        assert_eq!(secrets.client_id, "web-id");
        assert_eq!(secrets.auth_uri, DEFAULT_AUTH_URI);
    }

    #[test]
    fn json_fields_are_read_with_defaults() {
        let secrets = ClientSecrets::from_json(INSTALLED).unwrap();

        assert_eq!(secrets.client_secret, "secret-from-json");
        assert_eq!(secrets.token_uri, "https://example.invalid/token");
        assert_eq!(secrets.auth_uri, DEFAULT_AUTH_URI);
    }

    #[test]
    fn credentials_can_be_a_file_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(INSTALLED.as_bytes()).unwrap();
        let path = file.path().to_string_lossy().to_string();

        let secrets = CredentialSources {
            explicit: Some(path),
            ..sources()
        }
        .resolve()
        .unwrap();

        assert_eq!(secrets.client_id, "id-from-json");
    }

    #[test]
    fn value_that_is_neither_json_nor_a_file_is_rejected() {
        let err = ClientSecrets::from_blob_or_path("/no/such/credentials.json").unwrap_err();

        assert_eq!(err.to_string(), "Invalid credentials: /no/such/credentials.json");
    }

    #[test]
    fn json_without_client_keys_is_rejected() {
        let err = ClientSecrets::from_json(r#"{ "type": "service_account" }"#).unwrap_err();

        assert!(err.to_string().starts_with("Invalid OAuth2 credentials format"));
    }

    #[test]
    fn nothing_configured_lists_the_variables() {
        let err = sources().resolve().unwrap_err();
        let message = err.to_string();

        assert!(message.contains("GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET"));
        assert!(message.contains("GOOGLE_CREDENTIALS"));
        assert!(matches!(ToolError::from(err), ToolError::Configuration(_)));
    }
}
