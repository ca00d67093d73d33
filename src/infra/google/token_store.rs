// On-disk persistence of the user's OAuth token, in the "authorized user"
// JSON layout Google's own client libraries write, so an existing
// `token.json` keeps working.

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::credentials::{AuthError, ClientSecrets};

pub const DEFAULT_TOKEN_PATH: &str = "token.json";

/// Tokens this close to expiry are treated as expired.
pub const EXPIRY_SKEW_SECS: i64 = 60;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredToken {
    /// The access token.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

impl StoredToken {
    pub fn new(
        secrets: &ClientSecrets,
        access_token: String,
        refresh_token: Option<String>,
        expires_in: Option<i64>,
        scopes: &[&str],
    ) -> Self {
        Self {
            token: Some(access_token),
            refresh_token,
            token_uri: Some(secrets.token_uri.clone()),
            client_id: Some(secrets.client_id.clone()),
            client_secret: Some(secrets.client_secret.clone()),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
            expiry: expires_in.map(|secs| Utc::now() + Duration::seconds(secs)),
        }
    }

    /// An access token without a known expiry never expires.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => now + Duration::seconds(EXPIRY_SKEW_SECS) >= expiry,
            None => false,
        }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.token.is_some() && !self.is_expired_at(now)
    }

    pub fn can_refresh(&self) -> bool {
        self.refresh_token.is_some()
    }
}

/// The token file named by `GOOGLE_TOKEN_PATH`.
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Self {
        let path = std::env::var("GOOGLE_TOKEN_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TOKEN_PATH.to_string());
        Self::new(path)
    }

    fn error(&self, message: impl ToString) -> AuthError {
        AuthError::TokenFile {
            path: self.path.display().to_string(),
            message: message.to_string(),
        }
    }

    /// `Ok(None)` when there is no token file yet.
    pub async fn load(&self) -> Result<Option<StoredToken>, AuthError> {
        if !tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(None);
        }

        tracing::info!("Loading existing token from {}", self.path.display());
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.error(e))?;
        let token = serde_json::from_str(&content).map_err(|e| self.error(e))?;
        Ok(Some(token))
    }

    /// Overwrites the file with `token`.
    pub async fn save(&self, token: &StoredToken) -> Result<(), AuthError> {
        tracing::info!("Saving token to {}", self.path.display());
        let json = serde_json::to_string(token).map_err(|e| self.error(e))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| self.error(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secrets() -> ClientSecrets {
        ClientSecrets::from_pair("client", "secret")
    }

    #[tokio::test]
    async fn saved_token_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let file = TokenFile::new(dir.path().join("token.json"));
        let token = StoredToken::new(
            &secrets(),
            "access".to_string(),
            Some("refresh".to_string()),
            Some(3600),
            &["scope-a"],
        );

        file.save(&token).await.unwrap();

        assert_eq!(file.load().await.unwrap(), Some(token));
    }

    #[tokio::test]
    async fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = TokenFile::new(dir.path().join("absent.json"));

        assert_eq!(file.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(&path, "not json").unwrap();

        let err = TokenFile::new(&path).load().await.unwrap_err();

        assert!(matches!(err, AuthError::TokenFile { .. }));
    }

    #[test]
    fn reads_tokens_written_by_google_client_libraries() {
        let token: StoredToken = serde_json::from_str(
            r#"{
                "token": "ya29.a0",
                "refresh_token": "1//0g",
                "token_uri": "https://oauth2.googleapis.com/token",
                "client_id": "cid.apps.googleusercontent.com",
                "client_secret": "shh",
                "scopes": ["https://www.googleapis.com/auth/drive.readonly"],
                "universe_domain": "googleapis.com",
                "account": "",
                "expiry": "2024-05-01T12:00:00.123456Z"
            }"#,
        )
        .unwrap();

        assert_eq!(token.token.as_deref(), Some("ya29.a0"));
        assert!(token.can_refresh());
        assert!(token.is_expired_at(Utc::now()));
    }

    #[test]
    fn validity_honours_the_skew() {
        let now = Utc::now();
        let mut token = StoredToken {
            token: Some("t".to_string()),
            expiry: Some(now + Duration::seconds(EXPIRY_SKEW_SECS + 30)),
            ..StoredToken::default()
        };
        assert!(token.is_valid_at(now));

        token.expiry = Some(now + Duration::seconds(EXPIRY_SKEW_SECS - 1));
        assert!(!token.is_valid_at(now));

        token.expiry = None;
        assert!(token.is_valid_at(now));

        token.token = None;
        assert!(!token.is_valid_at(now));
    }
}
