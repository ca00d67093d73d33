// =============================================================================
// USER OAUTH2 SESSION
// =============================================================================
//
// Signs in as the user with the installed-app flow and keeps the access token
// fresh for the life of the process.
//
// **Startup:**
// 1. Load the token file. A file that fails to load is ignored.
// 2. Still valid? Use it. Expired with a refresh token? Refresh it.
// 3. Otherwise run the interactive flow: the user opens the logged URL,
//    consents, and Google redirects to a one-shot listener on 127.0.0.1.
// 4. Whatever token we end up with is written back to the token file.
//
// **Afterwards:** `access_token()` hands out the cached token and refreshes it
// when it is about to expire.
//
// stdout carries the MCP protocol, so everything user-facing here (including
// the authorization URL) goes through the log on stderr.

use std::collections::HashMap;
use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::Rng;
use reqwest::{Client, Url};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::RwLock;

use super::credentials::{AuthError, ClientSecrets};
use super::token_store::{StoredToken, TokenFile};

/// Read-only access to Drive metadata and the three editors' content.
pub const SCOPES: [&str; 4] = [
    "https://www.googleapis.com/auth/drive.readonly",
    "https://www.googleapis.com/auth/documents.readonly",
    "https://www.googleapis.com/auth/spreadsheets.readonly",
    "https://www.googleapis.com/auth/presentations.readonly",
];

/// How long the interactive flow waits for the browser to come back.
const AUTHORIZATION_TIMEOUT: Duration = Duration::from_secs(300);

/// Response from Google's token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// What the browser brought back to the loopback listener.
#[derive(Debug, PartialEq, Eq)]
enum Callback {
    Code { code: String, state: String },
    Denied(String),
    /// Anything else the browser asks for (e.g. `/favicon.ico`).
    Ignored,
}

/// Parses the request target of a redirect, e.g. `/?state=..&code=..`.
fn parse_callback(target: &str) -> Callback {
    let Ok(url) = Url::parse(&format!("http://127.0.0.1{}", target)) else {
        return Callback::Ignored;
    };
    let params: HashMap<String, String> = url.query_pairs().into_owned().collect();

    if let Some(error) = params.get("error") {
        return Callback::Denied(error.clone());
    }
    match (params.get("code"), params.get("state")) {
        (Some(code), Some(state)) => Callback::Code {
            code: code.clone(),
            state: state.clone(),
        },
        _ => Callback::Ignored,
    }
}

/// 32 random bytes, URL-safe. Used for `state` and the PKCE verifier.
fn random_token() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// S256 PKCE challenge: BASE64URL(SHA256(verifier)) without padding.
fn pkce_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

fn authorization_url(
    secrets: &ClientSecrets,
    redirect_uri: &str,
    state: &str,
    verifier: &str,
) -> Result<Url, AuthError> {
    let scope = SCOPES.join(" ");
    let challenge = pkce_challenge(verifier);
    Url::parse_with_params(
        &secrets.auth_uri,
        &[
            ("response_type", "code"),
            ("client_id", secrets.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("scope", scope.as_str()),
            ("state", state),
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("code_challenge", challenge.as_str()),
            ("code_challenge_method", "S256"),
        ],
    )
    .map_err(|e| AuthError::Configuration(format!("Invalid auth_uri {}: {}", secrets.auth_uri, e)))
}

pub struct OAuthSession {
    secrets: ClientSecrets,
    token_file: TokenFile,
    http: Client,
    cached_token: RwLock<StoredToken>,
    authorization_timeout: Duration,
}

impl OAuthSession {
    /// Produces a session holding a usable token, signing in interactively
    /// if the token file cannot provide one.
    pub async fn establish(
        secrets: ClientSecrets,
        token_file: TokenFile,
        http: Client,
    ) -> Result<Self, AuthError> {
        Self::new(secrets, token_file, http, AUTHORIZATION_TIMEOUT)
            .sign_in()
            .await
    }

    fn new(
        secrets: ClientSecrets,
        token_file: TokenFile,
        http: Client,
        authorization_timeout: Duration,
    ) -> Self {
        Self {
            secrets,
            token_file,
            http,
            cached_token: RwLock::new(StoredToken::default()),
            authorization_timeout,
        }
    }

    async fn sign_in(mut self) -> Result<Self, AuthError> {
        let stored = match self.token_file.load().await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Failed to load existing token: {}, will re-authenticate", e);
                None
            }
        };

        let token = match stored {
            Some(token) if token.is_valid_at(chrono::Utc::now()) => {
                tracing::info!("Using existing valid token");
                self.cached_token = RwLock::new(token);
                return Ok(self);
            }
            Some(token) if token.can_refresh() => {
                tracing::info!("Token expired, refreshing...");
                match self.refresh(&token).await {
                    Ok(fresh) => {
                        tracing::info!("Token refreshed successfully");
                        fresh
                    }
                    Err(e) => {
                        tracing::warn!("Failed to refresh token: {}, will re-authenticate", e);
                        self.authorize_interactively().await?
                    }
                }
            }
            _ => self.authorize_interactively().await?,
        };

        self.persist(&token).await;
        self.cached_token = RwLock::new(token);
        Ok(self)
    }

    /// A bearer token valid for at least the expiry skew.
    pub async fn access_token(&self) -> Result<String, AuthError> {
        {
            let cached = self.cached_token.read().await;
            if cached.is_valid_at(chrono::Utc::now()) {
                if let Some(token) = &cached.token {
                    return Ok(token.clone());
                }
            }
        }

        let mut cached = self.cached_token.write().await;
        // Another caller may have refreshed while we waited for the lock.
        if !cached.is_valid_at(chrono::Utc::now()) {
            tracing::info!("Access token expired, refreshing...");
            let fresh = self.refresh(&cached).await?;
            self.persist(&fresh).await;
            *cached = fresh;
        }

        cached
            .token
            .clone()
            .ok_or_else(|| AuthError::TokenRequest("token endpoint returned no access token".to_string()))
    }

    async fn persist(&self, token: &StoredToken) {
        if let Err(e) = self.token_file.save(token).await {
            tracing::warn!("Failed to save token: {}", e);
        }
    }

    async fn refresh(&self, token: &StoredToken) -> Result<StoredToken, AuthError> {
        let refresh_token = token.refresh_token.as_deref().ok_or_else(|| {
            AuthError::TokenRequest("no refresh token available; sign in again".to_string())
        })?;
        let token_uri = token.token_uri.as_deref().unwrap_or(&self.secrets.token_uri);

        let response = self
            .request_token(
                token_uri,
                &[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", refresh_token),
                    ("client_id", self.secrets.client_id.as_str()),
                    ("client_secret", self.secrets.client_secret.as_str()),
                ],
            )
            .await?;

        // Google usually omits the refresh token on refresh; keep the old one.
        let refresh_token = response
            .refresh_token
            .or_else(|| token.refresh_token.clone());
        Ok(StoredToken::new(
            &self.secrets,
            response.access_token,
            refresh_token,
            response.expires_in,
            &SCOPES,
        ))
    }

    async fn request_token(
        &self,
        token_uri: &str,
        form: &[(&str, &str)],
    ) -> Result<TokenResponse, AuthError> {
        let response = self
            .http
            .post(token_uri)
            .form(form)
            .send()
            .await
            .map_err(|e| AuthError::TokenRequest(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenRequest(format!(
                "token exchange failed ({}): {}",
                status, text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::TokenRequest(e.to_string()))
    }

    async fn authorize_interactively(&self) -> Result<StoredToken, AuthError> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| AuthError::Authorization(format!("cannot open loopback listener: {}", e)))?;
        let port = listener
            .local_addr()
            .map_err(|e| AuthError::Authorization(e.to_string()))?
            .port();
        let redirect_uri = format!("http://127.0.0.1:{}/", port);

        let state = random_token();
        let verifier = random_token();
        let url = authorization_url(&self.secrets, &redirect_uri, &state, &verifier)?;

        tracing::info!("Starting OAuth2 flow...");
        tracing::warn!(
            "Please complete the authentication in your browser by opening this URL:\n{}",
            url
        );

        let code = tokio::time::timeout(self.authorization_timeout, wait_for_code(&listener, &state))
            .await
            .map_err(|_| {
                AuthError::Authorization(format!(
                    "no response from the browser within {} seconds",
                    self.authorization_timeout.as_secs()
                ))
            })??;

        let response = self
            .request_token(
                &self.secrets.token_uri,
                &[
                    ("grant_type", "authorization_code"),
                    ("code", code.as_str()),
                    ("redirect_uri", redirect_uri.as_str()),
                    ("client_id", self.secrets.client_id.as_str()),
                    ("client_secret", self.secrets.client_secret.as_str()),
                    ("code_verifier", verifier.as_str()),
                ],
            )
            .await?;

        tracing::info!("OAuth2 authentication completed successfully");
        Ok(StoredToken::new(
            &self.secrets,
            response.access_token,
            response.refresh_token,
            response.expires_in,
            &SCOPES,
        ))
    }
}

/// Serves the loopback listener until the redirect carrying the code arrives.
async fn wait_for_code(listener: &TcpListener, expected_state: &str) -> Result<String, AuthError> {
    loop {
        let (stream, _) = listener
            .accept()
            .await
            .map_err(|e| AuthError::Authorization(e.to_string()))?;
        let (read_half, mut write_half) = stream.into_split();

        let mut request_line = String::new();
        if let Err(e) = BufReader::new(read_half).read_line(&mut request_line).await {
            tracing::debug!("Dropped loopback connection: {}", e);
            continue;
        }
        let target = request_line.split_whitespace().nth(1).unwrap_or("/");

        let (outcome, body) = match parse_callback(target) {
            Callback::Ignored => (None, "Waiting for Google sign-in..."),
            Callback::Denied(error) => (
                Some(Err(AuthError::Authorization(format!("access denied: {}", error)))),
                "Sign-in was cancelled. You can close this window.",
            ),
            Callback::Code { state, .. } if state != expected_state => (
                Some(Err(AuthError::Authorization("state mismatch in redirect".to_string()))),
                "Sign-in failed. You can close this window.",
            ),
            Callback::Code { code, .. } => (
                Some(Ok(code)),
                "Authentication complete. You can close this window.",
            ),
        };

        let reply = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        if let Err(e) = write_half.write_all(reply.as_bytes()).await {
            tracing::debug!("Failed to answer loopback request: {}", e);
        }

        if let Some(outcome) = outcome {
            return outcome;
        }
    }
}
