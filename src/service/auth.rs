//! authenticators attach credentials to each outgoing request
//!
//! every authenticator is `Send + Sync` so clients can be shared across threads.
//! the IAM authenticator caches its access token behind a mutex.

use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use reqwest::blocking::RequestBuilder;
use serde::Deserialize;

use super::error::{Result, SdkError};

pub const DEFAULT_IAM_URL: &str = "https://iam.cloud.ibm.com";
const IAM_TOKEN_PATH: &str = "/identity/token";
const IAM_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

pub trait Authenticator: Send + Sync {
    /// short name used in logs and config files
    fn authentication_type(&self) -> &'static str;

    /// check the credentials are usable; called once when a client is built
    fn validate(&self) -> Result<()>;

    /// add credentials to an outgoing request
    fn authenticate(&self, request: RequestBuilder) -> Result<RequestBuilder>;
}

#[derive(Debug, Clone, Default)]
pub struct NoAuthAuthenticator;

impl Authenticator for NoAuthAuthenticator {
    fn authentication_type(&self) -> &'static str {
        "noauth"
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn authenticate(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        Ok(request)
    }
}

#[derive(Clone)]
pub struct BearerTokenAuthenticator {
    bearer_token: String,
}

impl BearerTokenAuthenticator {
    pub fn new(bearer_token: impl Into<String>) -> Self {
        Self {
            bearer_token: bearer_token.into(),
        }
    }

    pub fn bearer_token(&self) -> &str {
        &self.bearer_token
    }
}

impl Authenticator for BearerTokenAuthenticator {
    fn authentication_type(&self) -> &'static str {
        "bearertoken"
    }

    fn validate(&self) -> Result<()> {
        if self.bearer_token.trim().is_empty() {
            return Err(SdkError::validation("bearer token cannot be empty"));
        }
        Ok(())
    }

    fn authenticate(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        Ok(request.bearer_auth(&self.bearer_token))
    }
}

#[derive(Clone)]
pub struct BasicAuthenticator {
    username: String,
    password: String,
}

impl BasicAuthenticator {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Authenticator for BasicAuthenticator {
    fn authentication_type(&self) -> &'static str {
        "basic"
    }

    fn validate(&self) -> Result<()> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(SdkError::validation(
                "basic authentication requires a username and a password",
            ));
        }
        // the service rejects credentials copied with their surrounding braces or quotes
        for value in [&self.username, &self.password] {
            if has_bad_first_or_last_char(value) {
                return Err(SdkError::validation(
                    "basic credentials cannot start or end with '{', '}' or '\"'",
                ));
            }
        }
        Ok(())
    }

    fn authenticate(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        Ok(request.basic_auth(&self.username, Some(&self.password)))
    }
}

// keeps the refresh arithmetic inside chrono's range
const MAX_TOKEN_LIFETIME_SECS: i64 = u32::MAX as i64;

#[derive(Debug, Clone, Deserialize)]
struct IamTokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expiration: Option<i64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
    refresh_at: DateTime<Utc>,
}

impl CachedToken {
    fn from_response(response: IamTokenResponse, now: DateTime<Utc>) -> Self {
        let lifetime = response
            .expires_in
            .or_else(|| {
                response
                    .expiration
                    .map(|exp| exp.saturating_sub(now.timestamp()))
            })
            .unwrap_or(0)
            .clamp(0, MAX_TOKEN_LIFETIME_SECS);
        let expires_at = now + TimeDelta::seconds(lifetime);
        // refresh once 80% of the lifetime has elapsed
        let refresh_at = now + TimeDelta::seconds(lifetime * 8 / 10);

        Self {
            access_token: response.access_token,
            expires_at,
            refresh_at,
        }
    }

    fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        now >= self.refresh_at || now >= self.expires_at
    }
}

/// exchanges an API key for an IAM access token
pub struct IamAuthenticator {
    apikey: String,
    url: String,
    client_id: Option<String>,
    client_secret: Option<String>,
    client: reqwest::blocking::Client,
    token: Mutex<Option<CachedToken>>,
}

impl IamAuthenticator {
    pub fn new(apikey: impl Into<String>) -> Self {
        Self {
            apikey: apikey.into(),
            url: DEFAULT_IAM_URL.to_string(),
            client_id: None,
            client_secret: None,
            client: reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            token: Mutex::new(None),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_client_credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.client_id = Some(client_id.into());
        self.client_secret = Some(client_secret.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// return a valid access token, fetching a new one when the cached token is stale
    pub fn access_token(&self) -> Result<String> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| SdkError::Authentication("token cache lock poisoned".into()))?;

        let now = Utc::now();
        if let Some(token) = guard.as_ref() {
            if !token.needs_refresh(now) {
                return Ok(token.access_token.clone());
            }
        }

        log::debug!("requesting IAM access token from {}", self.url);
        let token = self.request_token(now)?;
        let access_token = token.access_token.clone();
        *guard = Some(token);
        Ok(access_token)
    }

    fn request_token(&self, now: DateTime<Utc>) -> Result<CachedToken> {
        let url = format!("{}{}", self.url, IAM_TOKEN_PATH);
        let mut request = self
            .client
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("grant_type", IAM_GRANT_TYPE),
                ("apikey", self.apikey.as_str()),
                ("response_type", "cloud_iam"),
            ]);
        if let (Some(id), Some(secret)) = (&self.client_id, &self.client_secret) {
            request = request.basic_auth(id, Some(secret));
        }

        let response = request
            .send()
            .map_err(|e| SdkError::Authentication(format!("token request failed: {}", e)))?;
        let status = response.status();
        let body = response
            .bytes()
            .map_err(|e| SdkError::Authentication(format!("token response unreadable: {}", e)))?;

        if !status.is_success() {
            let detail = SdkError::from_response(status, &body);
            return Err(SdkError::Authentication(format!(
                "token request rejected: {}",
                detail
            )));
        }

        let parsed: IamTokenResponse = serde_json::from_slice(&body)
            .map_err(|e| SdkError::Authentication(format!("invalid token response: {}", e)))?;
        Ok(CachedToken::from_response(parsed, now))
    }
}

impl Authenticator for IamAuthenticator {
    fn authentication_type(&self) -> &'static str {
        "iam"
    }

    fn validate(&self) -> Result<()> {
        if self.apikey.trim().is_empty() {
            return Err(SdkError::validation("IAM authentication requires an apikey"));
        }
        if has_bad_first_or_last_char(&self.apikey) {
            return Err(SdkError::validation(
                "apikey cannot start or end with '{', '}' or '\"'",
            ));
        }
        if self.client_id.is_some() != self.client_secret.is_some() {
            return Err(SdkError::validation(
                "client_id and client_secret must be set together",
            ));
        }
        Ok(())
    }

    fn authenticate(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.access_token()?;
        Ok(request.bearer_auth(token))
    }
}

impl std::fmt::Debug for BearerTokenAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerTokenAuthenticator").finish_non_exhaustive()
    }
}

impl std::fmt::Debug for BasicAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuthenticator")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for IamAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IamAuthenticator")
            .field("url", &self.url)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

fn has_bad_first_or_last_char(value: &str) -> bool {
    let bad: &[char] = &['{', '}', '"'];
    value.starts_with(bad) || value.ends_with(bad)
}
