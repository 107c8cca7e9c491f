use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::conditions::DecodeError;

/// errors returned by every client operation
#[derive(Debug, Error)]
pub enum SdkError {
    /// a required option was missing or a setting was invalid; no request was sent
    #[error("validation error: {0}")]
    Validation(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// the service answered with a non-2xx status
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        body: Option<ServiceErrorBody>,
    },

    /// the response body is not valid JSON
    #[error("malformed response body: {0}")]
    MalformedInput(serde_json::Error),

    /// valid JSON with the wrong shape for the expected model
    #[error("decode error: {0}")]
    Decode(DecodeError),

    #[error("authentication error: {0}")]
    Authentication(String),
}

impl SdkError {
    pub fn validation(message: impl Into<String>) -> Self {
        SdkError::Validation(message.into())
    }

    /// HTTP status of the failed call, when the service answered
    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::Http { status, .. } => Some(*status),
            SdkError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// build an `Http` error from a status and the raw response body
    pub(crate) fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let json: Option<JsonValue> = serde_json::from_slice(body).ok();
        let message = json
            .as_ref()
            .and_then(error_message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });
        let body = json.and_then(|v| serde_json::from_value(v).ok());

        SdkError::Http {
            status: status.as_u16(),
            message,
            body,
        }
    }
}

/// sort serde_json failures into syntax problems and shape problems
impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;
        match err.classify() {
            Category::Data => SdkError::Decode(DecodeError::new(err.to_string(), "")),
            Category::Syntax | Category::Eof | Category::Io => SdkError::MalformedInput(err),
        }
    }
}

impl From<DecodeError> for SdkError {
    fn from(err: DecodeError) -> Self {
        SdkError::Decode(err)
    }
}

/// error payload returned by both services
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(default)]
    pub code: Option<JsonValue>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub trace: Option<String>,
    #[serde(default)]
    pub errors: Option<Vec<ServiceErrorDetail>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServiceErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub more_info: Option<String>,
}

// lookup order: errors[0].message, error, message, errorMessage
fn error_message(json: &JsonValue) -> Option<String> {
    let first = json
        .get("errors")
        .and_then(|e| e.get(0))
        .and_then(|e| e.get("message"));

    [first, json.get("error"), json.get("message"), json.get("errorMessage")]
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str().map(str::to_string))
}

pub type Result<T> = std::result::Result<T, SdkError>;
