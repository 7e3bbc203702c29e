//! Errors, and decoding of the JSON error envelope the library returns in
//! place of a result.

use libsuseconnect_sys::SysError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Sys(#[from] SysError),
    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },
    #[error("SSL error {code}: {message}")]
    Ssl {
        code: i64,
        message: String,
        /// PEM of the offending certificate, when the library reports one.
        certificate: Option<String>,
    },
    #[error("timeout: {message}")]
    Timeout { message: String },
    #[error("network error: {message}")]
    Net { message: String },
    #[error("invalid JSON input: {message}")]
    InvalidJson { message: String },
    #[error("malformed credentials file: {message}")]
    MalformedCredentials { message: String },
    #[error("missing credentials file: {message}")]
    MissingCredentials { message: String },
    #[error("{message}")]
    Native { err_type: String, message: String },
    /// `getstatus` reports failures as plain text instead of an envelope.
    #[error("status unavailable: {message}")]
    Status { message: String },
    #[error("`getstatus` returned an empty result")]
    EmptyStatus,
    #[error("cannot decode `{export}` output: {source}")]
    Decode {
        export: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot encode arguments: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("unknown status format `{0}`, expected `json` or `text`")]
    Format(String),
}

// ── Envelope ──────────────────────────────────────────────────────────────

/// `{"err_type": ..., "message": ..., "code": ..., "data": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub err_type: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl ErrorEnvelope {
    /// Extract an envelope from `value` if it is one.
    ///
    /// Any object carrying `err_type` is an error, even when its fields do
    /// not have the expected types; those are read leniently.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let err_type = obj.get("err_type")?;
        if let Ok(envelope) = serde_json::from_value(value.clone()) {
            return Some(envelope);
        }
        let text = |v: &Value| match v {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        };
        Some(ErrorEnvelope {
            err_type: text(err_type),
            message: obj.get("message").map(text).unwrap_or_default(),
            code: obj
                .get("code")
                .and_then(|c| c.as_i64().or_else(|| c.as_str()?.trim().parse().ok()))
                .unwrap_or_default(),
            data: obj.get("data").map(text).filter(|d| !d.is_empty()),
        })
    }
}

impl From<ErrorEnvelope> for Error {
    fn from(e: ErrorEnvelope) -> Self {
        let ErrorEnvelope {
            err_type,
            message,
            code,
            data,
        } = e;
        match err_type.as_str() {
            "APIError" => Error::Api { code, message },
            "SSLError" => Error::Ssl {
                code,
                message,
                certificate: data.filter(|d| !d.is_empty()),
            },
            "Timeout" => Error::Timeout { message },
            "NetError" => Error::Net { message },
            "JSONError" => Error::InvalidJson { message },
            "MalformedSccCredentialsFile" => Error::MalformedCredentials { message },
            "MissingCredentialsFile" => Error::MissingCredentials { message },
            _ => Error::Native { err_type, message },
        }
    }
}

/// Parse `text` returned by `export` into `T`, surfacing an error envelope
/// as the matching [`Error`].
pub fn decode_response<T: DeserializeOwned>(export: &'static str, text: &str) -> Result<T> {
    let value = parse_value(export, text)?;
    serde_json::from_value(value).map_err(|source| Error::Decode { export, source })
}

/// Accept any non-error response. Some exports answer `{}`, others an empty
/// string.
pub fn expect_success(export: &'static str, text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Ok(());
    }
    parse_value(export, text).map(|_| ())
}

fn parse_value(export: &'static str, text: &str) -> Result<Value> {
    let value: Value =
        serde_json::from_str(text).map_err(|source| Error::Decode { export, source })?;
    match ErrorEnvelope::from_value(&value) {
        Some(envelope) => {
            tracing::debug!(export, err_type = %envelope.err_type, "library reported an error");
            Err(envelope.into())
        }
        None => Ok(value),
    }
}
