//! Payloads exchanged with the library.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Contents of a zypp credentials file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub system_token: String,
}

/// System login returned by `announce_system`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemCredentials {
    pub login: String,
    pub password: String,
}

#[derive(Deserialize)]
pub(crate) struct AnnounceResponse {
    pub credentials: Vec<String>,
}

impl AnnounceResponse {
    pub(crate) fn into_credentials(self) -> Option<SystemCredentials> {
        let mut it = self.credentials.into_iter();
        Some(SystemCredentials {
            login: it.next()?,
            password: it.next()?,
        })
    }
}

/// Product identity; also used as a query.
///
/// Fields the library adds (extensions, repositories, ...) are kept in
/// `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub identifier: String,
    pub version: String,
    pub arch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub isbase: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Product {
    pub fn new(identifier: impl Into<String>, version: impl Into<String>, arch: impl Into<String>) -> Self {
        Product {
            identifier: identifier.into(),
            version: version.into(),
            arch: arch.into(),
            ..Product::default()
        }
    }
}

/// A subscription activation of the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub regcode: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub starts_at: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub service: Value,
}

/// Settings merged into the library's configuration before each call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClientParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub insecure: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// The library reads this key as a string.
    #[serde(
        skip_serializing_if = "std::ops::Not::not",
        serialize_with = "bool_as_string"
    )]
    pub debug: bool,
}

fn bool_as_string<S: Serializer>(v: &bool, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(if *v { "true" } else { "false" })
}
