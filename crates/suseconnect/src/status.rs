//! Product registration status as reported by `getstatus`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Output format token passed to `getstatus`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum StatusFormat {
    #[default]
    Json,
    Text,
}

impl StatusFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusFormat::Json => "json",
            StatusFormat::Text => "text",
        }
    }
}

impl fmt::Display for StatusFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(StatusFormat::Json),
            "text" => Ok(StatusFormat::Text),
            other => Err(Error::Format(other.to_string())),
        }
    }
}

/// One installed product and its subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductStatus {
    pub identifier: String,
    pub version: String,
    pub arch: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_status: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl ProductStatus {
    pub fn state(&self) -> RegistrationState {
        RegistrationState::from(self.status.as_str())
    }

    /// `identifier/version/arch`
    pub fn triplet(&self) -> String {
        format!("{}/{}/{}", self.identifier, self.version, self.arch)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationState {
    Registered,
    NotRegistered,
    Other(String),
}

impl From<&str> for RegistrationState {
    fn from(s: &str) -> Self {
        match s {
            "Registered" => RegistrationState::Registered,
            "Not Registered" => RegistrationState::NotRegistered,
            other => RegistrationState::Other(other.to_string()),
        }
    }
}

/// Parse the JSON output of `getstatus("json")`.
///
/// On failure the library writes the bare error text instead of JSON; that
/// text becomes [`Error::Status`]. `null` (no installed products) is an
/// empty list.
pub fn parse_statuses(text: &str) -> Result<Vec<ProductStatus>, Error> {
    let trimmed = text.trim();
    if !trimmed.starts_with('[') && trimmed != "null" {
        return Err(Error::Status {
            message: trimmed.to_string(),
        });
    }
    let statuses: Option<Vec<ProductStatus>> =
        serde_json::from_str(trimmed).map_err(|source| Error::Decode {
            export: "getstatus",
            source,
        })?;
    Ok(statuses.unwrap_or_default())
}
