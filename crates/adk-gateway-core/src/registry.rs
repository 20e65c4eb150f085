//! Registry document model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::GatewayError;

/// One known ADK server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub name: String,
    pub url: String,
    /// Fields written by other tools, carried through rewrites.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RegistryEntry {
    /// Create an entry after checking that `url` is an absolute http(s) URL.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if the URL does not parse or has another scheme.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Result<Self, GatewayError> {
        let url = url.into();
        let parsed = url::Url::parse(&url)
            .map_err(|e| GatewayError::InvalidArgument(format!("invalid url '{url}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GatewayError::InvalidArgument(format!(
                "invalid url '{url}': scheme must be http or https"
            )));
        }
        Ok(Self {
            name: name.into(),
            url,
            extra: Map::new(),
        })
    }
}

/// The whole persisted registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryDocument {
    pub agents: Vec<RegistryEntry>,
    /// Top-level keys other than `agents`, carried through rewrites.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RegistryDocument {
    /// Parse a document, requiring an `agents` array.
    ///
    /// # Errors
    /// Returns `Malformed` for invalid JSON or a missing/mistyped `agents` field.
    pub fn parse(text: &str) -> Result<Self, GatewayError> {
        serde_json::from_str(text).map_err(|e| {
            GatewayError::Malformed(format!(
                "invalid format, expected an \"agents\" array: {e}"
            ))
        })
    }

    /// Serialize with two-space indentation.
    ///
    /// # Errors
    /// Returns `Malformed` if serialization fails.
    pub fn to_pretty_json(&self) -> Result<String, GatewayError> {
        serde_json::to_string_pretty(self).map_err(|e| GatewayError::Malformed(e.to_string()))
    }

    /// Drop every entry named `name`, returning how many were removed.
    pub fn remove_named(&mut self, name: &str) -> usize {
        let before = self.agents.len();
        self.agents.retain(|entry| entry.name != name);
        before - self.agents.len()
    }
}
