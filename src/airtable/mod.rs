//! Airtable integration.
//!
//! Leads, messages and posts live in one Airtable base. This module reads
//! them over the REST API; it never writes (writes happen through the n8n
//! webhooks in `crate::webhooks`).
//!
//! Modules:
//! - client: paged `list records` reader
//! - query: filter formulas, sorts and per-operation select queries

pub mod client;
pub mod query;

use serde::Deserialize;

pub use client::AirtableClient;
pub use query::{SelectQuery, Sort, SortDirection};

/// One Airtable record as returned by the REST API, fields untyped.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    pub id: String,
    #[serde(default)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl RawRecord {
    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.fields.get(field)
    }
}

/// Credentials and addressing for one Airtable base.
#[derive(Debug, Clone)]
pub struct AirtableSettings {
    pub api_url: String,
    pub api_key: String,
    /// Already normalized with [`normalize_base_id`].
    pub base_id: String,
}

/// Keep only the segment before the first `/`.
///
/// Deployments sometimes paste `appXXX/tblYYY/viwZZZ` from the Airtable URL bar.
pub fn normalize_base_id(raw: &str) -> &str {
    raw.split('/').next().unwrap_or(raw).trim()
}

// ============================================================================
// Error type
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AirtableError {
    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Airtable API error {status}: {message}")]
    ApiError { status: u16, message: String },
    #[error("Invalid Airtable URL: {0}")]
    InvalidUrl(String),
}

/// Extract the human message from an Airtable error body.
///
/// Airtable answers either `{"error": {"type": .., "message": ..}}` or
/// `{"error": "NOT_FOUND"}`; anything else is passed through verbatim.
pub(crate) fn api_error_message(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };
    match json.get("error") {
        Some(serde_json::Value::String(kind)) => kind.clone(),
        Some(serde_json::Value::Object(obj)) => obj
            .get("message")
            .or_else(|| obj.get("type"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| body.trim().to_string()),
        _ => body.trim().to_string(),
    }
}
