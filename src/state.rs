use std::sync::Arc;

use crate::airtable::{normalize_base_id, AirtableClient, AirtableSettings};
use crate::error::ApiError;
use crate::types::Config;
use crate::webhooks::WebhookClient;

/// Environment keys read into [`Config`].
const CONFIG_KEYS: &[&str] = &[
    "AIRTABLE_API_KEY",
    "AIRTABLE_BASE_ID",
    "AIRTABLE_TABLE_NAME",
    "AIRTABLE_MESSAGES_TABLE_NAME",
    "AIRTABLE_POSTS_TABLE_NAME",
    "AIRTABLE_VIEW",
    "AIRTABLE_API_URL",
    "GENERATE_MESSAGE_WEBHOOK_URL",
    "RETRIEVE_POSTS_WEBHOOK_URL",
    "OUTREACH_WEBHOOK_URL",
    "CRM_BIND_ADDR",
];

/// Shared state handed to every request handler. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            http: reqwest::Client::new(),
        }
    }

    /// Open an Airtable client for this request.
    ///
    /// Fails with [`ApiError::Configuration`] before any network call when the
    /// API key or base id is missing.
    pub fn airtable(&self) -> Result<AirtableClient, ApiError> {
        let settings = airtable_settings(&self.config).ok_or(ApiError::Configuration)?;
        Ok(AirtableClient::new(self.http.clone(), settings))
    }

    pub fn webhooks(&self) -> WebhookClient {
        WebhookClient::new(self.http.clone())
    }
}

fn airtable_settings(config: &Config) -> Option<AirtableSettings> {
    let api_key = config.airtable_api_key.as_deref().filter(|k| !k.is_empty())?;
    let raw_base_id = config.airtable_base_id.as_deref().filter(|b| !b.is_empty())?;
    let base_id = normalize_base_id(raw_base_id);
    if base_id.is_empty() {
        return None;
    }
    Some(AirtableSettings {
        api_url: config.api_url.clone(),
        api_key: api_key.to_string(),
        base_id: base_id.to_string(),
    })
}

/// Build the config from the process environment.
pub fn load_config() -> Result<Config, String> {
    config_from_vars(std::env::vars())
}

/// Build the config from key/value pairs. Unknown keys and empty values are ignored.
pub fn config_from_vars(
    vars: impl IntoIterator<Item = (String, String)>,
) -> Result<Config, String> {
    let map: serde_json::Map<String, serde_json::Value> = vars
        .into_iter()
        .filter(|(key, value)| CONFIG_KEYS.contains(&key.as_str()) && !value.trim().is_empty())
        .map(|(key, value)| (key, serde_json::Value::String(value)))
        .collect();

    let config: Config = serde_json::from_value(serde_json::Value::Object(map))
        .map_err(|e| format!("Failed to parse config: {}", e))?;

    if config.airtable_api_key.is_none() || config.airtable_base_id.is_none() {
        log::warn!("AIRTABLE_API_KEY or AIRTABLE_BASE_ID not set; read endpoints will return 500");
    }

    Ok(config)
}
