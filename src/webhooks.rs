//! n8n webhook forwarding.
//!
//! The action buttons (generate message, retrieve posts, generate outreach)
//! hand a lead's custom id to an n8n automation. The automation's work is
//! opaque: success is a 2xx status, and only the outreach reply body is read.

use serde::Serialize;

/// Reply text used when the outreach webhook succeeds without a usable body.
pub const DEFAULT_OUTREACH_MESSAGE: &str = "Outreach message generated successfully";

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    id: &'a str,
}

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("webhook responded with {0}")]
    Status(reqwest::StatusCode),
}

pub struct WebhookClient {
    client: reqwest::Client,
}

impl WebhookClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn post(&self, url: &str, custom_id: &str) -> Result<reqwest::Response, WebhookError> {
        let resp = self
            .client
            .post(url)
            .json(&WebhookPayload { id: custom_id })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(WebhookError::Status(status));
        }
        Ok(resp)
    }

    /// Fire a webhook and ignore its body.
    pub async fn trigger(&self, url: &str, custom_id: &str) -> Result<(), WebhookError> {
        self.post(url, custom_id).await.map(|_| ())
    }

    /// Fire the outreach webhook and return the generated text.
    pub async fn generate_outreach(
        &self,
        url: &str,
        custom_id: &str,
    ) -> Result<String, WebhookError> {
        let resp = self.post(url, custom_id).await?;
        let body = resp.text().await?;
        Ok(outreach_text(&body))
    }
}

/// First string among `message`, `text`, `content`; otherwise the default reply.
fn outreach_text(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            ["message", "text", "content"].iter().find_map(|key| {
                json.get(key)
                    .and_then(|v| v.as_str())
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
        })
        .unwrap_or_else(|| DEFAULT_OUTREACH_MESSAGE.to_string())
}
