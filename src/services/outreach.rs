// Outreach service
// Forwards action-button requests for a lead to the n8n automations.

use crate::error::ApiError;
use crate::state::AppState;

/// Ask n8n to generate and store a new message for the lead.
pub async fn generate_message(state: &AppState, custom_id: &str) -> Result<(), ApiError> {
    log::info!("Triggering message generation for lead {}", custom_id);
    state
        .webhooks()
        .trigger(&state.config.webhooks.generate_message, custom_id)
        .await
        .map_err(|e| {
            log::error!("Message generation webhook failed for {}: {}", custom_id, e);
            ApiError::upstream("Failed to generate message", e)
        })
}

/// Ask n8n to pull the lead's recent LinkedIn posts into Airtable.
pub async fn retrieve_posts(state: &AppState, custom_id: &str) -> Result<(), ApiError> {
    log::info!("Triggering post retrieval for lead {}", custom_id);
    state
        .webhooks()
        .trigger(&state.config.webhooks.retrieve_posts, custom_id)
        .await
        .map_err(|e| {
            log::error!("Post retrieval webhook failed for {}: {}", custom_id, e);
            ApiError::upstream("Failed to retrieve posts", e)
        })
}

/// Generate an outreach draft and return its text.
pub async fn generate_outreach(state: &AppState, custom_id: &str) -> Result<String, ApiError> {
    log::info!("Generating outreach for lead {}", custom_id);
    state
        .webhooks()
        .generate_outreach(&state.config.webhooks.outreach, custom_id)
        .await
        .map_err(|e| {
            log::error!("Outreach webhook failed for {}: {}", custom_id, e);
            ApiError::upstream("Failed to generate outreach", e)
        })
}
