// Posts service
// LinkedIn posts, all or per lead, most recently published first.

use crate::airtable::query;
use crate::error::ApiError;
use crate::mapping::{map_records, post_from_record};
use crate::state::AppState;
use crate::types::Post;

pub async fn list_posts(state: &AppState) -> Result<Vec<Post>, ApiError> {
    let airtable = state.airtable()?;
    let table = &state.config.posts_table;

    let records = airtable
        .select(table, &query::list_posts(&state.config.view))
        .await
        .map_err(|e| {
            log::error!("Error fetching posts from Airtable: {}", e);
            ApiError::upstream("Failed to fetch posts from Airtable", e)
        })?;

    let posts = map_records(&records, post_from_record);
    log::info!("Fetched {} posts from table '{}'", posts.len(), table);
    Ok(posts)
}

/// Posts whose `Author` equals the lead's custom id.
pub async fn list_posts_for_lead(state: &AppState, lead_id: &str) -> Result<Vec<Post>, ApiError> {
    let airtable = state.airtable()?;
    let table = &state.config.posts_table;

    let records = airtable
        .select(table, &query::posts_for_lead(lead_id, &state.config.view))
        .await
        .map_err(|e| {
            log::error!("Error fetching posts for lead {}: {}", lead_id, e);
            ApiError::upstream("Failed to fetch posts for lead", e)
        })?;

    let posts = map_records(&records, post_from_record);
    log::info!("Fetched {} posts for lead {}", posts.len(), lead_id);
    Ok(posts)
}
