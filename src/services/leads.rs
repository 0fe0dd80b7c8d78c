// Leads service
// List and lookup of leads in the Airtable leads table.

use crate::airtable::query;
use crate::error::ApiError;
use crate::mapping::{lead_from_record, map_records};
use crate::state::AppState;
use crate::types::Lead;

/// Up to 100 leads in the configured view's order.
pub async fn list_leads(state: &AppState) -> Result<Vec<Lead>, ApiError> {
    let airtable = state.airtable()?;
    let table = &state.config.leads_table;

    let records = airtable
        .select(table, &query::list_leads(&state.config.view))
        .await
        .map_err(|e| {
            log::error!("Error fetching leads from Airtable: {}", e);
            ApiError::upstream("Failed to fetch leads from Airtable", e)
        })?;

    let leads = map_records(&records, lead_from_record);
    log::info!("Fetched {} leads from table '{}'", leads.len(), table);
    Ok(leads)
}

/// Lead whose `ID` column equals `custom_id`.
pub async fn get_lead(state: &AppState, custom_id: &str) -> Result<Lead, ApiError> {
    let airtable = state.airtable()?;
    let table = &state.config.leads_table;

    let records = airtable
        .select(table, &query::lead_by_custom_id(custom_id))
        .await
        .map_err(|e| {
            log::error!("Error fetching lead {} from Airtable: {}", custom_id, e);
            ApiError::upstream("Failed to fetch lead from Airtable", e)
        })?;

    map_records(&records, lead_from_record)
        .into_iter()
        .next()
        .ok_or_else(|| {
            log::info!("No lead found with ID {}", custom_id);
            ApiError::NotFound("Lead not found".to_string())
        })
}
