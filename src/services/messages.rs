// Messages service
// Outreach messages addressed to a lead, newest first.

use crate::airtable::query;
use crate::error::ApiError;
use crate::mapping::{map_records, message_from_record};
use crate::state::AppState;
use crate::types::Message;

/// All messages whose `Recipient` equals `recipient`.
///
/// A missing or empty recipient is a bad request. Configuration is checked
/// first, so both failures happen before any network call.
pub async fn list_messages(
    state: &AppState,
    recipient: Option<&str>,
) -> Result<Vec<Message>, ApiError> {
    let airtable = state.airtable()?;
    let recipient = recipient
        .filter(|r| !r.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Recipient parameter is required".to_string()))?;
    let table = &state.config.messages_table;

    let records = airtable
        .select(table, &query::messages_for_recipient(recipient))
        .await
        .map_err(|e| {
            log::error!("Error fetching messages from Airtable: {}", e);
            ApiError::upstream("Failed to fetch messages from Airtable", e)
        })?;

    let messages = map_records(&records, message_from_record);
    log::info!("Fetched {} messages for recipient {}", messages.len(), recipient);
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::state_for;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn missing_recipient_is_rejected_without_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let state = state_for(&server);
        let err = list_messages(&state, None).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
        let err = list_messages(&state, Some("")).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn returns_messages_in_store_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/appTest/Messages"))
            .and(query_param("filterByFormula", r#"{Recipient} = "L-1""#))
            .and(query_param("sort[0][direction]", "desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "records": [
                    { "id": "rec2", "fields": { "Content": "Second", "Recipient": "L-1", "Created": "2024-05-02T00:00:00.000Z" } },
                    { "id": "rec1", "fields": { "Content": "First", "Recipient": "L-1", "Created": "2024-05-01T00:00:00.000Z" } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let messages = list_messages(&state_for(&server), Some("L-1")).await.unwrap();
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["Second", "First"]);
        assert_eq!(messages[0].created_at, "2024-05-02T00:00:00.000Z");
    }
}
