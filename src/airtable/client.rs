//! REST client for Airtable's `list records` endpoint.
//!
//! Uses reqwest with Bearer token auth. Requests target
//! `{api_url}/{base_id}/{table}` and follow the `offset` cursor until the
//! query's cap is met or the table is exhausted. No retries: a failed page
//! fails the whole read.

use serde::Deserialize;

use super::{api_error_message, AirtableError, AirtableSettings, RawRecord, SelectQuery};

/// Airtable's maximum page size.
const PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
struct ListRecordsResponse {
    #[serde(default)]
    records: Vec<RawRecord>,
    #[serde(default)]
    offset: Option<String>,
}

pub struct AirtableClient {
    client: reqwest::Client,
    settings: AirtableSettings,
}

impl AirtableClient {
    pub fn new(client: reqwest::Client, settings: AirtableSettings) -> Self {
        Self { client, settings }
    }

    pub fn base_id(&self) -> &str {
        &self.settings.base_id
    }

    fn table_url(&self, table: &str) -> Result<url::Url, AirtableError> {
        let mut url = url::Url::parse(&self.settings.api_url)
            .map_err(|e| AirtableError::InvalidUrl(format!("{}: {}", self.settings.api_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| AirtableError::InvalidUrl(self.settings.api_url.clone()))?
            .pop_if_empty()
            .push(&self.settings.base_id)
            .push(table);
        Ok(url)
    }

    /// Fetch every record of `table` matching `query`, in Airtable's order.
    pub async fn select(
        &self,
        table: &str,
        query: &SelectQuery,
    ) -> Result<Vec<RawRecord>, AirtableError> {
        let url = self.table_url(table)?;
        let base_params = query.params();
        let mut records: Vec<RawRecord> = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let mut params = base_params.clone();
            params.push(("pageSize".to_string(), PAGE_SIZE.to_string()));
            if let Some(ref cursor) = offset {
                params.push(("offset".to_string(), cursor.clone()));
            }

            let resp = self
                .client
                .get(url.clone())
                .bearer_auth(&self.settings.api_key)
                .query(&params)
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(AirtableError::ApiError {
                    status: status.as_u16(),
                    message: api_error_message(&body),
                });
            }

            let page: ListRecordsResponse = resp.json().await?;
            log::debug!(
                "airtable {}: page of {} records (more: {})",
                table,
                page.records.len(),
                page.offset.is_some()
            );
            records.extend(page.records);

            if let Some(max) = query.max_records {
                if records.len() >= max {
                    records.truncate(max);
                    break;
                }
            }
            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airtable::query;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> AirtableClient {
        AirtableClient::new(
            reqwest::Client::new(),
            AirtableSettings {
                api_url: format!("{}/v0", server.uri()),
                api_key: "key123".to_string(),
                base_id: "app1".to_string(),
            },
        )
    }

    fn record(id: &str) -> serde_json::Value {
        serde_json::json!({ "id": id, "createdTime": "2024-01-01T00:00:00.000Z", "fields": { "Name": id } })
    }

    #[tokio::test]
    async fn sends_auth_and_query_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/app1/Messages"))
            .and(header("authorization", "Bearer key123"))
            .and(query_param("filterByFormula", r#"{Recipient} = "L-1""#))
            .and(query_param("sort[0][field]", "Created"))
            .and(query_param("sort[0][direction]", "desc"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "records": [record("rec1")] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let records = client_for(&server)
            .select("Messages", &query::messages_for_recipient("L-1"))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "rec1");
        assert_eq!(records[0].get("Name"), Some(&serde_json::json!("rec1")));
    }

    #[tokio::test]
    async fn table_name_is_percent_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/app1/Sales%20Leads"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "records": [] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let records = client_for(&server)
            .select("Sales Leads", &SelectQuery::default())
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn follows_offset_cursor_across_pages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/app1/Posts"))
            .and(query_param("offset", "page2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "records": [record("rec3")] })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v0/app1/Posts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "records": [record("rec1"), record("rec2")],
                "offset": "page2"
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        let records = client_for(&server)
            .select("Posts", &SelectQuery::default())
            .await
            .unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["rec1", "rec2", "rec3"]);
    }

    #[tokio::test]
    async fn never_returns_more_than_the_cap() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/app1/Leads"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "records": [record("rec1"), record("rec2")],
                "offset": "more"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let records = client_for(&server)
            .select("Leads", &query::lead_by_custom_id("L-1"))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn api_error_is_not_retried_and_carries_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": { "type": "AUTHENTICATION_REQUIRED", "message": "Authentication required" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .select("Leads", &SelectQuery::default())
            .await
            .unwrap_err();
        match err {
            AirtableError::ApiError { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Authentication required");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
