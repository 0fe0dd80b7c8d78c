//! JSON endpoints over the record services.

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::services::{leads, messages, outreach, posts};
use crate::state::AppState;
use crate::types::{Lead, Message, Post};

#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    recipient: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ActionResult {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct OutreachResult {
    pub message: String,
}

/// Build the complete router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/leads", get(list_leads))
        .route("/leads/{id}", get(get_lead))
        .route("/leads/{id}/generate-message", post(generate_message))
        .route("/leads/{id}/retrieve-posts", post(retrieve_posts))
        .route("/leads/{id}/outreach", post(generate_outreach))
        .route("/messages", get(list_messages))
        .route("/posts", get(list_posts))
        .route("/posts/{lead_id}", get(list_posts_for_lead))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_leads(State(state): State<AppState>) -> Result<Json<Vec<Lead>>, ApiError> {
    log::info!("GET /leads");
    leads::list_leads(&state).await.map(Json)
}

async fn get_lead(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Lead>, ApiError> {
    let Path(id) = path?;
    log::info!("GET /leads/{}", id);
    leads::get_lead(&state, &id).await.map(Json)
}

async fn list_messages(
    State(state): State<AppState>,
    query: Result<Query<MessagesQuery>, QueryRejection>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let Query(query) = query?;
    log::info!("GET /messages (recipient: {:?})", query.recipient);
    messages::list_messages(&state, query.recipient.as_deref())
        .await
        .map(Json)
}

async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, ApiError> {
    log::info!("GET /posts");
    posts::list_posts(&state).await.map(Json)
}

async fn list_posts_for_lead(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let Path(lead_id) = path?;
    log::info!("GET /posts/{}", lead_id);
    posts::list_posts_for_lead(&state, &lead_id).await.map(Json)
}

async fn generate_message(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<ActionResult>, ApiError> {
    let Path(id) = path?;
    outreach::generate_message(&state, &id).await?;
    Ok(Json(ActionResult { success: true }))
}

async fn retrieve_posts(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<ActionResult>, ApiError> {
    let Path(id) = path?;
    outreach::retrieve_posts(&state, &id).await?;
    Ok(Json(ActionResult { success: true }))
}

async fn generate_outreach(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<OutreachResult>, ApiError> {
    let Path(id) = path?;
    let message = outreach::generate_outreach(&state, &id).await?;
    Ok(Json(OutreachResult { message }))
}
