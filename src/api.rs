use std::sync::Arc;

use axum::{
    Router,
    extract::{Json, State},
    http::StatusCode,
    routing::post,
};
use serde::{Deserialize, Serialize};

use crate::booking;
use crate::config::DefaultsConfig;
use crate::llm::ChatModel;
use crate::maps::MapsService;
use crate::models::{Coordinate, QueryResponse};
use crate::orchestrator::QueryPipeline;

/// Shared service handles for the HTTP surface
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn ChatModel>,
    pub maps: Arc<dyn MapsService>,
    pub settings: DefaultsConfig,
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RideRequest {
    pub origin: Option<Coordinate>,
    pub destination: Option<Coordinate>,
    pub origin_name: String,
    pub destination_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RideResponse {
    pub confirmation: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/query", post(post_query))
        .route("/ride", post(post_ride))
        .with_state(state)
}

async fn post_query(
    State(state): State<AppState>,
    Json(payload): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, StatusCode> {
    let query = payload.query.trim();
    if query.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let pipeline = QueryPipeline::new(
        state.model.as_ref(),
        state.maps.as_ref(),
        state.settings.clone(),
    );
    let response = pipeline.process_query(query).await;
    Ok(Json(response))
}

async fn post_ride(Json(payload): Json<RideRequest>) -> Json<RideResponse> {
    let confirmation = booking::request_ride(
        payload.origin.as_ref(),
        payload.destination.as_ref(),
        &payload.origin_name,
        &payload.destination_name,
    );
    Json(RideResponse { confirmation })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ride_request_deserializes_without_coordinates() {
        let raw = r#"{"origin": null, "destination": null, "origin_name": "A", "destination_name": "B"}"#;
        let request: RideRequest = serde_json::from_str(raw).unwrap();
        assert!(request.origin.is_none());
        assert_eq!(request.origin_name, "A");
    }

    #[test]
    fn test_query_request_deserializes() {
        let raw = r#"{"query": "drive from A to B"}"#;
        let request: QueryRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(request.query, "drive from A to B");
    }
}
