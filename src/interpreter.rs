//! Query Interpreter
//!
//! Sends the raw user query through the structured-extraction prompt and
//! parses the model's JSON reply. A reply that is not a single JSON object
//! is a terminal error for the request; there is no retry.

use anyhow::Result;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::TripTimeError;
use crate::llm::ChatModel;
use crate::models::{ExtractedQuery, QueryType, TravelMode};
use crate::prompts;

/// Interprets raw user queries via one extraction round trip
pub struct QueryInterpreter<'a> {
    model: &'a dyn ChatModel,
}

/// The extraction JSON as the model words it, before normalization
#[derive(Debug, Deserialize)]
struct RawExtraction {
    #[serde(default)]
    query_type: String,
    #[serde(default)]
    origin: String,
    #[serde(default)]
    destination: String,
    #[serde(default)]
    original_mode: Option<String>,
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    out_of_scope_reason: Option<String>,
}

impl<'a> QueryInterpreter<'a> {
    #[must_use]
    pub fn new(model: &'a dyn ChatModel) -> Self {
        Self { model }
    }

    /// Interpret one user query.
    ///
    /// Errors cover both transport failures and unparseable replies; the
    /// orchestrator surfaces either as the fixed apology.
    #[instrument(skip(self))]
    pub async fn interpret(&self, query: &str) -> Result<ExtractedQuery> {
        let prompt = prompts::extraction(query);
        let reply = self
            .model
            .complete(prompts::EXTRACTION_SYSTEM, &prompt)
            .await?;
        debug!("Extraction reply: {}", reply);
        parse_extraction(&reply)
    }
}

/// Parse and normalize the model's extraction reply.
///
/// Mode normalization runs the documented synonym mapping over the model's
/// `mode` field and, failing that, over the user's original wording. A
/// wording neither canonical nor in a synonym group stays unmapped, which
/// the orchestrator treats as a terminal unsupported-mode error.
pub fn parse_extraction(reply: &str) -> Result<ExtractedQuery> {
    let raw: RawExtraction = serde_json::from_str(reply.trim()).map_err(|e| {
        TripTimeError::interpretation(format!("Model reply was not a JSON object: {e}"))
    })?;

    let original_mode = raw
        .original_mode
        .map(|mode| mode.trim().to_string())
        .filter(|mode| !mode.is_empty());

    let mode = match raw.mode.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        Some(wording) => TravelMode::from_wording(wording).or_else(|| {
            original_mode
                .as_deref()
                .and_then(TravelMode::from_wording)
        }),
        None => Some(TravelMode::Driving),
    };

    Ok(ExtractedQuery {
        query_type: QueryType::from_raw(&raw.query_type),
        origin: raw.origin.trim().to_string(),
        destination: raw.destination.trim().to_string(),
        original_mode,
        mode,
        out_of_scope_reason: raw
            .out_of_scope_reason
            .map(|reason| reason.trim().to_string())
            .filter(|reason| !reason.is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_travel_duration_extraction() {
        let reply = r#"{
            "query_type": "travel_duration",
            "origin": "Ferry Building",
            "destination": "Walgreens",
            "original_mode": "bike",
            "mode": "bicycling",
            "out_of_scope_reason": ""
        }"#;
        let query = parse_extraction(reply).unwrap();
        assert_eq!(query.query_type, QueryType::TravelDuration);
        assert_eq!(query.origin, "Ferry Building");
        assert_eq!(query.destination, "Walgreens");
        assert_eq!(query.original_mode.as_deref(), Some("bike"));
        assert_eq!(query.mode, Some(TravelMode::Bicycling));
        assert!(query.out_of_scope_reason.is_none());
    }

    #[test]
    fn test_parse_out_of_scope_extraction() {
        let reply = r#"{
            "query_type": "out_of_scope",
            "origin": "",
            "destination": "",
            "out_of_scope_reason": "Asks about the weather"
        }"#;
        let query = parse_extraction(reply).unwrap();
        assert_eq!(query.query_type, QueryType::OutOfScope);
        assert_eq!(
            query.out_of_scope_reason.as_deref(),
            Some("Asks about the weather")
        );
    }

    #[test]
    fn test_parse_failure_on_non_json() {
        let result = parse_extraction("Sure! Here is the JSON you asked for: {...}");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_mode_defaults_to_driving() {
        let reply = r#"{"query_type": "travel_duration", "origin": "A", "destination": "B"}"#;
        let query = parse_extraction(reply).unwrap();
        assert_eq!(query.mode, Some(TravelMode::Driving));
    }

    #[test]
    fn test_synonym_mode_from_model_is_normalized() {
        // The model sometimes echoes the user's wording instead of mapping it
        let reply = r#"{
            "query_type": "travel_duration",
            "origin": "A",
            "destination": "B",
            "original_mode": "train",
            "mode": "train"
        }"#;
        let query = parse_extraction(reply).unwrap();
        assert_eq!(query.mode, Some(TravelMode::Transit));
    }

    #[test]
    fn test_unmappable_mode_stays_unmapped() {
        let reply = r#"{
            "query_type": "travel_duration",
            "origin": "A",
            "destination": "B",
            "original_mode": "jetpack",
            "mode": "jetpack"
        }"#;
        let query = parse_extraction(reply).unwrap();
        assert_eq!(query.mode, None);
    }

    #[test]
    fn test_vtol_mode_passes_validation() {
        let reply = r#"{
            "query_type": "travel_duration",
            "origin": "A",
            "destination": "B",
            "mode": "vtol"
        }"#;
        let query = parse_extraction(reply).unwrap();
        assert_eq!(query.mode, Some(TravelMode::Vtol));
    }

    #[test]
    fn test_fields_are_trimmed() {
        let reply = r#"{
            "query_type": "travel_duration",
            "origin": "  Chez Panisse  ",
            "destination": " Mezzo ",
            "mode": " driving "
        }"#;
        let query = parse_extraction(reply).unwrap();
        assert_eq!(query.origin, "Chez Panisse");
        assert_eq!(query.destination, "Mezzo");
        assert_eq!(query.mode, Some(TravelMode::Driving));
    }
}
