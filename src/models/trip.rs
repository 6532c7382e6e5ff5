//! A fully resolved trip and the response returned for each query

use serde::{Deserialize, Serialize};

use super::place::Coordinate;
use super::query::TravelMode;

/// A successfully resolved trip, handed to the ride-booking action.
///
/// This is an explicit result object; nothing about the last query is kept
/// in ambient state. Whoever drives the interaction decides how long to
/// hold on to it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResolvedTrip {
    /// Resolved origin coordinate
    pub origin: Coordinate,
    /// Resolved destination coordinate
    pub destination: Coordinate,
    /// Origin as the user worded it, before geocoding
    pub origin_name: String,
    /// Destination as the user worded it, before geocoding
    pub destination_name: String,
    /// Canonical transport mode the duration was computed for
    pub mode: TravelMode,
    /// Human-readable duration text from the directions service
    pub duration: String,
}

/// The outcome of one processed query
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct QueryResponse {
    /// Composed natural-language answer; never empty
    pub answer: String,
    /// Present only when both locations and a duration resolved,
    /// possibly via a suggestion-substituted requery
    pub trip: Option<ResolvedTrip>,
}

impl QueryResponse {
    /// A terminal text-only response
    #[must_use]
    pub fn text<S: Into<String>>(answer: S) -> Self {
        Self {
            answer: answer.into(),
            trip: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_response_has_no_trip() {
        let response = QueryResponse::text("no luck");
        assert_eq!(response.answer, "no luck");
        assert!(response.trip.is_none());
    }

    #[test]
    fn test_trip_serializes_with_lowercase_mode() {
        let trip = ResolvedTrip {
            origin: Coordinate::new(37.0, -122.0),
            destination: Coordinate::new(37.1, -122.1),
            origin_name: "Ferry Building".to_string(),
            destination_name: "Walgreens".to_string(),
            mode: TravelMode::Bicycling,
            duration: "25 mins".to_string(),
        };
        let json = serde_json::to_string(&trip).unwrap();
        assert!(json.contains("\"mode\":\"bicycling\""));
        assert!(json.contains("\"duration\":\"25 mins\""));
    }
}
