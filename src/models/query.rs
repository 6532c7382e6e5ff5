//! Structured representation of an interpreted travel-duration question

use serde::{Deserialize, Serialize};

/// Classification of a user query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    /// A travel-duration question between two locations
    TravelDuration,
    /// Anything the assistant cannot answer
    OutOfScope,
}

impl QueryType {
    /// Classify the raw `query_type` wording returned by the model.
    ///
    /// Only the exact `out_of_scope` marker selects the out-of-scope branch;
    /// every other value falls through to travel-duration handling.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        if raw.trim() == "out_of_scope" {
            QueryType::OutOfScope
        } else {
            QueryType::TravelDuration
        }
    }
}

/// Canonical transport modes accepted by the assistant.
///
/// `Vtol` passes validation but the directions service only understands the
/// other four; a vtol request fails at the service boundary and surfaces as
/// the no-route message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Driving,
    Walking,
    Bicycling,
    Transit,
    Vtol,
}

impl TravelMode {
    /// All canonical modes, in the order they are enumerated to the user
    pub const ALL: [TravelMode; 5] = [
        TravelMode::Driving,
        TravelMode::Walking,
        TravelMode::Bicycling,
        TravelMode::Transit,
        TravelMode::Vtol,
    ];

    /// Canonical lowercase name, as sent to the directions service
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Bicycling => "bicycling",
            TravelMode::Transit => "transit",
            TravelMode::Vtol => "vtol",
        }
    }

    /// Parse a canonical mode name
    #[must_use]
    pub fn from_canonical(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "driving" => Some(TravelMode::Driving),
            "walking" => Some(TravelMode::Walking),
            "bicycling" => Some(TravelMode::Bicycling),
            "transit" => Some(TravelMode::Transit),
            "vtol" => Some(TravelMode::Vtol),
            _ => None,
        }
    }

    /// Map free-form transport wording onto a canonical mode.
    ///
    /// Empty wording defaults to driving. Wording outside the documented
    /// synonym groups maps to `None`; it is up to the caller to treat that
    /// as a terminal error rather than defaulting.
    #[must_use]
    pub fn from_wording(wording: &str) -> Option<Self> {
        let normalized = wording.trim().to_lowercase();
        if normalized.is_empty() {
            return Some(TravelMode::Driving);
        }
        if let Some(mode) = Self::from_canonical(&normalized) {
            return Some(mode);
        }
        match normalized.as_str() {
            "car" | "automobile" | "drive" | "vehicle" | "motor" => Some(TravelMode::Driving),
            "walk" | "on foot" | "pedestrian" | "stroll" | "hike" => Some(TravelMode::Walking),
            "bike" | "bicycle" | "cycle" | "cycling" | "pedal" | "biking" => {
                Some(TravelMode::Bicycling)
            }
            "bus" | "train" | "subway" | "metro" | "public transport" | "tram" | "rail" => {
                Some(TravelMode::Transit)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One interpreted user query, immutable after parsing
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedQuery {
    /// Whether the query is answerable at all
    pub query_type: QueryType,
    /// Origin location text, as worded by the user
    pub origin: String,
    /// Destination location text, as worded by the user
    pub destination: String,
    /// The transport wording the user actually used, if any
    pub original_mode: Option<String>,
    /// Canonical transport mode; `None` means the wording could not be
    /// mapped and the request must fail with the unsupported-mode message
    pub mode: Option<TravelMode>,
    /// Model-supplied explanation for out-of-scope queries
    pub out_of_scope_reason: Option<String>,
}
