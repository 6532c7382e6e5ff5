//! `TripTime` - Natural-language travel duration assistant
//!
//! This library answers travel-duration questions by extracting origin,
//! destination, and transport mode with a language model, resolving
//! locations through a geocoding service, fetching a route duration from
//! a directions service, and composing a natural-language reply with an
//! optional ride-booking follow-up.

pub mod api;
pub mod booking;
pub mod cache;
pub mod composer;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod llm;
pub mod maps;
pub mod models;
pub mod orchestrator;
pub mod prompts;
pub mod resolver;
pub mod web;

// Re-export core types for public API
pub use config::TripTimeConfig;
pub use error::TripTimeError;
pub use interpreter::QueryInterpreter;
pub use llm::{ChatModel, OpenAiChatClient};
pub use maps::{GoogleMapsClient, MapsService};
pub use models::{
    Coordinate, ExtractedQuery, PlaceSuggestion, QueryResponse, QueryType, ResolvedTrip,
    TravelMode,
};
pub use orchestrator::QueryPipeline;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
