//! Data models for the `TripTime` application
//!
//! This module contains the core domain models organized by concern:
//! - Query: structured extraction of a travel-duration question
//! - Place: coordinates and nearby-place suggestions
//! - Trip: a fully resolved trip, ready for a ride-booking follow-up

pub mod place;
pub mod query;
pub mod trip;

// Re-export all public types for convenient access
pub use place::{Coordinate, GeocodeCandidate, PlaceSuggestion};
pub use query::{ExtractedQuery, QueryType, TravelMode};
pub use trip::{QueryResponse, ResolvedTrip};
