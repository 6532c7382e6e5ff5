//! Coordinates and place-lookup results

use serde::{Deserialize, Serialize};

/// A geographic coordinate pair
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lng: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Format as the `lat,lng` parameter the maps service expects
    #[must_use]
    pub fn as_latlng_param(&self) -> String {
        format!("{:.6},{:.6}", self.lat, self.lng)
    }

    /// Generate a cache key fragment for this coordinate.
    ///
    /// Rounded to 4 decimal places (~11 m) so nearby lookups share entries.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!("{:.4}:{:.4}", self.lat, self.lng)
    }
}

/// One geocoding candidate; the resolver only ever uses the first
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GeocodeCandidate {
    /// Candidate coordinate
    pub coordinate: Coordinate,
    /// Service-formatted address, when supplied
    pub formatted_address: Option<String>,
}

/// A nearby-place suggestion for an unresolved location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlaceSuggestion {
    /// Place name
    pub name: String,
    /// Short neighbourhood / street description
    pub vicinity: String,
}

impl PlaceSuggestion {
    /// The text substituted into a rewritten query when the user picks
    /// this suggestion
    #[must_use]
    pub fn substitution_text(&self) -> String {
        if self.vicinity.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.vicinity)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latlng_param_formatting() {
        let coord = Coordinate::new(37.774929, -122.419416);
        assert_eq!(coord.as_latlng_param(), "37.774929,-122.419416");
    }

    #[test]
    fn test_cache_key_rounds_coordinates() {
        let coord = Coordinate::new(37.774929, -122.419416);
        assert_eq!(coord.cache_key(), "37.7749:-122.4194");
    }

    #[test]
    fn test_substitution_text_joins_name_and_vicinity() {
        let suggestion = PlaceSuggestion {
            name: "Walgreens".to_string(),
            vicinity: "Market St, San Francisco".to_string(),
        };
        assert_eq!(
            suggestion.substitution_text(),
            "Walgreens Market St, San Francisco"
        );
    }

    #[test]
    fn test_substitution_text_without_vicinity() {
        let suggestion = PlaceSuggestion {
            name: "Walgreens".to_string(),
            vicinity: String::new(),
        };
        assert_eq!(suggestion.substitution_text(), "Walgreens");
    }
}
