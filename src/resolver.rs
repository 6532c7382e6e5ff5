//! Location Resolution Module
//!
//! Wraps the maps service calls behind the degradation policy the
//! orchestrator relies on: a service error is logged and read as an absent
//! result, never propagated. Every branch downstream resolves to a
//! user-facing message.

use tracing::{debug, warn};

use crate::maps::MapsService;
use crate::models::{Coordinate, PlaceSuggestion, TravelMode};

/// Resolve a free-text place description to the first candidate's
/// coordinate, or `None` when the service finds nothing or fails.
pub async fn resolve_coordinates(maps: &dyn MapsService, place: &str) -> Option<Coordinate> {
    match maps.geocode(place).await {
        Ok(candidates) => {
            let first = candidates.into_iter().next();
            match &first {
                Some(candidate) => debug!(
                    "Resolved '{}' to {}",
                    place,
                    candidate.coordinate.as_latlng_param()
                ),
                None => debug!("No geocoding candidates for '{}'", place),
            }
            first.map(|candidate| candidate.coordinate)
        }
        Err(e) => {
            warn!("Error geocoding '{}': {e}", place);
            None
        }
    }
}

/// Fetch the route duration text, or `None` when no route exists or the
/// service fails. A vtol request always lands here as `None`: the
/// directions service only understands the four native modes.
pub async fn fetch_duration(
    maps: &dyn MapsService,
    origin: &Coordinate,
    destination: &Coordinate,
    mode: TravelMode,
) -> Option<String> {
    match maps.route_duration(origin, destination, mode).await {
        Ok(duration) => duration,
        Err(e) => {
            warn!("Error getting directions ({mode} mode): {e}");
            None
        }
    }
}

/// Fetch up to `max_suggestions` nearby places for an unresolved location
/// keyword, anchored at the side that did resolve. Empty on error.
pub async fn nearby_suggestions(
    maps: &dyn MapsService,
    anchor: &Coordinate,
    keyword: &str,
    radius_m: u32,
    max_suggestions: usize,
) -> Vec<PlaceSuggestion> {
    match maps.places_nearby(anchor, keyword, radius_m).await {
        Ok(mut suggestions) => {
            suggestions.truncate(max_suggestions);
            suggestions
        }
        Err(e) => {
            warn!("Error finding places near '{keyword}': {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use crate::models::GeocodeCandidate;

    struct FailingMaps;

    #[async_trait]
    impl MapsService for FailingMaps {
        async fn geocode(&self, _address: &str) -> Result<Vec<GeocodeCandidate>> {
            Err(anyhow!("service unavailable"))
        }

        async fn route_duration(
            &self,
            _origin: &Coordinate,
            _destination: &Coordinate,
            _mode: TravelMode,
        ) -> Result<Option<String>> {
            Err(anyhow!("service unavailable"))
        }

        async fn places_nearby(
            &self,
            _anchor: &Coordinate,
            _keyword: &str,
            _radius_m: u32,
        ) -> Result<Vec<PlaceSuggestion>> {
            Err(anyhow!("service unavailable"))
        }
    }

    struct StubMaps {
        suggestions: Vec<PlaceSuggestion>,
    }

    #[async_trait]
    impl MapsService for StubMaps {
        async fn geocode(&self, _address: &str) -> Result<Vec<GeocodeCandidate>> {
            Ok(vec![
                GeocodeCandidate {
                    coordinate: Coordinate::new(1.0, 2.0),
                    formatted_address: Some("First".to_string()),
                },
                GeocodeCandidate {
                    coordinate: Coordinate::new(3.0, 4.0),
                    formatted_address: Some("Second".to_string()),
                },
            ])
        }

        async fn route_duration(
            &self,
            _origin: &Coordinate,
            _destination: &Coordinate,
            _mode: TravelMode,
        ) -> Result<Option<String>> {
            Ok(Some("25 mins".to_string()))
        }

        async fn places_nearby(
            &self,
            _anchor: &Coordinate,
            _keyword: &str,
            _radius_m: u32,
        ) -> Result<Vec<PlaceSuggestion>> {
            Ok(self.suggestions.clone())
        }
    }

    fn suggestion(name: &str) -> PlaceSuggestion {
        PlaceSuggestion {
            name: name.to_string(),
            vicinity: "somewhere".to_string(),
        }
    }

    #[tokio::test]
    async fn test_service_errors_read_as_absent() {
        let maps = FailingMaps;
        assert!(resolve_coordinates(&maps, "anywhere").await.is_none());
        let a = Coordinate::new(1.0, 2.0);
        let b = Coordinate::new(3.0, 4.0);
        assert!(fetch_duration(&maps, &a, &b, TravelMode::Driving).await.is_none());
        assert!(nearby_suggestions(&maps, &a, "cafe", 5000, 3).await.is_empty());
    }

    #[tokio::test]
    async fn test_first_candidate_wins() {
        let maps = StubMaps { suggestions: vec![] };
        let coordinate = resolve_coordinates(&maps, "anywhere").await.unwrap();
        assert_eq!(coordinate, Coordinate::new(1.0, 2.0));
    }

    #[tokio::test]
    async fn test_suggestions_are_truncated() {
        let maps = StubMaps {
            suggestions: vec![
                suggestion("a"),
                suggestion("b"),
                suggestion("c"),
                suggestion("d"),
            ],
        };
        let anchor = Coordinate::new(1.0, 2.0);
        let suggestions = nearby_suggestions(&maps, &anchor, "cafe", 5000, 3).await;
        assert_eq!(suggestions.len(), 3);
        assert_eq!(suggestions[0].name, "a");
    }
}
