//! Ride-booking stub
//!
//! No booking integration exists; the confirmation is a canned string
//! naming the places as the user worded them.

use crate::models::{Coordinate, ResolvedTrip};

/// Fixed reply when the booking action is invoked without both coordinates
pub const LOCATIONS_NOT_FOUND: &str =
    "I'm sorry, I couldn't find one or both of the locations you specified for the ride request.";

/// Request a ride between two resolved coordinates.
///
/// The coordinates prove the trip resolved; the confirmation names the
/// original place-name text.
#[must_use]
pub fn request_ride(
    origin: Option<&Coordinate>,
    destination: Option<&Coordinate>,
    origin_name: &str,
    destination_name: &str,
) -> String {
    if origin.is_none() || destination.is_none() {
        return LOCATIONS_NOT_FOUND.to_string();
    }

    format!("Your ride has been requested from {origin_name} to {destination_name}.")
}

/// Request a ride for a fully resolved trip
#[must_use]
pub fn request_ride_for_trip(trip: &ResolvedTrip) -> String {
    request_ride(
        Some(&trip.origin),
        Some(&trip.destination),
        &trip.origin_name,
        &trip.destination_name,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TravelMode;

    #[test]
    fn test_confirmation_names_both_places() {
        let a = Coordinate::new(37.7955, -122.3937);
        let b = Coordinate::new(37.7749, -122.4194);
        let confirmation = request_ride(Some(&a), Some(&b), "Ferry Building", "Walgreens");
        assert!(confirmation.contains("Ferry Building"));
        assert!(confirmation.contains("Walgreens"));
    }

    #[test]
    fn test_missing_coordinate_returns_not_found() {
        let a = Coordinate::new(37.7955, -122.3937);
        assert_eq!(
            request_ride(Some(&a), None, "Ferry Building", "Walgreens"),
            LOCATIONS_NOT_FOUND
        );
        assert_eq!(
            request_ride(None, Some(&a), "Ferry Building", "Walgreens"),
            LOCATIONS_NOT_FOUND
        );
    }

    #[test]
    fn test_trip_convenience_wrapper() {
        let trip = ResolvedTrip {
            origin: Coordinate::new(37.7955, -122.3937),
            destination: Coordinate::new(37.7749, -122.4194),
            origin_name: "Chez Panisse".to_string(),
            destination_name: "Mezzo".to_string(),
            mode: TravelMode::Walking,
            duration: "12 mins".to_string(),
        };
        let confirmation = request_ride_for_trip(&trip);
        assert!(confirmation.contains("Chez Panisse"));
        assert!(confirmation.contains("Mezzo"));
    }
}
