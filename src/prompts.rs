//! Prompt templates for the extraction and response-composition calls

use crate::models::TravelMode;

/// System prompt for the structured-extraction call
pub const EXTRACTION_SYSTEM: &str =
    "You are a helpful assistant that extracts travel information from queries.";

/// System prompt for composing an out-of-scope explanation
pub const OUT_OF_SCOPE_SYSTEM: &str =
    "You are a helpful assistant that explains the limitations of a travel duration service.";

/// System prompt for composing a location-error reply
pub const LOCATION_ERROR_SYSTEM: &str =
    "You are a helpful assistant that guides users in formulating clear travel queries.";

/// System prompt for composing the final success reply
pub const SUCCESS_SYSTEM: &str =
    "You are a helpful assistant that provides travel duration information.";

/// Build the structured-extraction prompt for a raw user query.
///
/// The model must reply with exactly one JSON object; anything else is a
/// terminal parse failure for the request.
#[must_use]
pub fn extraction(query: &str) -> String {
    format!(
        r#"Extract the following information from the query:
1. Origin location
2. Destination location
3. Mode of transport (default to 'driving' if not specified.)
Important: Map the mode of transportation to one of these five options: driving, walking, bicycling, vtol or transit. Use the following guidelines:
- Map car, automobile, drive, vehicle, motor to "driving"
- Map walk, on foot, pedestrian, stroll, hike to "walking"
- Map bike, bicycle, cycle, cycling, pedal, biking to "bicycling"
- Map bus, train, subway, metro, public transport, tram, rail to "transit"
- If no mode is specified, default to "driving"

If the query is not about travel duration between two locations, or if it asks for information you can't provide (like specific traffic conditions, weather, or travel costs), classify it as "out_of_scope".

Query: "{query}"

Respond in JSON format:
{{
    "query_type": "travel_duration" or "out_of_scope",
    "origin": "extracted origin",
    "destination": "extracted destination",
    "original_mode": "original mode of transport mentioned by the user (if any)",
    "mode": "mapped mode of transport (driving, walking, bicycling, vtol or transit)",
    "out_of_scope_reason": "brief explanation if query is out of scope"
}}

Ensure your response contains only the JSON object, with no additional text before or after."#
    )
}

/// Build the composition prompt for an out-of-scope query
#[must_use]
pub fn out_of_scope(query: &str, reason: &str) -> String {
    format!(
        r#"Generate a polite and informative response for an out-of-scope query. The user asked: "{query}"

Explain that you can only provide travel durations between two locations using driving, walking, bicycling, or transit modes.
Briefly mention why their query is out of scope: {reason}
Provide an example of a query you can answer.

Keep the response concise and friendly."#
    )
}

/// Build the composition prompt for a query with unresolved locations
#[must_use]
pub fn location_error(
    origin: &str,
    origin_found: bool,
    destination: &str,
    destination_found: bool,
) -> String {
    let origin_status = if origin_found { "(Found)" } else { "(Not found)" };
    let destination_status = if destination_found {
        "(Found)"
    } else {
        "(Not found)"
    };
    format!(
        r#"Generate a helpful response for a user whose query couldn't be processed due to location issues.
Origin: {origin} {origin_status}
Destination: {destination} {destination_status}

Explain that one or both locations couldn't be found. If it's a generic location like 'Walmart', suggest adding more details like city, state, or a specific address. Provide an example of a more specific query that would work better.

Keep the response friendly and helpful."#
    )
}

/// Build the composition prompt for a fully resolved query
#[must_use]
pub fn success(
    origin: &str,
    destination: &str,
    mode: TravelMode,
    original_mode: Option<&str>,
    duration: &str,
) -> String {
    let original_mode = original_mode.unwrap_or("Not specified");
    format!(
        r#"Generate a natural language response for the following travel query:
Origin: {origin}
Destination: {destination}
Mode of Transport: {mode}
Original Mode Mentioned: {original_mode}
Travel Duration: {duration}

The response should be concise and informative. Mention the travel duration. Ask the user if they want to request a ride from their origin to their destination."#
    )
}
