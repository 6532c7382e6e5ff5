//! Query orchestration
//!
//! Sequences interpretation, location resolution, duration lookup, and
//! response composition, resolving every failure branch to a user-facing
//! string. When exactly one location fails to resolve, nearby suggestions
//! anchored at the resolved side are offered and the first one is
//! substituted into the original query for a bounded requery.

use std::collections::HashSet;

use tracing::{info, instrument, warn};

use crate::composer::ResponseComposer;
use crate::config::DefaultsConfig;
use crate::interpreter::QueryInterpreter;
use crate::llm::ChatModel;
use crate::maps::MapsService;
use crate::models::{
    Coordinate, ExtractedQuery, QueryResponse, QueryType, ResolvedTrip, TravelMode,
};
use crate::resolver;

/// Fixed reply when the extraction reply cannot be parsed
pub const PARSE_APOLOGY: &str =
    "I'm sorry, I couldn't understand the query. Please try rephrasing it.";

/// Fixed reply when neither location resolves
pub const BOTH_NOT_FOUND: &str =
    "I'm sorry, I couldn't find one or both of the locations you specified.";

/// Fixed reply for a transport wording outside the canonical set
pub const UNSUPPORTED_MODE: &str = "I'm sorry, but the mode of transportation you selected is \
     not supported. Please choose from one of the following options: driving, walking, \
     bicycling, vtol or transit.";

/// Fixed reply when the directions service finds no route
#[must_use]
pub fn no_route_message(mode: TravelMode) -> String {
    format!(
        "I'm sorry, I couldn't calculate the travel duration for the specified route. \
         The requested mode of transport was {mode}."
    )
}

/// Which side of the trip failed to resolve
#[derive(Debug, Clone, Copy)]
enum Side {
    Origin,
    Destination,
}

impl Side {
    fn label(self) -> &'static str {
        match self {
            Side::Origin => "origin",
            Side::Destination => "destination",
        }
    }
}

/// The outcome of one pass over a (possibly rewritten) query
enum StepOutcome {
    Done(QueryResponse),
    Requery {
        text: String,
        connector: String,
        next_query: String,
    },
}

/// Sequences one user query through all services
pub struct QueryPipeline<'a> {
    model: &'a dyn ChatModel,
    maps: &'a dyn MapsService,
    settings: DefaultsConfig,
}

impl<'a> QueryPipeline<'a> {
    #[must_use]
    pub fn new(model: &'a dyn ChatModel, maps: &'a dyn MapsService, settings: DefaultsConfig) -> Self {
        Self {
            model,
            maps,
            settings,
        }
    }

    /// Process one user query to a final answer.
    ///
    /// Suggestion-substituted requeries are bounded by the configured cap
    /// and by a visited-query set, so a rewritten query that keeps failing
    /// stops quietly with whatever has been composed so far.
    #[instrument(skip(self))]
    pub async fn process_query(&self, query: &str) -> QueryResponse {
        let mut sections: Vec<String> = Vec::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut current = query.to_string();
        let mut requeries = 0u32;

        loop {
            visited.insert(current.clone());

            match self.run_once(&current).await {
                StepOutcome::Done(response) => {
                    if sections.is_empty() {
                        return response;
                    }
                    sections.push(response.answer);
                    return QueryResponse {
                        answer: sections.join("\n"),
                        trip: response.trip,
                    };
                }
                StepOutcome::Requery {
                    text,
                    connector,
                    next_query,
                } => {
                    sections.push(text);
                    if requeries >= self.settings.max_requeries {
                        warn!(
                            "Requery cap of {} reached, stopping",
                            self.settings.max_requeries
                        );
                        return QueryResponse::text(sections.join("\n"));
                    }
                    if visited.contains(&next_query) {
                        warn!("Rewritten query was already tried, stopping");
                        return QueryResponse::text(sections.join("\n"));
                    }
                    info!("Retrying with substituted location");
                    sections.push(connector);
                    requeries += 1;
                    current = next_query;
                }
            }
        }
    }

    async fn run_once(&self, query: &str) -> StepOutcome {
        let interpreter = QueryInterpreter::new(self.model);
        let composer = ResponseComposer::new(self.model);

        let extracted = match interpreter.interpret(query).await {
            Ok(extracted) => extracted,
            Err(e) => {
                warn!("Query interpretation failed: {e}");
                return StepOutcome::Done(QueryResponse::text(PARSE_APOLOGY));
            }
        };

        if extracted.query_type == QueryType::OutOfScope {
            let text = composer
                .out_of_scope(query, extracted.out_of_scope_reason.as_deref())
                .await;
            return StepOutcome::Done(QueryResponse::text(text));
        }

        let origin = resolver::resolve_coordinates(self.maps, &extracted.origin).await;
        let destination = resolver::resolve_coordinates(self.maps, &extracted.destination).await;

        match (origin, destination) {
            (None, None) => StepOutcome::Done(QueryResponse::text(BOTH_NOT_FOUND)),
            (None, Some(anchor)) => {
                self.suggest_and_requery(query, &extracted, &composer, Side::Origin, anchor)
                    .await
            }
            (Some(anchor), None) => {
                self.suggest_and_requery(query, &extracted, &composer, Side::Destination, anchor)
                    .await
            }
            (Some(origin), Some(destination)) => {
                let Some(mode) = extracted.mode else {
                    return StepOutcome::Done(QueryResponse::text(UNSUPPORTED_MODE));
                };

                let Some(duration) =
                    resolver::fetch_duration(self.maps, &origin, &destination, mode).await
                else {
                    return StepOutcome::Done(QueryResponse::text(no_route_message(mode)));
                };

                let text = composer
                    .success(
                        &extracted.origin,
                        &extracted.destination,
                        mode,
                        extracted.original_mode.as_deref(),
                        &duration,
                    )
                    .await;

                StepOutcome::Done(QueryResponse {
                    answer: text,
                    trip: Some(ResolvedTrip {
                        origin,
                        destination,
                        origin_name: extracted.origin.clone(),
                        destination_name: extracted.destination.clone(),
                        mode,
                        duration,
                    }),
                })
            }
        }
    }

    /// Handle a query with exactly one unresolved side: compose the error,
    /// list nearby suggestions anchored at the resolved side, and rewrite
    /// the original query with the first suggestion.
    async fn suggest_and_requery(
        &self,
        query: &str,
        extracted: &ExtractedQuery,
        composer: &ResponseComposer<'_>,
        failed: Side,
        anchor: Coordinate,
    ) -> StepOutcome {
        let (failed_text, origin_found, destination_found) = match failed {
            Side::Origin => (&extracted.origin, false, true),
            Side::Destination => (&extracted.destination, true, false),
        };

        let mut text = composer
            .location_error(
                &extracted.origin,
                origin_found,
                &extracted.destination,
                destination_found,
            )
            .await;

        // An empty location string cannot anchor a keyword search, and
        // substituting for it would mangle the query
        if failed_text.is_empty() {
            return StepOutcome::Done(QueryResponse::text(text));
        }

        let suggestions = resolver::nearby_suggestions(
            self.maps,
            &anchor,
            failed_text,
            self.settings.suggestion_radius_m,
            self.settings.max_suggestions,
        )
        .await;

        if suggestions.is_empty() {
            return StepOutcome::Done(QueryResponse::text(text));
        }

        text.push_str(&format!(
            "\n\nHere are a few suggestions for your {} location:\n",
            failed.label()
        ));
        for (index, suggestion) in suggestions.iter().enumerate() {
            text.push_str(&format!(
                "{}. {} - {}\n",
                index + 1,
                suggestion.name,
                suggestion.vicinity
            ));
        }

        let next_query = query.replace(failed_text.as_str(), &suggestions[0].substitution_text());

        StepOutcome::Requery {
            text,
            connector: format!("If you pick the first {} location:", failed.label()),
            next_query,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_route_message_names_the_mode() {
        let message = no_route_message(TravelMode::Vtol);
        assert!(message.contains("vtol"));
    }

    #[test]
    fn test_unsupported_mode_message_enumerates_modes() {
        for mode in TravelMode::ALL {
            assert!(UNSUPPORTED_MODE.contains(mode.as_str()));
        }
    }
}
