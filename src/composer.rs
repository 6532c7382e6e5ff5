//! Response Composer
//!
//! Produces the final natural-language text for each outcome branch via a
//! second language-model round trip. A failed composition call degrades to
//! a deterministic template carrying the same facts, so every branch still
//! resolves to a user-facing string.

use tracing::warn;

use crate::llm::ChatModel;
use crate::models::TravelMode;
use crate::prompts;

/// Composes the user-facing reply for each outcome branch
pub struct ResponseComposer<'a> {
    model: &'a dyn ChatModel,
}

impl<'a> ResponseComposer<'a> {
    #[must_use]
    pub fn new(model: &'a dyn ChatModel) -> Self {
        Self { model }
    }

    /// Variant A: explain an out-of-scope query
    pub async fn out_of_scope(&self, query: &str, reason: Option<&str>) -> String {
        let reason = reason.unwrap_or("the request is not a travel duration question");
        let prompt = prompts::out_of_scope(query, reason);
        match self.model.complete(prompts::OUT_OF_SCOPE_SYSTEM, &prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Out-of-scope composition failed, using fallback: {e}");
                format!(
                    "I can only answer travel duration questions between two locations \
                     using driving, walking, bicycling, or transit. Your question is out \
                     of scope: {reason}. Try asking something like \"How long does it \
                     take to drive from the Ferry Building to Golden Gate Park?\""
                )
            }
        }
    }

    /// Variant B: explain which location could not be resolved
    pub async fn location_error(
        &self,
        origin: &str,
        origin_found: bool,
        destination: &str,
        destination_found: bool,
    ) -> String {
        let prompt = prompts::location_error(origin, origin_found, destination, destination_found);
        match self
            .model
            .complete(prompts::LOCATION_ERROR_SYSTEM, &prompt)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!("Location-error composition failed, using fallback: {e}");
                let describe = |found: bool| if found { "found" } else { "not found" };
                format!(
                    "I couldn't process your travel query because of a location issue. \
                     Origin \"{origin}\" was {}; destination \"{destination}\" was {}. \
                     Adding a city, state, or street address usually helps.",
                    describe(origin_found),
                    describe(destination_found)
                )
            }
        }
    }

    /// Variant C: the final success reply, inviting a ride request
    pub async fn success(
        &self,
        origin: &str,
        destination: &str,
        mode: TravelMode,
        original_mode: Option<&str>,
        duration: &str,
    ) -> String {
        let prompt = prompts::success(origin, destination, mode, original_mode, duration);
        match self.model.complete(prompts::SUCCESS_SYSTEM, &prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Success composition failed, using fallback: {e}");
                format!(
                    "Travelling from {origin} to {destination} by {mode} takes about \
                     {duration}. Would you like to request a ride from your origin to \
                     your destination?"
                )
            }
        }
    }
}
