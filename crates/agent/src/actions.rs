use std::sync::Arc;

use async_trait::async_trait;
use fleetbot_core::features::FEATURE_CLARIFICATION_PROMPT;
use fleetbot_core::{extract_features, filter_by_specs, match_vehicles, ListingStyle};
use tracing::{error, info, warn};

use crate::context::ActionContext;
use crate::runtime::{CollectingDispatcher, Domain, Event, Tracker};

pub const ASK_AVAILABLE_VEHICLES: &str = "action_ask_available_vehicles";
pub const RECOMMEND_BY_FEATURE: &str = "action_recommend_by_feature";
pub const FILTER_BY_SPECS: &str = "action_filter_by_specs";

pub const NO_VEHICLES_AVAILABLE: &str = "Sorry, no vehicles are currently available.";
pub const NO_FEATURE_MATCHES: &str = "No vehicles match those features at the moment.";
pub const NO_SPEC_MATCHES: &str = "No vehicles matched those specifications.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplyKind {
    Listing,
    Clarification,
    NoMatch,
    Failure,
}

impl ReplyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Listing => "listing",
            Self::Clarification => "clarification",
            Self::NoMatch => "no_match",
            Self::Failure => "failure",
        }
    }
}

/// The single message an action sends back for one turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionReply {
    pub kind: ReplyKind,
    pub text: String,
}

impl ActionReply {
    fn new(kind: ReplyKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into() }
    }

    pub fn listing(text: impl Into<String>) -> Self {
        Self::new(ReplyKind::Listing, text)
    }

    pub fn clarification(text: impl Into<String>) -> Self {
        Self::new(ReplyKind::Clarification, text)
    }

    pub fn no_match(text: impl Into<String>) -> Self {
        Self::new(ReplyKind::NoMatch, text)
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self::new(ReplyKind::Failure, text)
    }
}

/// A named custom action the dialogue runtime can invoke.
///
/// Implementors only decide what to say; `run` handles logging and delivery so
/// every invocation produces exactly one message and no events.
#[async_trait]
pub trait Action: Send + Sync {
    fn name(&self) -> &'static str;

    /// Reply for an already lowercased utterance.
    async fn respond(&self, utterance: &str) -> ActionReply;

    async fn run(
        &self,
        dispatcher: &mut CollectingDispatcher,
        tracker: &Tracker,
        _domain: &Domain,
    ) -> Vec<Event> {
        info!(
            event_name = "action.invoked",
            action_name = self.name(),
            sender_id = %tracker.sender_id,
            intent = tracker.intent_name().unwrap_or("unknown"),
            "running action"
        );

        let reply = self.respond(&tracker.latest_utterance()).await;

        info!(
            event_name = "action.completed",
            action_name = self.name(),
            reply_kind = reply.kind.as_str(),
            "action replied"
        );
        dispatcher.utter_message(reply.text);
        Vec::new()
    }
}

/// Lists a random handful of the active fleet.
pub struct AskAvailableVehicles {
    context: Arc<ActionContext>,
}

impl AskAvailableVehicles {
    pub fn new(context: Arc<ActionContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Action for AskAvailableVehicles {
    fn name(&self) -> &'static str {
        ASK_AVAILABLE_VEHICLES
    }

    async fn respond(&self, _utterance: &str) -> ActionReply {
        let vehicles = match self.context.catalog().fetch_active_vehicles().await {
            Ok(vehicles) => vehicles,
            Err(error) => {
                error!(
                    event_name = "action.catalog.failed",
                    action_name = self.name(),
                    error_class = error.error_class(),
                    error = %error,
                    "vehicle list unavailable"
                );
                return ActionReply::failure(format!("Failed to fetch vehicles: {error}"));
            }
        };

        if vehicles.is_empty() {
            return ActionReply::no_match(NO_VEHICLES_AVAILABLE);
        }

        let presenter = self.context.presenter();
        let selected = self.context.sample(vehicles, presenter.limit());
        ActionReply::listing(presenter.render(&selected, ListingStyle::Availability))
    }
}

/// Recommends vehicles that carry every feature named in the message.
pub struct RecommendByFeature {
    context: Arc<ActionContext>,
}

impl RecommendByFeature {
    pub fn new(context: Arc<ActionContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Action for RecommendByFeature {
    fn name(&self) -> &'static str {
        RECOMMEND_BY_FEATURE
    }

    async fn respond(&self, utterance: &str) -> ActionReply {
        let requested = extract_features(utterance);
        if requested.is_empty() {
            return ActionReply::clarification(FEATURE_CLARIFICATION_PROMPT);
        }

        info!(
            event_name = "action.features.requested",
            features = ?requested.iter().map(|key| key.as_str()).collect::<Vec<_>>(),
            "matching vehicles by feature"
        );

        let vehicles = match self.context.catalog().fetch_active_vehicles().await {
            Ok(vehicles) => vehicles,
            Err(error) => {
                error!(
                    event_name = "action.catalog.failed",
                    action_name = self.name(),
                    error_class = error.error_class(),
                    error = %error,
                    "vehicle list unavailable"
                );
                return ActionReply::failure(format!("Error getting vehicles: {error}"));
            }
        };

        let candidates = self.context.shuffled(vehicles);
        let report = match_vehicles(self.context.catalog(), candidates, &requested).await;

        if report.unavailable_count() > 0 {
            warn!(
                event_name = "action.features.partial",
                skipped = report.unavailable_count(),
                "some vehicles were skipped because their options could not be read"
            );
        }
        info!(
            event_name = "action.features.matched",
            matched = report.matches.len(),
            options_fetched = report.options_fetched,
            "feature matching finished"
        );

        if report.matches.is_empty() {
            return ActionReply::no_match(NO_FEATURE_MATCHES);
        }

        let presenter = self.context.presenter();
        let selected = self.context.sample(report.matches, presenter.limit());
        ActionReply::listing(presenter.render(&selected, ListingStyle::Features))
    }
}

/// Filters the fleet by one transmission, chassis or horsepower requirement.
pub struct FilterBySpecs {
    context: Arc<ActionContext>,
}

impl FilterBySpecs {
    pub fn new(context: Arc<ActionContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Action for FilterBySpecs {
    fn name(&self) -> &'static str {
        FILTER_BY_SPECS
    }

    async fn respond(&self, utterance: &str) -> ActionReply {
        let vehicles = match self.context.catalog().fetch_active_vehicles().await {
            Ok(vehicles) => vehicles,
            Err(error) => {
                error!(
                    event_name = "action.catalog.failed",
                    action_name = self.name(),
                    error_class = error.error_class(),
                    error = %error,
                    "vehicle list unavailable"
                );
                return ActionReply::failure(format!("Couldn't load vehicles: {error}"));
            }
        };

        let matching = filter_by_specs(utterance, vehicles);
        info!(event_name = "action.specs.filtered", matched = matching.len(), "spec filtering finished");
        if matching.is_empty() {
            return ActionReply::no_match(NO_SPEC_MATCHES);
        }

        let presenter = self.context.presenter();
        let selected = self.context.sample(matching, presenter.limit());
        ActionReply::listing(presenter.render(&selected, ListingStyle::Specs))
    }
}
