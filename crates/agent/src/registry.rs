use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::actions::{Action, AskAvailableVehicles, FilterBySpecs, RecommendByFeature};
use crate::context::ActionContext;
use crate::runtime::{BotMessage, CollectingDispatcher, Domain, Event, Tracker};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("no action registered under `{0}`")]
    UnknownAction(String),
}

/// What the runtime receives after one action call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub events: Vec<Event>,
    pub responses: Vec<BotMessage>,
}

/// Actions addressable by the name the dialogue runtime uses.
#[derive(Default)]
pub struct ActionRegistry {
    actions: HashMap<String, Arc<dyn Action>>,
}

impl ActionRegistry {
    /// Registry holding the three rental actions over one shared context.
    pub fn with_rental_actions(context: Arc<ActionContext>) -> Self {
        let mut registry = Self::default();
        registry.register(AskAvailableVehicles::new(context.clone()));
        registry.register(RecommendByFeature::new(context.clone()));
        registry.register(FilterBySpecs::new(context));
        registry
    }

    pub fn register<A>(&mut self, action: A)
    where
        A: Action + 'static,
    {
        self.actions.insert(action.name().to_string(), Arc::new(action));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Action>> {
        self.actions.get(name).cloned()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names = self.actions.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub async fn dispatch(
        &self,
        name: &str,
        tracker: &Tracker,
        domain: &Domain,
    ) -> Result<ActionResponse, DispatchError> {
        let Some(action) = self.get(name) else {
            warn!(event_name = "action.unknown", action_name = name, "unknown action requested");
            return Err(DispatchError::UnknownAction(name.to_string()));
        };

        let mut dispatcher = CollectingDispatcher::new();
        let events = action.run(&mut dispatcher, tracker, domain).await;
        Ok(ActionResponse { events, responses: dispatcher.into_messages() })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use fleetbot_catalog::InMemoryCatalog;
    use fleetbot_core::features::FEATURE_CLARIFICATION_PROMPT;
    use fleetbot_core::Presenter;
    use serde_json::json;

    use super::{ActionRegistry, DispatchError};
    use crate::context::ActionContext;
    use crate::runtime::Tracker;

    fn registry() -> ActionRegistry {
        let context = ActionContext::new(
            Arc::new(InMemoryCatalog::default()),
            Presenter::new("http://localhost:4200"),
        );
        ActionRegistry::with_rental_actions(Arc::new(context))
    }

    #[test]
    fn registers_the_three_rental_actions() {
        let registry = registry();

        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.names(),
            vec![
                "action_ask_available_vehicles",
                "action_filter_by_specs",
                "action_recommend_by_feature"
            ]
        );
    }

    #[tokio::test]
    async fn dispatch_runs_named_action() {
        let tracker = Tracker::from_text("user-1", "Recommend me something nice");

        let response = registry()
            .dispatch("action_recommend_by_feature", &tracker, &json!({}))
            .await
            .expect("known action");

        assert!(response.events.is_empty());
        assert_eq!(response.responses.len(), 1);
        assert_eq!(response.responses[0].text, FEATURE_CLARIFICATION_PROMPT);
    }

    #[tokio::test]
    async fn dispatch_rejects_unknown_action() {
        let result = registry().dispatch("action_book_vehicle", &Tracker::default(), &json!({})).await;

        assert_eq!(result, Err(DispatchError::UnknownAction("action_book_vehicle".to_string())));
    }
}
