use std::sync::Arc;

use fleetbot_agent::{ActionContext, ActionRegistry, DispatchError, Tracker};
use fleetbot_catalog::HttpCatalog;
use fleetbot_core::config::{AppConfig, LoadOptions};
use fleetbot_core::Presenter;
use serde_json::Value;

use crate::commands::{CommandResult, EXIT_CONFIG, EXIT_RUNTIME, EXIT_UNKNOWN_ACTION};

const SENDER_ID: &str = "fleetbot-cli";

/// Runs one action against the configured catalog. The reply text becomes the
/// envelope message; catalog trouble still yields a reply, as it would in chat.
pub fn run(action: &str, utterance: &str) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "ask",
                "config_validation",
                format!("config validation failed: {error}"),
                EXIT_CONFIG,
            )
        }
    };

    let catalog = match HttpCatalog::from_config(&config.catalog) {
        Ok(catalog) => catalog,
        Err(error) => {
            return CommandResult::failure("ask", "catalog_client", error.to_string(), EXIT_RUNTIME)
        }
    };

    let presenter = Presenter::new(config.catalog.link_base_url.clone());
    let registry =
        ActionRegistry::with_rental_actions(Arc::new(ActionContext::new(Arc::new(catalog), presenter)));

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "ask",
                "runtime",
                format!("failed to initialize async runtime: {error}"),
                EXIT_RUNTIME,
            )
        }
    };

    let tracker = Tracker::from_text(SENDER_ID, utterance);
    let response = runtime.block_on(registry.dispatch(action, &tracker, &Value::Null));

    match response {
        Ok(response) => {
            let text = response
                .responses
                .into_iter()
                .map(|message| message.text)
                .collect::<Vec<_>>()
                .join("\n");
            CommandResult::success("ask", text)
        }
        Err(error @ DispatchError::UnknownAction(_)) => CommandResult::failure(
            "ask",
            "unknown_action",
            format!("{error}; known actions: {}", registry.names().join(", ")),
            EXIT_UNKNOWN_ACTION,
        ),
    }
}
