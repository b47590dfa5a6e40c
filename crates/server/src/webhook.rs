use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use fleetbot_agent::{ActionRegistry, DispatchError, Domain, Tracker};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Action call as posted by the dialogue runtime.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ActionCall {
    pub next_action: String,
    #[serde(default)]
    pub sender_id: Option<String>,
    #[serde(default)]
    pub tracker: Tracker,
    #[serde(default)]
    pub domain: Domain,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCallError {
    pub error: String,
    pub action_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionList {
    pub actions: Vec<String>,
}

#[derive(Clone)]
pub struct WebhookState {
    registry: Arc<ActionRegistry>,
}

pub fn router(registry: Arc<ActionRegistry>) -> Router {
    Router::new()
        .route("/webhook", post(webhook))
        .route("/actions", get(list_actions))
        .with_state(WebhookState { registry })
}

pub async fn webhook(State(state): State<WebhookState>, Json(mut call): Json<ActionCall>) -> Response {
    let correlation_id = Uuid::new_v4();
    if call.tracker.sender_id.is_empty() {
        call.tracker.sender_id = call.sender_id.clone().unwrap_or_default();
    }

    let span = info_span!(
        "action_call",
        correlation_id = %correlation_id,
        action_name = %call.next_action,
    );

    async move {
        info!(event_name = "server.webhook.received", "action call received");

        match state.registry.dispatch(&call.next_action, &call.tracker, &call.domain).await {
            Ok(response) => (StatusCode::OK, Json(response)).into_response(),
            Err(error @ DispatchError::UnknownAction(_)) => (
                StatusCode::NOT_FOUND,
                Json(ActionCallError {
                    error: error.to_string(),
                    action_name: call.next_action.clone(),
                }),
            )
                .into_response(),
        }
    }
    .instrument(span)
    .await
}

pub async fn list_actions(State(state): State<WebhookState>) -> Json<ActionList> {
    let actions = state.registry.names().into_iter().map(str::to_string).collect();
    Json(ActionList { actions })
}
