use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use fleetbot_agent::ActionRegistry;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    registry: Arc<ActionRegistry>,
    catalog_base_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub actions: HealthCheck,
    pub catalog_base_url: String,
    pub checked_at: String,
}

pub fn router(registry: Arc<ActionRegistry>, catalog_base_url: impl Into<String>) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(HealthState { registry, catalog_base_url: catalog_base_url.into() })
}

/// Readiness of the action server itself. The catalog is not probed here;
/// `fleetbot doctor` does that.
pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let ready = !state.registry.is_empty();
    let actions = if ready {
        HealthCheck {
            status: "ready",
            detail: format!("{} actions registered", state.registry.len()),
        }
    } else {
        HealthCheck { status: "degraded", detail: "no actions registered".to_string() }
    };

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "fleetbot-server runtime initialized".to_string(),
        },
        actions,
        catalog_base_url: state.catalog_base_url.clone(),
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode, Json};
    use fleetbot_agent::{ActionContext, ActionRegistry};
    use fleetbot_catalog::InMemoryCatalog;
    use fleetbot_core::Presenter;

    use crate::health::{health, HealthState};

    #[tokio::test]
    async fn health_returns_ready_with_registered_actions() {
        let context = ActionContext::new(
            Arc::new(InMemoryCatalog::default()),
            Presenter::new("http://localhost:4200"),
        );
        let registry = Arc::new(ActionRegistry::with_rental_actions(Arc::new(context)));

        let (status, Json(payload)) = health(State(HealthState {
            registry,
            catalog_base_url: "https://localhost:7093".to_string(),
        }))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.actions.detail, "3 actions registered");
        assert_eq!(payload.service.status, "ready");
    }

    #[tokio::test]
    async fn health_returns_service_unavailable_without_actions() {
        let (status, Json(payload)) = health(State(HealthState {
            registry: Arc::new(ActionRegistry::default()),
            catalog_base_url: "https://localhost:7093".to_string(),
        }))
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload.status, "degraded");
        assert_eq!(payload.actions.status, "degraded");
    }
}
