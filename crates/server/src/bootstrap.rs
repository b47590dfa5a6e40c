use std::sync::Arc;

use fleetbot_agent::{ActionContext, ActionRegistry};
use fleetbot_catalog::HttpCatalog;
use fleetbot_core::config::{AppConfig, ConfigError};
use fleetbot_core::{CatalogError, Presenter};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub registry: Arc<ActionRegistry>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("catalog client could not be created: {0}")]
    Catalog(#[source] CatalogError),
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );
    config.validate()?;

    let catalog = HttpCatalog::from_config(&config.catalog).map_err(BootstrapError::Catalog)?;
    info!(
        event_name = "system.bootstrap.catalog_ready",
        correlation_id = "bootstrap",
        catalog_base_url = %catalog.base_url(),
        timeout_secs = config.catalog.timeout_secs,
        "catalog client configured"
    );

    let presenter = Presenter::new(config.catalog.link_base_url.clone());
    let context = ActionContext::new(Arc::new(catalog), presenter);
    let registry = ActionRegistry::with_rental_actions(Arc::new(context));
    info!(
        event_name = "system.bootstrap.actions_registered",
        correlation_id = "bootstrap",
        action_count = registry.len(),
        "chat actions registered"
    );

    Ok(Application { config, registry: Arc::new(registry) })
}

#[cfg(test)]
mod tests {
    use fleetbot_core::config::AppConfig;

    use crate::bootstrap::bootstrap_with_config;

    #[tokio::test]
    async fn bootstrap_fails_fast_on_invalid_catalog_url() {
        let mut config = AppConfig::default();
        config.catalog.base_url = "ftp://catalog.local".to_string();

        let message = bootstrap_with_config(config).await.err().expect("error").to_string();
        assert!(message.contains("catalog.base_url"), "unexpected error: {message}");
    }

    #[tokio::test]
    async fn bootstrap_registers_rental_actions() {
        let mut config = AppConfig::default();
        config.catalog.base_url = "http://127.0.0.1:9".to_string();
        config.catalog.timeout_secs = 2;

        let app = bootstrap_with_config(config)
            .await
            .expect("bootstrap should succeed with a valid config");

        assert_eq!(app.registry.len(), 3);
        assert_eq!(app.config.catalog.timeout_secs, 2);
    }
}
