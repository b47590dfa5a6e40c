use std::time::Duration;

use async_trait::async_trait;
use fleetbot_core::config::CatalogConfig;
use fleetbot_core::{CatalogError, OptionsLookup, Vehicle, VehicleCatalog, VehicleId, VehicleOptions};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

/// Catalog client backed by the rental service's REST API.
#[derive(Clone, Debug)]
pub struct HttpCatalog {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpCatalog {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        accept_invalid_certs: bool,
    ) -> Result<Self, CatalogError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        if accept_invalid_certs {
            warn!(
                event_name = "catalog.tls.validation_disabled",
                base_url = %base_url,
                "catalog certificate validation is disabled; use only against development catalogs"
            );
        }

        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(|error| {
                CatalogError::transport(format!("failed to build catalog client: {error}"))
            })?;

        Ok(Self { client, base_url, timeout })
    }

    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
            config.accept_invalid_certs,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn active_vehicles_url(&self) -> String {
        format!("{}/api/vehicle?onlyActive=true", self.base_url)
    }

    fn options_url(&self, vehicle_id: &VehicleId) -> String {
        format!("{}/api/vehicle/{}/options", self.base_url, vehicle_id)
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, CatalogError> {
        self.client.get(url).send().await.map_err(|error| self.transport_error(url, error))
    }

    async fn read_body(&self, url: &str, response: reqwest::Response) -> Result<String, CatalogError> {
        response.text().await.map_err(|error| self.transport_error(url, error))
    }

    fn transport_error(&self, url: &str, error: reqwest::Error) -> CatalogError {
        if error.is_timeout() {
            return CatalogError::transport(format!(
                "request to {url} timed out after {}s",
                self.timeout.as_secs()
            ));
        }
        CatalogError::transport(format!("request to {url} failed: {error}"))
    }
}

#[async_trait]
impl VehicleCatalog for HttpCatalog {
    async fn fetch_active_vehicles(&self) -> Result<Vec<Vehicle>, CatalogError> {
        let url = self.active_vehicles_url();
        let response = self.get(&url).await?;
        let status = response.status();
        debug!(event_name = "catalog.vehicles.status", status = status.as_u16(), "vehicle list fetched");

        if !status.is_success() {
            return Err(CatalogError::transport(format!("catalog returned {status} for {url}")));
        }

        let body = self.read_body(&url, response).await?;
        serde_json::from_str::<Vec<Vehicle>>(&body)
            .map_err(|error| CatalogError::decode(format!("vehicle list: {error}")))
    }

    async fn fetch_vehicle_options(
        &self,
        vehicle_id: &VehicleId,
    ) -> Result<OptionsLookup, CatalogError> {
        let url = self.options_url(vehicle_id);
        let response = self.get(&url).await?;
        let status = response.status();

        if status != StatusCode::OK {
            return Ok(OptionsLookup::Unavailable { status: status.as_u16() });
        }

        let body = self.read_body(&url, response).await?;
        serde_json::from_str::<VehicleOptions>(&body)
            .map(OptionsLookup::Found)
            .map_err(|error| {
                CatalogError::decode(format!("options for vehicle {vehicle_id}: {error}"))
            })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use fleetbot_core::config::CatalogConfig;
    use fleetbot_core::VehicleId;

    use super::HttpCatalog;

    #[test]
    fn urls_are_built_from_trimmed_base() {
        let catalog = HttpCatalog::new("https://catalog.local:7093/", Duration::from_secs(5), false)
            .expect("client builds");

        assert_eq!(catalog.base_url(), "https://catalog.local:7093");
        assert_eq!(
            catalog.active_vehicles_url(),
            "https://catalog.local:7093/api/vehicle?onlyActive=true"
        );
        assert_eq!(
            catalog.options_url(&VehicleId::new("17")),
            "https://catalog.local:7093/api/vehicle/17/options"
        );
    }

    #[test]
    fn builds_from_config_with_development_opt_out() {
        let config = CatalogConfig {
            base_url: "https://localhost:7093".to_string(),
            link_base_url: "http://localhost:4200".to_string(),
            timeout_secs: 3,
            accept_invalid_certs: true,
        };

        let catalog = HttpCatalog::from_config(&config).expect("client builds");
        assert_eq!(catalog.timeout, Duration::from_secs(3));
    }
}
