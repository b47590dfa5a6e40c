use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use fleetbot_core::{CatalogError, OptionsLookup, Vehicle, VehicleCatalog, VehicleId, VehicleOptions};

/// Fixed fleet served from memory. Vehicles without registered options answer
/// `Unavailable { status: 404 }`, like the catalog does for unknown ids.
#[derive(Default)]
pub struct InMemoryCatalog {
    vehicles: Vec<Vehicle>,
    options: HashMap<VehicleId, Result<OptionsLookup, CatalogError>>,
    list_failure: Option<CatalogError>,
    list_calls: AtomicUsize,
    option_calls: AtomicUsize,
}

impl InMemoryCatalog {
    pub fn new(vehicles: Vec<Vehicle>) -> Self {
        Self { vehicles, ..Self::default() }
    }

    pub fn with_options(mut self, vehicle_id: impl Into<String>, options: VehicleOptions) -> Self {
        self.options.insert(VehicleId::new(vehicle_id), Ok(OptionsLookup::Found(options)));
        self
    }

    pub fn with_unavailable_options(mut self, vehicle_id: impl Into<String>, status: u16) -> Self {
        self.options.insert(VehicleId::new(vehicle_id), Ok(OptionsLookup::Unavailable { status }));
        self
    }

    pub fn with_failing_options(mut self, vehicle_id: impl Into<String>, error: CatalogError) -> Self {
        self.options.insert(VehicleId::new(vehicle_id), Err(error));
        self
    }

    pub fn with_list_failure(mut self, error: CatalogError) -> Self {
        self.list_failure = Some(error);
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn option_calls(&self) -> usize {
        self.option_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.list_calls() + self.option_calls()
    }
}

#[async_trait]
impl VehicleCatalog for InMemoryCatalog {
    async fn fetch_active_vehicles(&self) -> Result<Vec<Vehicle>, CatalogError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        match &self.list_failure {
            Some(error) => Err(error.clone()),
            None => Ok(self.vehicles.clone()),
        }
    }

    async fn fetch_vehicle_options(
        &self,
        vehicle_id: &VehicleId,
    ) -> Result<OptionsLookup, CatalogError> {
        self.option_calls.fetch_add(1, Ordering::SeqCst);
        self.options
            .get(vehicle_id)
            .cloned()
            .unwrap_or(Ok(OptionsLookup::Unavailable { status: 404 }))
    }
}

#[cfg(test)]
mod tests {
    use fleetbot_core::{CatalogError, OptionsLookup, Vehicle, VehicleCatalog, VehicleId, VehicleOptions};

    use super::InMemoryCatalog;

    fn vehicle(id: &str) -> Vehicle {
        Vehicle {
            id: VehicleId::new(id),
            make: "Skoda".to_string(),
            model: "Octavia".to_string(),
            chassis: "Sedan".to_string(),
            transmission: "Manual".to_string(),
            horsepower: 150,
            price_per_day: Default::default(),
        }
    }

    #[tokio::test]
    async fn serves_registered_fleet_and_counts_calls() {
        let catalog = InMemoryCatalog::new(vec![vehicle("1"), vehicle("2")])
            .with_options("1", VehicleOptions::from_flags([("navigation", true)]));

        let vehicles = catalog.fetch_active_vehicles().await.expect("list");
        let found = catalog.fetch_vehicle_options(&VehicleId::new("1")).await.expect("options");
        let missing = catalog.fetch_vehicle_options(&VehicleId::new("2")).await.expect("options");

        assert_eq!(vehicles.len(), 2);
        assert!(matches!(found, OptionsLookup::Found(_)));
        assert_eq!(missing, OptionsLookup::Unavailable { status: 404 });
        assert_eq!(catalog.list_calls(), 1);
        assert_eq!(catalog.option_calls(), 2);
    }

    #[tokio::test]
    async fn scripted_failures_are_returned() {
        let catalog = InMemoryCatalog::default()
            .with_list_failure(CatalogError::decode("truncated body"))
            .with_failing_options("9", CatalogError::transport("reset"))
            .with_unavailable_options("8", 500);

        assert_eq!(
            catalog.fetch_active_vehicles().await,
            Err(CatalogError::decode("truncated body"))
        );
        assert!(catalog.fetch_vehicle_options(&VehicleId::new("9")).await.is_err());
        assert_eq!(
            catalog.fetch_vehicle_options(&VehicleId::new("8")).await,
            Ok(OptionsLookup::Unavailable { status: 500 })
        );
        assert_eq!(catalog.total_calls(), 3);
    }
}
