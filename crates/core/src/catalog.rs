use async_trait::async_trait;

use crate::domain::vehicle::{Vehicle, VehicleId, VehicleOptions};
use crate::errors::CatalogError;

/// Result of an options lookup that reached the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionsLookup {
    Found(VehicleOptions),
    /// The catalog answered with a non-success status; the vehicle is skipped.
    Unavailable { status: u16 },
}

/// Read-only view of the vehicle catalog.
#[async_trait]
pub trait VehicleCatalog: Send + Sync {
    async fn fetch_active_vehicles(&self) -> Result<Vec<Vehicle>, CatalogError>;

    async fn fetch_vehicle_options(
        &self,
        vehicle_id: &VehicleId,
    ) -> Result<OptionsLookup, CatalogError>;
}
