use std::sync::{Arc, Mutex, PoisonError};

use fleetbot_core::{shuffle_and_truncate, Presenter, Vehicle, VehicleCatalog};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Shared dependencies of the rental actions.
pub struct ActionContext {
    catalog: Arc<dyn VehicleCatalog>,
    presenter: Presenter,
    rng: Mutex<StdRng>,
}

impl ActionContext {
    pub fn new(catalog: Arc<dyn VehicleCatalog>, presenter: Presenter) -> Self {
        Self {
            catalog,
            presenter,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic shuffling for tests and reproducible CLI runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn catalog(&self) -> &dyn VehicleCatalog {
        self.catalog.as_ref()
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    /// Random sample of at most `limit` vehicles.
    pub fn sample(&self, vehicles: Vec<Vehicle>, limit: usize) -> Vec<Vehicle> {
        // The lock is only held for the shuffle, never across an await.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        shuffle_and_truncate(vehicles, &mut *rng, limit)
    }

    /// Same vehicles in random order.
    pub fn shuffled(&self, vehicles: Vec<Vehicle>) -> Vec<Vehicle> {
        let len = vehicles.len();
        self.sample(vehicles, len)
    }
}
