use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::catalog::{OptionsLookup, VehicleCatalog};
use crate::domain::vehicle::{Vehicle, VehicleId};
use crate::lexicon::{FeatureKey, FeatureLexicon};

pub const FEATURE_CLARIFICATION_PROMPT: &str =
    "Please specify a feature like hill assist, navigation, cruise control or heads up display.";

/// Features from the process-wide lexicon mentioned in `utterance`.
pub fn extract_features(utterance: &str) -> BTreeSet<FeatureKey> {
    FeatureLexicon::global().extract(utterance)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    BlankId,
    OptionsUnavailable { status: u16 },
    LookupFailed(String),
    MissingFeatures,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedVehicle {
    pub vehicle_id: VehicleId,
    pub reason: SkipReason,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchReport {
    pub matches: Vec<Vehicle>,
    pub skipped: Vec<SkippedVehicle>,
    pub options_fetched: usize,
}

impl MatchReport {
    /// Skips caused by the catalog rather than by the vehicle lacking a feature.
    pub fn unavailable_count(&self) -> usize {
        self.skipped
            .iter()
            .filter(|skipped| {
                matches!(
                    skipped.reason,
                    SkipReason::OptionsUnavailable { .. } | SkipReason::LookupFailed(_)
                )
            })
            .count()
    }
}

/// Keeps the vehicles whose options include every requested feature.
///
/// Options are fetched one vehicle at a time in input order. A lookup that
/// fails or comes back unavailable only skips that vehicle. Output keeps the
/// input order; callers shuffle before presenting.
pub async fn match_vehicles<C>(
    catalog: &C,
    vehicles: Vec<Vehicle>,
    requested: &BTreeSet<FeatureKey>,
) -> MatchReport
where
    C: VehicleCatalog + ?Sized,
{
    let mut report = MatchReport::default();
    if requested.is_empty() {
        return report;
    }

    for vehicle in vehicles {
        if vehicle.id.is_blank() {
            report
                .skipped
                .push(SkippedVehicle { vehicle_id: vehicle.id.clone(), reason: SkipReason::BlankId });
            continue;
        }

        debug!(
            event_name = "features.options.fetch",
            vehicle_id = %vehicle.id,
            "fetching vehicle options"
        );
        let lookup = catalog.fetch_vehicle_options(&vehicle.id).await;
        report.options_fetched += 1;

        let reason = match lookup {
            Ok(OptionsLookup::Found(options)) if options.has_all(requested) => {
                debug!(
                    event_name = "features.options.matched",
                    vehicle_id = %vehicle.id,
                    vehicle = %vehicle.display_name(),
                    "vehicle matched requested features"
                );
                report.matches.push(vehicle);
                continue;
            }
            Ok(OptionsLookup::Found(_)) => SkipReason::MissingFeatures,
            Ok(OptionsLookup::Unavailable { status }) => {
                warn!(
                    event_name = "features.options.unavailable",
                    vehicle_id = %vehicle.id,
                    status,
                    "no options data for vehicle"
                );
                SkipReason::OptionsUnavailable { status }
            }
            Err(error) => {
                warn!(
                    event_name = "features.options.failed",
                    vehicle_id = %vehicle.id,
                    error = %error,
                    "options lookup failed; skipping vehicle"
                );
                SkipReason::LookupFailed(error.to_string())
            }
        };

        report.skipped.push(SkippedVehicle { vehicle_id: vehicle.id, reason });
    }

    report
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashMap};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{extract_features, match_vehicles, SkipReason};
    use crate::catalog::{OptionsLookup, VehicleCatalog};
    use crate::domain::vehicle::{Vehicle, VehicleId, VehicleOptions};
    use crate::errors::CatalogError;
    use crate::lexicon::FeatureKey;

    #[derive(Default)]
    struct ScriptedCatalog {
        vehicles: Vec<Vehicle>,
        options: HashMap<String, Result<OptionsLookup, CatalogError>>,
        lookups: Mutex<Vec<String>>,
    }

    impl ScriptedCatalog {
        fn with_options(mut self, id: &str, lookup: Result<OptionsLookup, CatalogError>) -> Self {
            self.options.insert(id.to_string(), lookup);
            self
        }

        fn lookups(&self) -> Vec<String> {
            self.lookups.lock().map(|calls| calls.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl VehicleCatalog for ScriptedCatalog {
        async fn fetch_active_vehicles(&self) -> Result<Vec<Vehicle>, CatalogError> {
            Ok(self.vehicles.clone())
        }

        async fn fetch_vehicle_options(
            &self,
            vehicle_id: &VehicleId,
        ) -> Result<OptionsLookup, CatalogError> {
            if let Ok(mut calls) = self.lookups.lock() {
                calls.push(vehicle_id.0.clone());
            }
            self.options
                .get(vehicle_id.as_str())
                .cloned()
                .unwrap_or(Ok(OptionsLookup::Unavailable { status: 404 }))
        }
    }

    fn vehicle(id: &str) -> Vehicle {
        Vehicle {
            id: VehicleId::new(id),
            make: "Make".to_string(),
            model: format!("Model-{id}"),
            chassis: "sedan".to_string(),
            transmission: "automatic".to_string(),
            horsepower: 150,
            price_per_day: Default::default(),
        }
    }

    fn found(flags: &[(&str, bool)]) -> Result<OptionsLookup, CatalogError> {
        Ok(OptionsLookup::Found(VehicleOptions::from_flags(flags.iter().copied())))
    }

    fn keys(values: &[&str]) -> BTreeSet<FeatureKey> {
        values.iter().map(|value| FeatureKey::new(*value)).collect()
    }

    #[test]
    fn utterance_without_known_phrases_extracts_nothing() {
        assert!(extract_features("show me something fast and red").is_empty());
        assert!(extract_features("").is_empty());
    }

    #[test]
    fn utterance_with_multiple_phrases_extracts_each_key() {
        let features = extract_features("I need hill assist and a heads up display");
        assert_eq!(features, keys(&["headsUpDisplay", "hillAssist"]));
    }

    #[tokio::test]
    async fn empty_request_performs_no_lookups() {
        let catalog = ScriptedCatalog::default();
        let report = match_vehicles(&catalog, vec![vehicle("1")], &BTreeSet::new()).await;

        assert!(report.matches.is_empty());
        assert_eq!(report.options_fetched, 0);
        assert!(catalog.lookups().is_empty());
    }

    #[tokio::test]
    async fn partial_matches_are_excluded() {
        let catalog = ScriptedCatalog::default()
            .with_options("1", found(&[("navigation", true), ("cruiseControl", true)]))
            .with_options("2", found(&[("navigation", true), ("cruiseControl", false)]))
            .with_options("3", found(&[("navigation", true)]));

        let report = match_vehicles(
            &catalog,
            vec![vehicle("1"), vehicle("2"), vehicle("3")],
            &keys(&["navigation", "cruiseControl"]),
        )
        .await;

        let matched = report.matches.iter().map(|v| v.id.0.as_str()).collect::<Vec<_>>();
        assert_eq!(matched, vec!["1"]);
        assert_eq!(report.skipped.len(), 2);
        assert!(report.skipped.iter().all(|skip| skip.reason == SkipReason::MissingFeatures));
    }

    #[tokio::test]
    async fn unavailable_and_failed_lookups_do_not_abort_evaluation() {
        let catalog = ScriptedCatalog::default()
            .with_options("1", Ok(OptionsLookup::Unavailable { status: 404 }))
            .with_options("2", Err(CatalogError::transport("connection reset")))
            .with_options("3", found(&[("hillAssist", true)]));

        let report = match_vehicles(
            &catalog,
            vec![vehicle("1"), vehicle("2"), vehicle("3")],
            &keys(&["hillAssist"]),
        )
        .await;

        assert_eq!(catalog.lookups(), vec!["1", "2", "3"]);
        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.matches[0].id, VehicleId::new("3"));
        assert_eq!(report.unavailable_count(), 2);
        assert_eq!(report.options_fetched, 3);
    }

    #[tokio::test]
    async fn blank_ids_are_skipped_without_lookup() {
        let catalog =
            ScriptedCatalog::default().with_options("5", found(&[("navigation", true)]));

        let report =
            match_vehicles(&catalog, vec![vehicle("0"), vehicle("5")], &keys(&["navigation"]))
                .await;

        assert_eq!(catalog.lookups(), vec!["5"]);
        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.skipped[0].reason, SkipReason::BlankId);
    }

    #[tokio::test]
    async fn every_match_carries_all_requested_features() {
        let mut catalog = ScriptedCatalog::default();
        let mut vehicles = Vec::new();
        for index in 1..=20 {
            let id = index.to_string();
            let navigation = index % 2 == 0;
            let hud = index % 3 == 0;
            catalog = catalog
                .with_options(&id, found(&[("navigation", navigation), ("headsUpDisplay", hud)]));
            vehicles.push(vehicle(&id));
        }

        let requested = keys(&["navigation", "headsUpDisplay"]);
        let report = match_vehicles(&catalog, vehicles, &requested).await;

        let matched = report.matches.iter().map(|v| v.id.0.clone()).collect::<Vec<_>>();
        assert_eq!(matched, vec!["6", "12", "18"]);
    }
}
