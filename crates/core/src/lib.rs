//! Fleetbot core: vehicle domain, configuration, and the query-to-filter
//! pipeline used by the chat actions.
//!
//! - `features` recognises requested options and keeps vehicles that have all of them
//! - `specs` picks one transmission, chassis or horsepower rule from an utterance
//! - `presenter` shuffles, caps and renders result lists
//! - `catalog` is the read-only seam to the remote vehicle catalog

pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod features;
pub mod lexicon;
pub mod presenter;
pub mod specs;

pub use catalog::{OptionsLookup, VehicleCatalog};
pub use domain::vehicle::{Vehicle, VehicleId, VehicleOptions};
pub use errors::CatalogError;
pub use features::{extract_features, match_vehicles, MatchReport, SkipReason};
pub use lexicon::{FeatureKey, FeatureLexicon};
pub use presenter::{shuffle_and_truncate, ListingStyle, Presenter, RESULT_LIMIT};
pub use specs::{filter_by_specs, SpecRule, Transmission};
