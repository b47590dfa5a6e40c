use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::lexicon::FeatureKey;

/// Catalog identifier. The catalog serializes ids as integers; string ids are
/// accepted as well and both are kept in their textual form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawVehicleId")]
pub struct VehicleId(pub String);

impl VehicleId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// A blank or zero id cannot be used to address the options endpoint.
    pub fn is_blank(&self) -> bool {
        let trimmed = self.0.trim();
        trimmed.is_empty() || trimmed == "0"
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawVehicleId {
    Number(serde_json::Number),
    Text(String),
    Null(()),
}

impl From<RawVehicleId> for VehicleId {
    fn from(value: RawVehicleId) -> Self {
        match value {
            RawVehicleId::Number(number) => Self(number.to_string()),
            RawVehicleId::Text(text) => Self(text),
            RawVehicleId::Null(()) => Self::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(default)]
    pub id: VehicleId,
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub chassis: String,
    #[serde(default)]
    pub transmission: String,
    #[serde(default)]
    pub horsepower: u32,
    #[serde(default)]
    pub price_per_day: Decimal,
}

impl Vehicle {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.make, self.model)
    }
}

/// Option flags reported by the catalog for one vehicle.
///
/// The catalog payload also carries bookkeeping members (`id`, `vehicleId`);
/// only boolean members are kept. A key that is absent reads as `false`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<String, Value>")]
pub struct VehicleOptions {
    flags: BTreeMap<String, bool>,
}

impl VehicleOptions {
    pub fn from_flags<I, K>(flags: I) -> Self
    where
        I: IntoIterator<Item = (K, bool)>,
        K: Into<String>,
    {
        Self { flags: flags.into_iter().map(|(key, value)| (key.into(), value)).collect() }
    }

    pub fn has(&self, feature: &FeatureKey) -> bool {
        self.flags.get(feature.as_str()).copied().unwrap_or(false)
    }

    pub fn has_all(&self, features: &BTreeSet<FeatureKey>) -> bool {
        features.iter().all(|feature| self.has(feature))
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl From<BTreeMap<String, Value>> for VehicleOptions {
    fn from(raw: BTreeMap<String, Value>) -> Self {
        let flags = raw
            .into_iter()
            .filter_map(|(key, value)| value.as_bool().map(|flag| (key, flag)))
            .collect();
        Self { flags }
    }
}
