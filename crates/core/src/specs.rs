use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::domain::vehicle::Vehicle;

pub const CHASSIS_KEYWORDS: [&str; 4] = ["suv", "sedan", "limo", "pickup"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transmission {
    Automatic,
    Manual,
}

impl Transmission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Automatic => "automatic",
            Self::Manual => "manual",
        }
    }
}

/// The single filter chosen for an utterance. Rules are never combined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpecRule {
    Transmission(Transmission),
    /// Keeps vehicles whose chassis text occurs anywhere in the utterance.
    Chassis { utterance: String },
    MinHorsepower(u32),
}

impl SpecRule {
    /// Picks the first applicable rule: automatic, manual, chassis keyword,
    /// then a `<number> hp|horsepower` threshold.
    pub fn from_utterance(utterance: &str) -> Option<Self> {
        let normalized = utterance.to_lowercase();

        if normalized.contains("automatic") {
            return Some(Self::Transmission(Transmission::Automatic));
        }
        if normalized.contains("manual") {
            return Some(Self::Transmission(Transmission::Manual));
        }
        if CHASSIS_KEYWORDS.iter().any(|keyword| normalized.contains(keyword)) {
            return Some(Self::Chassis { utterance: normalized });
        }

        extract_min_horsepower(&normalized).map(Self::MinHorsepower)
    }

    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        match self {
            Self::Transmission(transmission) => {
                vehicle.transmission.eq_ignore_ascii_case(transmission.as_str())
            }
            // Plain substring test on the raw chassis text: a blank chassis matches
            // every chassis request and surrounding whitespace is significant.
            Self::Chassis { utterance } => utterance.contains(&vehicle.chassis.to_lowercase()),
            Self::MinHorsepower(threshold) => vehicle.horsepower >= *threshold,
        }
    }

    pub fn apply(&self, vehicles: Vec<Vehicle>) -> Vec<Vehicle> {
        vehicles.into_iter().filter(|vehicle| self.matches(vehicle)).collect()
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Transmission(transmission) => format!("transmission={}", transmission.as_str()),
            Self::Chassis { .. } => "chassis".to_string(),
            Self::MinHorsepower(threshold) => format!("horsepower>={threshold}"),
        }
    }
}

/// Vehicles matching the rule chosen for `utterance`; empty when no rule applies.
pub fn filter_by_specs(utterance: &str, vehicles: Vec<Vehicle>) -> Vec<Vehicle> {
    match SpecRule::from_utterance(utterance) {
        Some(rule) => {
            debug!(event_name = "specs.rule.selected", rule = %rule.describe(), "filtering by specification");
            rule.apply(vehicles)
        }
        None => {
            debug!(event_name = "specs.rule.none", "no specification recognised");
            Vec::new()
        }
    }
}

/// Threshold from the first `<integer> hp` / `<integer> horsepower` mention.
pub fn extract_min_horsepower(utterance: &str) -> Option<u32> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| Regex::new(r"(\d+)\s*(hp|horsepower)").ok()).as_ref()?;

    let normalized = utterance.to_lowercase();
    let captures = pattern.captures(&normalized)?;
    captures.get(1)?.as_str().parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use super::{extract_min_horsepower, filter_by_specs, SpecRule, Transmission};
    use crate::domain::vehicle::{Vehicle, VehicleId};

    fn vehicle(id: &str, chassis: &str, transmission: &str, horsepower: u32) -> Vehicle {
        Vehicle {
            id: VehicleId::new(id),
            make: "Make".to_string(),
            model: id.to_string(),
            chassis: chassis.to_string(),
            transmission: transmission.to_string(),
            horsepower,
            price_per_day: Default::default(),
        }
    }

    fn ids(vehicles: &[Vehicle]) -> Vec<&str> {
        vehicles.iter().map(|vehicle| vehicle.id.as_str()).collect()
    }

    fn fleet() -> Vec<Vehicle> {
        vec![
            vehicle("a", "SUV", "Automatic", 250),
            vehicle("b", "Sedan", "manual", 180),
            vehicle("c", "Limo", "automatic", 400),
            vehicle("d", "Pickup", "Manual", 300),
            vehicle("e", "Coupe", "automatic", 299),
        ]
    }

    #[test]
    fn automatic_wins_over_manual() {
        let rule = SpecRule::from_utterance("automatic or manual, either is fine");
        assert_eq!(rule, Some(SpecRule::Transmission(Transmission::Automatic)));
    }

    #[test]
    fn transmission_comparison_ignores_case() {
        let automatic = filter_by_specs("an AUTOMATIC car", fleet());
        assert_eq!(ids(&automatic), vec!["a", "c", "e"]);

        let manual = filter_by_specs("something manual", fleet());
        assert_eq!(ids(&manual), vec!["b", "d"]);
    }

    #[test]
    fn transmission_rule_beats_chassis_and_horsepower() {
        let filtered = filter_by_specs("manual suv with 500 hp", fleet());
        assert_eq!(ids(&filtered), vec!["b", "d"]);
    }

    #[test]
    fn chassis_match_is_substring_of_the_utterance() {
        let filtered = filter_by_specs("I want an suv please", vec![vehicle("x", "suv", "", 0)]);
        assert_eq!(ids(&filtered), vec!["x"]);

        let both = filter_by_specs("a sedan or a limo", fleet());
        assert_eq!(ids(&both), vec!["b", "c"]);
    }

    #[test]
    fn chassis_match_accepts_keyword_inside_another_word() {
        let filtered = filter_by_specs("any suvs left?", vec![vehicle("x", "SUV", "", 0)]);
        assert_eq!(ids(&filtered), vec!["x"]);
    }

    #[test]
    fn blank_chassis_matches_any_chassis_request() {
        let filtered = filter_by_specs("a sedan please", vec![vehicle("x", "", "", 0)]);
        assert_eq!(ids(&filtered), vec!["x"]);
    }

    #[test]
    fn chassis_whitespace_is_not_trimmed() {
        let padded = vec![vehicle("x", "SUV ", "", 0)];

        assert!(filter_by_specs("an suv", padded.clone()).is_empty());
        assert_eq!(ids(&filter_by_specs("an suv please", padded)), vec!["x"]);
    }

    #[test]
    fn transmission_whitespace_is_not_trimmed() {
        let filtered = filter_by_specs("automatic", vec![vehicle("x", "SUV", " Automatic", 0)]);
        assert!(filtered.is_empty());
    }

    #[test]
    fn horsepower_threshold_is_inclusive() {
        assert_eq!(extract_min_horsepower("need at least 300 hp"), Some(300));

        let filtered = filter_by_specs(
            "need at least 300 hp",
            vec![vehicle("low", "coupe", "", 299), vehicle("exact", "coupe", "", 300)],
        );
        assert_eq!(ids(&filtered), vec!["exact"]);
    }

    #[test]
    fn horsepower_unit_variants_are_recognised() {
        assert_eq!(extract_min_horsepower("over 450hp"), Some(450));
        assert_eq!(extract_min_horsepower("200 Horsepower minimum"), Some(200));
        assert_eq!(extract_min_horsepower("150   hp"), Some(150));
        assert_eq!(extract_min_horsepower("fast please"), None);
        assert_eq!(extract_min_horsepower("99999999999 hp"), None);
    }

    #[test]
    fn first_horsepower_mention_is_used() {
        assert_eq!(extract_min_horsepower("between 200 hp and 400 hp"), Some(200));
    }

    #[test]
    fn no_rule_yields_no_vehicles() {
        assert_eq!(SpecRule::from_utterance("something nice"), None);
        assert!(filter_by_specs("something nice", fleet()).is_empty());
    }

    #[test]
    fn rule_descriptions_name_the_constraint() {
        assert_eq!(SpecRule::MinHorsepower(300).describe(), "horsepower>=300");
        assert_eq!(
            SpecRule::Transmission(Transmission::Manual).describe(),
            "transmission=manual"
        );
    }
}
