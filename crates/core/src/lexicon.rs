use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Option field name as exposed by the catalog (`hillAssist`, `navigation`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeatureKey(pub String);

impl FeatureKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexiconEntry {
    pub phrase: String,
    pub key: FeatureKey,
}

const DEFAULT_ENTRIES: [(&str, &str); 4] = [
    ("hill assist", "hillAssist"),
    ("cruise control", "cruiseControl"),
    ("navigation", "navigation"),
    ("heads up display", "headsUpDisplay"),
];

/// Phrase table used to recognise requested vehicle features in free text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureLexicon {
    entries: Vec<LexiconEntry>,
}

impl FeatureLexicon {
    pub fn new<I, P, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (P, K)>,
        P: Into<String>,
        K: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(phrase, key)| LexiconEntry {
                phrase: phrase.into().to_lowercase(),
                key: FeatureKey::new(key),
            })
            .collect();
        Self { entries }
    }

    /// Process-wide table, built on first use and never mutated.
    pub fn global() -> &'static FeatureLexicon {
        static LEXICON: OnceLock<FeatureLexicon> = OnceLock::new();
        LEXICON.get_or_init(|| FeatureLexicon::new(DEFAULT_ENTRIES))
    }

    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.phrase.as_str())
    }

    /// Keys of every phrase contained in `utterance`, compared case-insensitively.
    pub fn extract(&self, utterance: &str) -> BTreeSet<FeatureKey> {
        let normalized = utterance.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| normalized.contains(entry.phrase.as_str()))
            .map(|entry| entry.key.clone())
            .collect()
    }
}

impl Default for FeatureLexicon {
    fn default() -> Self {
        Self::global().clone()
    }
}
