use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracescope_types::{ClassificationRecord, RuleEntry};

/// Text returned by [`RuleCatalog::definition_for`] when no rule contributes a definition
pub const NO_DEFINITION: &str = "No specific definition available for this stack trace.";

/// Reasons a rule catalog cannot be loaded. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("rule catalog not found: {0}")]
    Missing(String),

    #[error("failed to read rule catalog {origin}: {source}")]
    Io {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("rule catalog {0} is not valid UTF-8")]
    Encoding(String),

    #[error("rule catalog {origin} is malformed: {source}")]
    Malformed {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid rule '{key}': {reason}")]
    InvalidRule { key: String, reason: String },
}

/// Immutable table of classification rules, ordered by key.
///
/// Loaded once and shared by reference; every lookup is read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RuleCatalog {
    rules: BTreeMap<String, RuleEntry>,
}

impl RuleCatalog {
    /// Load a JSON catalog from disk. Any invalid entry rejects the whole file.
    pub fn load(path: &Path) -> Result<Self, CatalogLoadError> {
        let origin = path.display().to_string();
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(CatalogLoadError::Missing(origin));
            }
            Err(source) => return Err(CatalogLoadError::Io { origin, source }),
        };
        let text = String::from_utf8(bytes).map_err(|_| CatalogLoadError::Encoding(origin.clone()))?;
        Self::parse(&text, origin)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogLoadError> {
        Self::parse(json, "<inline>".to_string())
    }

    /// Build a catalog from already-parsed entries, applying the same validation as [`load`](Self::load).
    pub fn from_rules<K, I>(rules: I) -> Result<Self, CatalogLoadError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, RuleEntry)>,
    {
        let catalog = Self {
            rules: rules.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        };
        catalog.validate()?;
        Ok(catalog)
    }

    fn parse(json: &str, origin: String) -> Result<Self, CatalogLoadError> {
        let json = json.trim_start_matches('\u{feff}');
        let rules: BTreeMap<String, RuleEntry> = serde_json::from_str(json)
            .map_err(|source| CatalogLoadError::Malformed { origin, source })?;
        Self::from_rules(rules)
    }

    fn validate(&self) -> Result<(), CatalogLoadError> {
        for (key, entry) in &self.rules {
            if key.trim().is_empty() {
                return Err(CatalogLoadError::InvalidRule {
                    key: key.clone(),
                    reason: "rule key is empty".to_string(),
                });
            }
            if entry.weighting == Some(0) {
                return Err(CatalogLoadError::InvalidRule {
                    key: key.clone(),
                    reason: "weighting must be a positive integer".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&RuleEntry> {
        self.rules.get(key)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleEntry)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Weighting of the terminal rule keyed exactly by `simple_name`
    pub fn terminal_weight(&self, simple_name: &str) -> Option<u32> {
        self.rules.get(simple_name).and_then(|entry| entry.weighting)
    }

    /// Keys of every rule without a weighting, in key order
    pub fn package_prefixes(&self) -> impl Iterator<Item = &str> {
        self.rules
            .iter()
            .filter(|(_, entry)| entry.is_package())
            .map(|(key, _)| key.as_str())
    }

    pub fn terminal_count(&self) -> usize {
        self.rules.values().filter(|e| e.is_terminal()).count()
    }

    /// Longest package-prefix key occurring as a substring of `full_name`.
    ///
    /// Equal lengths resolve to the lexicographically smallest key.
    pub fn longest_package_prefix(&self, full_name: &str) -> Option<&str> {
        self.package_prefixes()
            .filter(|key| full_name.contains(key))
            .fold(None, |best: Option<&str>, key| match best {
                Some(current) if current.chars().count() >= key.chars().count() => Some(current),
                _ => Some(key),
            })
    }

    /// Class definition followed by package definition, or [`NO_DEFINITION`].
    pub fn definition_for(&self, record: &ClassificationRecord) -> String {
        let parts: Vec<&str> = [record.class_key.as_deref(), record.package_key.as_deref()]
            .into_iter()
            .flatten()
            .filter_map(|key| self.rules.get(key))
            .map(|entry| entry.definition.as_str())
            .filter(|definition| !definition.is_empty())
            .collect();

        let text = parts.join(" ");
        let text = text.trim();
        if text.is_empty() {
            NO_DEFINITION.to_string()
        } else {
            text.to_string()
        }
    }
}
