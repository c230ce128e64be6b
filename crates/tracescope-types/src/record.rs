use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Display name for a block in which no exception-type token was found
pub const UNKNOWN_ERROR: &str = "Unknown Error";

/// Classification of one distinct trace block
///
/// `class_key` and `package_key` are resolved independently: a record may
/// carry both, either, or neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    /// Occurrences of this exact block text (always >= 1)
    pub count: usize,

    /// Severity used for ranking (always >= 1)
    pub weight: u32,

    /// Fully qualified exception name, or [`UNKNOWN_ERROR`]
    pub display_name: String,

    /// Catalog key of the terminal rule that supplied `weight`
    pub class_key: Option<String>,

    /// Longest package-prefix key contained in the exception name
    pub package_key: Option<String>,

    /// Consumer-owned selection flag; the engine always emits `false`
    #[serde(default)]
    pub selected: bool,
}

impl ClassificationRecord {
    /// Record for a block with no recognizable exception name
    pub fn unknown(count: usize) -> Self {
        Self {
            count,
            weight: 1,
            display_name: UNKNOWN_ERROR.to_string(),
            class_key: None,
            package_key: None,
            selected: false,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.class_key.is_none() && self.package_key.is_none() && self.display_name == UNKNOWN_ERROR
    }

    /// Title line shown above a trace, e.g. `ValueError (Count: 2, Weight: 3)`
    pub fn title(&self) -> String {
        format!(
            "{} (Count: {}, Weight: {})",
            self.display_name, self.count, self.weight
        )
    }
}

/// Trace text -> classification.
///
/// Keyed by the raw block text; a `BTreeMap` keeps serialization byte-stable
/// across runs over the same input.
pub type TraceMap = BTreeMap<String, ClassificationRecord>;

/// A trace paired with its record and its 1-based position in a ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankedTrace<'a> {
    pub position: usize,
    pub trace: &'a str,
    #[serde(flatten)]
    pub record: &'a ClassificationRecord,
}
