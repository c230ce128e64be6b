use serde::{Deserialize, Serialize};

/// One entry of the rule catalog.
///
/// An entry with a `weighting` is a terminal rule keyed by a simple exception
/// class name. An entry without one is a package-prefix rule. There is no
/// separate tag: the presence of `weighting` is the discriminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    pub definition: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weighting: Option<u32>,
}

impl RuleEntry {
    pub fn terminal(definition: impl Into<String>, weighting: u32) -> Self {
        Self {
            definition: definition.into(),
            weighting: Some(weighting),
        }
    }

    pub fn package(definition: impl Into<String>) -> Self {
        Self {
            definition: definition.into(),
            weighting: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.weighting.is_some()
    }

    pub fn is_package(&self) -> bool {
        self.weighting.is_none()
    }
}
