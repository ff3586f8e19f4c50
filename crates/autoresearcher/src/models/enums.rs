//! Enum types shared by configuration and pipeline stages.

use serde::{Deserialize, Serialize};

/// Completion model tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    /// Faster, cheaper model.
    #[default]
    Default,
    /// Higher-capability model.
    Strong,
}

/// What answer extraction does when one paper's completion call fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure and continue with the next paper.
    #[default]
    Skip,
    /// Abort the whole run.
    Abort,
}

impl std::str::FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "abort" => Ok(Self::Abort),
            other => Err(format!("unknown failure policy '{other}' (expected skip or abort)")),
        }
    }
}
