use serde::{Deserialize, Serialize};

use super::scoring::ScoreError;

/// Issue + action scoring.
pub const DEFAULT_WEIGHTS: Weights = Weights {
    exact_match: 0.7,
    category_match: 0.3,
    issue_weight: 0.7,
    action_weight: 0.3,
};

/// Issue + action + value scoring.
/// Issue and action give up weight to make room for `DEFAULT_VALUE_WEIGHT`.
pub const VALUE_AWARE_WEIGHTS: Weights = Weights {
    exact_match: 0.7,
    category_match: 0.3,
    issue_weight: 0.6,
    action_weight: 0.2,
};

pub const DEFAULT_VALUE_WEIGHT: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weights {
    /// Share of an issue's distance taken from the exact issue-name match.
    pub exact_match: f64,
    /// Share of an issue's distance taken from the closest same-category issue.
    pub category_match: f64,
    pub issue_weight: f64,
    pub action_weight: f64,
}

impl Default for Weights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

impl Weights {
    pub fn blend(&self, exact_distance: f64, category_distance: f64) -> f64 {
        exact_distance * self.exact_match + category_distance * self.category_match
    }

    /// Rejects negative or non-finite coefficients. Nothing requires the
    /// coefficients to sum to one.
    pub fn validate(&self) -> Result<(), ScoreError> {
        let fields = [
            ("exactMatch", self.exact_match),
            ("categoryMatch", self.category_match),
            ("issueWeight", self.issue_weight),
            ("actionWeight", self.action_weight),
        ];

        for (name, value) in fields {
            validate_coefficient(name, value)?;
        }
        Ok(())
    }
}

pub(crate) fn validate_coefficient(name: &str, value: f64) -> Result<(), ScoreError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ScoreError::InvalidWeights(format!(
            "{name} must be a non-negative finite number, got {value}"
        )));
    }
    Ok(())
}
