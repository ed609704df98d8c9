use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    actions::calculate_action_score,
    issues::calculate_issue_score,
    values::calculate_value_score,
    weights::{
        validate_coefficient, Weights, DEFAULT_VALUE_WEIGHT, DEFAULT_WEIGHTS, VALUE_AWARE_WEIGHTS,
    },
};
use crate::{IssueCategories, IssueRankings, Profile};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ScoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid weights: {0}")]
    InvalidWeights(String),
}

/// Rounds to two decimals, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Issue/action distance between a user and an organization. Lower is closer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub issue_score: f64,
    pub action_score: f64,
    /// Rounded from the unrounded parts, so it can differ from
    /// `issue_score + action_score` by a cent.
    pub total_score: f64,
}

/// Score of one profile pair, with the value component when it was requested.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchScore {
    pub issue_score: f64,
    pub action_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_score: Option<f64>,
    pub total_score: f64,
}

impl From<ScoreResult> for MatchScore {
    fn from(result: ScoreResult) -> Self {
        Self {
            issue_score: result.issue_score,
            action_score: result.action_score,
            value_score: None,
            total_score: result.total_score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchingConfig {
    pub weights: Weights,
    /// `Some` adds the value-question component to every score.
    pub value_weight: Option<f64>,
    pub limit: Option<usize>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            weights: DEFAULT_WEIGHTS,
            value_weight: None,
            limit: None,
        }
    }
}

impl MatchingConfig {
    pub fn value_aware() -> Self {
        Self {
            weights: VALUE_AWARE_WEIGHTS,
            value_weight: Some(DEFAULT_VALUE_WEIGHT),
            ..Self::default()
        }
    }

    /// Reads `CM_WEIGHT_*` and `CM_LIMIT` over the default weights; unset or
    /// unparsable keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup_over(lookup, DEFAULT_WEIGHTS)
    }

    /// Like [`MatchingConfig::from_lookup`], with `preset` filling in the
    /// weights the lookup leaves unset.
    pub fn from_lookup_over<F>(lookup: F, preset: Weights) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse = |key: &str| lookup(key).and_then(|s| s.trim().parse::<f64>().ok());

        Self {
            weights: Weights {
                exact_match: parse("CM_WEIGHT_EXACT_MATCH").unwrap_or(preset.exact_match),
                category_match: parse("CM_WEIGHT_CATEGORY_MATCH")
                    .unwrap_or(preset.category_match),
                issue_weight: parse("CM_WEIGHT_ISSUE").unwrap_or(preset.issue_weight),
                action_weight: parse("CM_WEIGHT_ACTION").unwrap_or(preset.action_weight),
            },
            value_weight: parse("CM_WEIGHT_VALUE"),
            limit: lookup("CM_LIMIT").and_then(|s| s.trim().parse().ok()),
        }
    }

    pub fn validate(&self) -> Result<(), ScoreError> {
        self.weights.validate()?;
        if let Some(value_weight) = self.value_weight {
            validate_coefficient("valueWeight", value_weight)?;
        }
        Ok(())
    }
}

/// Scores a user against an organization on issue rankings and actions.
///
/// Fails with [`ScoreError::InvalidInput`] when either ranking is empty; every
/// other combination of inputs (unranked issues, missing categories, empty
/// action lists) yields a score.
pub fn calculate_total_score(
    user_rankings: &IssueRankings,
    org_rankings: &IssueRankings,
    issue_categories: &IssueCategories,
    user_actions: &[String],
    org_actions: &[String],
    weights: Weights,
) -> Result<ScoreResult, ScoreError> {
    let issue = calculate_issue_score(user_rankings, org_rankings, issue_categories, &weights)?;
    let action = calculate_action_score(user_actions, org_actions, &weights);

    debug!(
        user_max_rank = user_rankings.len(),
        org_max_rank = org_rankings.len(),
        issue,
        action,
        "computed issue/action score"
    );

    Ok(ScoreResult {
        issue_score: round2(issue),
        action_score: round2(action),
        total_score: round2(issue + action),
    })
}

/// Issue/action score plus agreement on value questions for shared issues.
pub fn calculate_value_aware_score(
    user: &Profile,
    org: &Profile,
    issue_categories: &IssueCategories,
    weights: Weights,
    value_weight: f64,
) -> Result<MatchScore, ScoreError> {
    let issue = calculate_issue_score(
        &user.issue_rankings,
        &org.issue_rankings,
        issue_categories,
        &weights,
    )?;
    let action = calculate_action_score(&user.actions, &org.actions, &weights);
    let value = calculate_value_score(
        &user.issue_rankings,
        &org.issue_rankings,
        &user.values,
        &org.values,
        value_weight,
    );

    debug!(issue, action, value, "computed value-aware score");

    Ok(MatchScore {
        issue_score: round2(issue),
        action_score: round2(action),
        value_score: Some(round2(value)),
        total_score: round2(issue + action + value),
    })
}

pub struct ScoreCalculator {
    config: MatchingConfig,
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self::new(MatchingConfig::default())
    }
}

impl ScoreCalculator {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    pub fn score(
        &self,
        user: &Profile,
        org: &Profile,
        issue_categories: &IssueCategories,
    ) -> Result<MatchScore, ScoreError> {
        match self.config.value_weight {
            Some(value_weight) => calculate_value_aware_score(
                user,
                org,
                issue_categories,
                self.config.weights,
                value_weight,
            ),
            None => calculate_total_score(
                &user.issue_rankings,
                &org.issue_rankings,
                issue_categories,
                &user.actions,
                &org.actions,
                self.config.weights,
            )
            .map(MatchScore::from),
        }
    }
}
