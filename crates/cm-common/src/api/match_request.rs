use std::io::Read;

use serde::Deserialize;

use crate::matching::{MatchingConfig, Weights};
use crate::{IssueCategories, Profile};

/// One user compared against a batch of organizations.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    pub user: Profile,
    pub organizations: Vec<Profile>,
    #[serde(default)]
    pub issue_categories: IssueCategories,
    #[serde(default)]
    pub weights: Option<Weights>,
    #[serde(default)]
    pub value_weight: Option<f64>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl MatchRequest {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    /// Layers the request's own settings over `base`; fields the request
    /// leaves out keep the base value.
    pub fn apply_to(&self, base: MatchingConfig) -> MatchingConfig {
        MatchingConfig {
            weights: self.weights.unwrap_or(base.weights),
            value_weight: self.value_weight.or(base.value_weight),
            limit: self.limit.or(base.limit),
        }
    }
}
