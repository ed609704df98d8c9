pub mod api;
pub mod logging;
pub mod matching;

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Issue name -> rank (1 = highest priority).
///
/// Ordered so that per-issue distances are always accumulated in the same
/// order and repeated scoring is bit-identical.
pub type IssueRankings = BTreeMap<String, u32>;

/// Issue name -> category name. Shared by both sides of a comparison.
pub type IssueCategories = HashMap<String, String>;

/// Issue name -> (question id -> answer on a 0..=9 scale).
pub type ValueResponses = BTreeMap<String, BTreeMap<String, i32>>;

// Commonly used data model for matching functions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub name: Option<String>,
    pub issue_rankings: IssueRankings,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub values: ValueResponses,
}

impl Profile {
    pub fn new<I, K, A>(rankings: I, actions: A) -> Self
    where
        I: IntoIterator<Item = (K, u32)>,
        K: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        Self {
            name: None,
            issue_rankings: rankings
                .into_iter()
                .map(|(issue, rank)| (issue.into(), rank))
                .collect(),
            actions: actions.into_iter().map(Into::into).collect(),
            values: ValueResponses::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_values(mut self, values: ValueResponses) -> Self {
        self.values = values;
        self
    }

    /// Largest rank on this profile's scale: the number of ranked issues.
    pub fn max_rank(&self) -> usize {
        self.issue_rankings.len()
    }
}
