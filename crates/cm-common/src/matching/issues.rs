use std::collections::HashMap;

use super::{scoring::ScoreError, weights::Weights};
use crate::{IssueCategories, IssueRankings};

/// Distance breakdown for one organization issue.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueDistance {
    pub issue: String,
    pub scaled_org_rank: f64,
    pub exact_distance: f64,
    pub category_distance: f64,
    pub weighted_distance: f64,
}

/// Ratio that projects organization ranks onto the user's rank scale.
pub fn scale_factor(user_max_rank: usize, org_max_rank: usize) -> f64 {
    user_max_rank as f64 / org_max_rank as f64
}

/// User ranks grouped by category, built once per comparison instead of
/// rescanning every user issue for each organization issue.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex<'a> {
    ranks_by_category: HashMap<&'a str, Vec<u32>>,
}

impl<'a> CategoryIndex<'a> {
    pub fn build(user_rankings: &'a IssueRankings, issue_categories: &'a IssueCategories) -> Self {
        let mut ranks_by_category: HashMap<&'a str, Vec<u32>> = HashMap::new();
        for (issue, rank) in user_rankings {
            if let Some(category) = issue_categories.get(issue).filter(|c| !c.is_empty()) {
                ranks_by_category
                    .entry(category.as_str())
                    .or_default()
                    .push(*rank);
            }
        }
        Self { ranks_by_category }
    }

    /// Smallest `|user_rank - scaled_org_rank|` over the user's issues in
    /// `category`, never larger than `fallback`.
    pub fn closest_distance(&self, category: &str, scaled_org_rank: f64, fallback: f64) -> f64 {
        self.ranks_by_category
            .get(category)
            .into_iter()
            .flatten()
            .map(|rank| (*rank as f64 - scaled_org_rank).abs())
            .fold(fallback, f64::min)
    }
}

fn ensure_rankings(
    user_rankings: &IssueRankings,
    org_rankings: &IssueRankings,
) -> Result<(), ScoreError> {
    if user_rankings.is_empty() {
        return Err(ScoreError::InvalidInput(
            "user issue rankings must not be empty".into(),
        ));
    }
    if org_rankings.is_empty() {
        return Err(ScoreError::InvalidInput(
            "organization issue rankings must not be empty".into(),
        ));
    }
    Ok(())
}

/// Per-issue exact/category distances for every organization issue, in
/// issue-name order.
pub fn issue_distances(
    user_rankings: &IssueRankings,
    org_rankings: &IssueRankings,
    issue_categories: &IssueCategories,
    weights: &Weights,
) -> Result<Vec<IssueDistance>, ScoreError> {
    ensure_rankings(user_rankings, org_rankings)?;

    let user_max_rank = user_rankings.len();
    let penalty = user_max_rank as f64;
    let scale = scale_factor(user_max_rank, org_rankings.len());
    let index = CategoryIndex::build(user_rankings, issue_categories);

    let distances = org_rankings
        .iter()
        .map(|(issue, org_rank)| {
            let scaled_org_rank = *org_rank as f64 * scale;

            let exact_distance = match user_rankings.get(issue) {
                Some(user_rank) => (*user_rank as f64 - scaled_org_rank).abs(),
                None => penalty,
            };

            // Measured against this org issue's scaled rank, not a scaled
            // counterpart of the matching user issue. An empty category is
            // no category.
            let category_distance = match issue_categories.get(issue) {
                Some(category) if !category.is_empty() => {
                    index.closest_distance(category, scaled_org_rank, penalty)
                }
                _ => penalty,
            };

            IssueDistance {
                issue: issue.clone(),
                scaled_org_rank,
                exact_distance,
                category_distance,
                weighted_distance: weights.blend(exact_distance, category_distance),
            }
        })
        .collect();

    Ok(distances)
}

/// Weighted issue score before rounding.
pub fn calculate_issue_score(
    user_rankings: &IssueRankings,
    org_rankings: &IssueRankings,
    issue_categories: &IssueCategories,
    weights: &Weights,
) -> Result<f64, ScoreError> {
    let distances = issue_distances(user_rankings, org_rankings, issue_categories, weights)?;

    let mut total_distance = 0.0;
    for distance in &distances {
        total_distance += distance.weighted_distance;
    }

    let user_max_rank = user_rankings.len() as f64;
    Ok((total_distance / user_max_rank) * weights.issue_weight)
}
