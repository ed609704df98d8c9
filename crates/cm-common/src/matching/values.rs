use crate::{IssueRankings, ValueResponses};

/// Questions asked for every ranked issue.
pub const VALUE_QUESTIONS: [&str; 2] = ["q1", "q2"];

/// Midpoint of the 0..=9 answer scale, charged when no question pair can be
/// compared.
pub const NEUTRAL_VALUE_DISTANCE: f64 = 5.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ValueComparison {
    pub distance_sum: i64,
    pub answered_pairs: usize,
}

impl ValueComparison {
    /// Mean answer distance, or the neutral distance if nothing was comparable.
    pub fn mean_distance(&self) -> f64 {
        if self.answered_pairs == 0 {
            return NEUTRAL_VALUE_DISTANCE;
        }
        self.distance_sum as f64 / self.answered_pairs as f64
    }
}

/// Compares answers on issues ranked by both parties, question by question.
/// A question counts only when both sides answered it.
pub fn compare_values(
    user_rankings: &IssueRankings,
    org_rankings: &IssueRankings,
    user_values: &ValueResponses,
    org_values: &ValueResponses,
) -> ValueComparison {
    let mut comparison = ValueComparison::default();

    for issue in org_rankings.keys() {
        if !user_rankings.contains_key(issue) {
            continue;
        }
        let (Some(user_answers), Some(org_answers)) = (user_values.get(issue), org_values.get(issue))
        else {
            continue;
        };

        for question in VALUE_QUESTIONS {
            if let (Some(user), Some(org)) = (user_answers.get(question), org_answers.get(question)) {
                comparison.distance_sum += i64::from((user - org).abs());
                comparison.answered_pairs += 1;
            }
        }
    }

    comparison
}

/// Weighted value score before rounding.
pub fn calculate_value_score(
    user_rankings: &IssueRankings,
    org_rankings: &IssueRankings,
    user_values: &ValueResponses,
    org_values: &ValueResponses,
    value_weight: f64,
) -> f64 {
    compare_values(user_rankings, org_rankings, user_values, org_values).mean_distance()
        * value_weight
}
