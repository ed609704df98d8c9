use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::matching::{MatchScore, RankedOrganization};

/// Ranked organizations for one user, closest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    pub user_max_rank: usize,
    pub results: Vec<RankedMatch>,
    pub engine_version: String,
    pub scored_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedMatch {
    pub rank: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Position of the organization in the request.
    pub index: usize,
    #[serde(flatten)]
    pub score: MatchScore,
}

impl From<RankedOrganization> for RankedMatch {
    fn from(value: RankedOrganization) -> Self {
        Self {
            rank: value.rank,
            name: value.name,
            index: value.index,
            score: value.score,
        }
    }
}

impl MatchResponse {
    pub fn new(
        user_max_rank: usize,
        ranked: Vec<RankedOrganization>,
        engine_version: impl Into<String>,
        scored_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_max_rank,
            results: ranked.into_iter().map(RankedMatch::from).collect(),
            engine_version: engine_version.into(),
            scored_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn flattens_scores_into_each_result() {
        let scored_at = Utc.with_ymd_and_hms(2025, 1, 8, 0, 0, 0).unwrap();
        let ranked = vec![RankedOrganization {
            rank: 1,
            index: 0,
            name: Some("Safe Streets".into()),
            score: MatchScore {
                issue_score: 2.06,
                action_score: 0.54,
                value_score: None,
                total_score: 2.6,
            },
        }];

        let response = MatchResponse::new(3, ranked, "0.1.0", scored_at);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["userMaxRank"], 3);
        assert_eq!(json["results"][0]["name"], "Safe Streets");
        assert_eq!(json["results"][0]["issueScore"], 2.06);
        assert_eq!(json["results"][0]["totalScore"], 2.6);
        assert!(json["results"][0].get("valueScore").is_none());
        assert_eq!(json["scoredAt"], "2025-01-08T00:00:00Z");
    }
}
