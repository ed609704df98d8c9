use std::cmp::Ordering;

use tracing::{info, warn};

use super::scoring::{MatchScore, MatchingConfig, ScoreCalculator, ScoreError};
use crate::{IssueCategories, Profile};

#[derive(Debug, Clone, PartialEq)]
pub struct RankedOrganization {
    /// 1-based position after sorting; 1 is the closest match.
    pub rank: usize,
    /// Position of the organization in the input slice.
    pub index: usize,
    pub name: Option<String>,
    pub score: MatchScore,
}

/// Scores every organization against `user` and orders them closest first.
///
/// Organizations that cannot be scored (no ranked issues) are skipped. An
/// empty user ranking fails the whole call since no organization could be
/// scored against it.
pub fn rank_organizations(
    user: &Profile,
    organizations: &[Profile],
    issue_categories: &IssueCategories,
    config: &MatchingConfig,
) -> Result<Vec<RankedOrganization>, ScoreError> {
    if user.issue_rankings.is_empty() {
        return Err(ScoreError::InvalidInput(
            "user issue rankings must not be empty".into(),
        ));
    }

    let calculator = ScoreCalculator::new(*config);
    let mut ranked = Vec::with_capacity(organizations.len());

    for (index, org) in organizations.iter().enumerate() {
        match calculator.score(user, org, issue_categories) {
            Ok(score) => ranked.push(RankedOrganization {
                rank: 0,
                index,
                name: org.name.clone(),
                score,
            }),
            Err(err) => {
                warn!(
                    index,
                    organization = org.name.as_deref().unwrap_or("unnamed"),
                    error = %err,
                    "skipping organization that cannot be scored"
                );
            }
        }
    }

    ranked.sort_by(compare_ranked);

    if let Some(limit) = config.limit {
        ranked.truncate(limit);
    }
    for (position, entry) in ranked.iter_mut().enumerate() {
        entry.rank = position + 1;
    }

    info!(
        scored = ranked.len(),
        candidates = organizations.len(),
        "ranked organizations"
    );

    Ok(ranked)
}

fn compare_ranked(a: &RankedOrganization, b: &RankedOrganization) -> Ordering {
    a.score
        .total_score
        .partial_cmp(&b.score.total_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.index.cmp(&b.index))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> Profile {
        Profile::new([("Gun Control", 1), ("Mental Health", 2)], ["volunteer", "donate"])
    }

    fn categories() -> IssueCategories {
        [
            ("Gun Control", "Public Safety"),
            ("Mental Health", "Healthcare"),
            ("Depression Awareness", "Healthcare"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn closest_organization_ranks_first() {
        let far = Profile::new([("Ocean Conservation", 1)], ["lobby"]).with_name("far");
        let near = Profile::new([("Gun Control", 1), ("Mental Health", 2)], ["volunteer", "donate"])
            .with_name("near");
        let middle =
            Profile::new([("Gun Control", 1), ("Depression Awareness", 2)], ["volunteer"])
                .with_name("middle");

        let ranked = rank_organizations(
            &user(),
            &[far, near, middle],
            &categories(),
            &MatchingConfig::default(),
        )
        .unwrap();

        let names: Vec<_> = ranked.iter().map(|r| r.name.as_deref().unwrap()).collect();
        assert_eq!(names, vec!["near", "middle", "far"]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].index, 1);
        assert_eq!(ranked[0].score.total_score, 0.0);
        assert!(ranked
            .windows(2)
            .all(|w| w[0].score.total_score <= w[1].score.total_score));
    }

    #[test]
    fn unscorable_organizations_are_skipped() {
        let empty = Profile::new(Vec::<(String, u32)>::new(), ["volunteer"]).with_name("empty");
        let ok = Profile::new([("Gun Control", 1)], ["volunteer"]).with_name("ok");

        let ranked =
            rank_organizations(&user(), &[empty, ok], &categories(), &MatchingConfig::default())
                .unwrap();

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].name.as_deref(), Some("ok"));
        assert_eq!(ranked[0].index, 1);
    }

    #[test]
    fn empty_user_is_rejected() {
        let user = Profile::default();
        let orgs = [Profile::new([("Gun Control", 1)], ["volunteer"])];

        let err = rank_organizations(&user, &orgs, &categories(), &MatchingConfig::default())
            .unwrap_err();
        assert!(matches!(err, ScoreError::InvalidInput(_)));
    }

    #[test]
    fn ties_break_by_name_and_limit_truncates() {
        let org = Profile::new([("Gun Control", 1)], ["volunteer"]);
        let orgs = [
            org.clone().with_name("b"),
            org.clone().with_name("a"),
            org.with_name("c"),
        ];
        let config = MatchingConfig {
            limit: Some(2),
            ..MatchingConfig::default()
        };

        let ranked = rank_organizations(&user(), &orgs, &categories(), &config).unwrap();

        let names: Vec<_> = ranked.iter().map(|r| r.name.as_deref().unwrap()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(ranked[1].rank, 2);
    }

    #[test]
    fn value_weight_adds_value_component() {
        let orgs = [Profile::new([("Gun Control", 1)], ["volunteer"])];

        let ranked =
            rank_organizations(&user(), &orgs, &categories(), &MatchingConfig::value_aware())
                .unwrap();

        assert!(ranked[0].score.value_score.is_some());
    }
}
