use std::collections::HashSet;

use super::weights::Weights;

pub fn action_set(actions: &[String]) -> HashSet<&str> {
    actions.iter().map(String::as_str).collect()
}

/// |A ∩ B| / |A ∪ B|, 0.0 when both sets are empty.
pub fn jaccard_similarity(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Unweighted action dissimilarity, in `[0, |user actions|]`.
///
/// When either side has no actions the user's distinct action count is used
/// directly.
pub fn action_distance(user_actions: &[String], org_actions: &[String]) -> f64 {
    let user_set = action_set(user_actions);
    let org_set = action_set(org_actions);

    if user_set.is_empty() || org_set.is_empty() {
        return user_set.len() as f64;
    }

    (1.0 - jaccard_similarity(&user_set, &org_set)) * user_set.len() as f64
}

/// Weighted action score before rounding.
pub fn calculate_action_score(
    user_actions: &[String],
    org_actions: &[String],
    weights: &Weights,
) -> f64 {
    action_distance(user_actions, org_actions) * weights.action_weight
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actions(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn jaccard_partial_overlap() {
        let user = actions(&["volunteer", "donate", "social media"]);
        let org = actions(&["volunteer", "lobby", "campaign", "social media"]);

        let sim = jaccard_similarity(&action_set(&user), &action_set(&org));
        // {volunteer, social media} / 5 distinct actions
        assert!((sim - 0.4).abs() < 1e-12);
        assert!((action_distance(&user, &org) - 1.8).abs() < 1e-12);
    }

    #[test]
    fn identical_sets_have_zero_distance() {
        let user = actions(&["volunteer", "donate"]);
        let org = actions(&["donate", "volunteer", "donate"]);
        assert_eq!(action_distance(&user, &org), 0.0);
    }

    #[test]
    fn disjoint_sets_cost_full_user_count() {
        let user = actions(&["volunteer", "donate"]);
        let org = actions(&["lobby"]);
        assert_eq!(action_distance(&user, &org), 2.0);
    }

    #[test]
    fn empty_side_falls_back_to_user_count() {
        let user = actions(&["volunteer", "donate", "donate"]);
        assert_eq!(action_distance(&user, &[]), 2.0);
        assert_eq!(action_distance(&[], &user), 0.0);
        assert_eq!(action_distance(&[], &[]), 0.0);
    }

    #[test]
    fn duplicates_do_not_inflate_user_count() {
        let user = actions(&["volunteer", "volunteer", "donate"]);
        let org = actions(&["volunteer"]);
        // 1 - 1/2 = 0.5, times two distinct user actions
        assert!((action_distance(&user, &org) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn action_weight_is_applied() {
        let user = actions(&["volunteer"]);
        let weights = Weights {
            action_weight: 0.5,
            ..Weights::default()
        };
        assert_eq!(calculate_action_score(&user, &[], &weights), 0.5);
    }

    #[test]
    fn empty_sets_have_zero_similarity() {
        assert_eq!(jaccard_similarity(&HashSet::new(), &HashSet::new()), 0.0);
    }
}
