pub mod actions;
pub mod issues;
pub mod ranking;
pub mod scoring;
pub mod values;
pub mod weights;

pub use ranking::{rank_organizations, RankedOrganization};
pub use scoring::{
    calculate_total_score, calculate_value_aware_score, MatchScore, MatchingConfig,
    ScoreCalculator, ScoreError, ScoreResult,
};
pub use weights::{Weights, DEFAULT_VALUE_WEIGHT, DEFAULT_WEIGHTS, VALUE_AWARE_WEIGHTS};
