//! Traits at the seams of the exercise
//!
//! `PartitionPredicate` decides which side of a split a decision falls on.
//! `Rater` is whatever supplies ratings: a person at a terminal or a
//! simulated rater used for demos and tests.

use super::evaluator::Rating;
use crate::profile::generator::CandidateProfile;

/// Membership test that splits decisions into a group and its complement
///
/// Implementations are literal lookups over fixed string sets. They do not
/// infer anything about a person; they only report whether a profile field
/// matches one of the configured entries.
pub trait PartitionPredicate {
    /// Label of the group the predicate selects
    fn label(&self) -> &str;

    /// Label of the complement
    fn complement_label(&self) -> &str;

    /// Whether the profile belongs to the selected group
    fn matches(&self, profile: &CandidateProfile) -> bool;
}

/// Source of ratings for profiles
///
/// # Design
///
/// The exercise calls `rate()` once per round with the profile on screen.
/// Returning `None` abandons the session. Returning a value outside the
/// rating scale is allowed; the exercise rejects it and asks again for the
/// same profile.
pub trait Rater {
    /// Produce a raw rating for the profile
    ///
    /// `round` is 1-based. `default` is the value an untouched input
    /// control would submit.
    fn rate(
        &mut self,
        profile: &CandidateProfile,
        round: usize,
        total: usize,
        default: Rating,
    ) -> Option<i64>;

    /// Called after a raw rating was rejected
    fn rejected(&mut self, _value: i64, _reason: &str) {}
}
