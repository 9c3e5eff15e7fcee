//! Simulated rater
//!
//! Stands in for a person when demonstrating the report or testing it. The
//! rater has a neutral base rating, a fixed penalty for names outside the
//! western buckets, a fixed bonus for prestige universities, and optional
//! uniform noise. Ratings are rounded and clamped onto the scale.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::interactive::aggregation::{NameOriginPredicate, PrestigePredicate};
use crate::interactive::evaluator::{Rating, RatingScale};
use crate::interactive::traits::{PartitionPredicate, Rater};
use crate::profile::generator::CandidateProfile;
use crate::profile::tables::ProfileTables;

/// Strength of the simulated preferences
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulatedBias {
    /// Rating given before any adjustment
    pub base: f64,
    /// Subtracted for names outside the western buckets
    pub name_penalty: f64,
    /// Added for prestige universities
    pub prestige_bonus: f64,
    /// Half-width of uniform noise added to each rating
    pub noise: f64,
}

impl Default for SimulatedBias {
    fn default() -> Self {
        Self {
            base: 6.0,
            name_penalty: 1.5,
            prestige_bonus: 1.0,
            noise: 0.0,
        }
    }
}

impl SimulatedBias {
    /// Check that every strength is finite and the noise is not negative
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("base", self.base),
            ("name_penalty", self.name_penalty),
            ("prestige_bonus", self.prestige_bonus),
            ("noise", self.noise),
        ];
        if let Some((field, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(format!("{field} must be a finite number, got {value}"));
        }
        if self.noise < 0.0 {
            return Err(format!("noise must not be negative, got {}", self.noise));
        }
        Ok(())
    }
}

/// Rater that applies a fixed bias to every profile
pub struct SimulatedRater {
    bias: SimulatedBias,
    scale: RatingScale,
    name_origin: NameOriginPredicate,
    prestige: PrestigePredicate,
    rng: StdRng,
}

impl SimulatedRater {
    /// Create a rater judging profiles drawn from the given tables
    pub fn new(tables: &ProfileTables, bias: SimulatedBias, seed: u64) -> Self {
        Self {
            bias,
            scale: RatingScale::one_to_ten(),
            name_origin: NameOriginPredicate::from_tables(tables),
            prestige: PrestigePredicate::from_tables(tables),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Rating before noise and rounding
    pub fn expected_rating(&self, profile: &CandidateProfile) -> f64 {
        let mut rating = self.bias.base;
        if !self.name_origin.matches(profile) {
            rating -= self.bias.name_penalty;
        }
        if self.prestige.matches(profile) {
            rating += self.bias.prestige_bonus;
        }
        rating
    }
}

impl Rater for SimulatedRater {
    fn rate(
        &mut self,
        profile: &CandidateProfile,
        _round: usize,
        _total: usize,
        default: Rating,
    ) -> Option<i64> {
        let mut rating = self.expected_rating(profile);
        if self.bias.noise > 0.0 {
            rating += self.bias.noise * self.rng.gen_range(-1.0f64..=1.0);
        }
        // A non-finite rating would round to the same rejected value forever.
        if !rating.is_finite() {
            tracing::warn!(bias = ?self.bias, "simulated rating is not finite, using default");
            return Some(i64::from(default.value()));
        }
        let clamped = rating
            .round()
            .clamp(f64::from(self.scale.min), f64::from(self.scale.max));
        Some(clamped as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactive::exercise::{Exercise, ExerciseOutcome};
    use approx::assert_relative_eq;

    fn profile(name: &str, education: &str) -> CandidateProfile {
        CandidateProfile::new(name, education, "18 months office admin", "Community volunteer")
    }

    #[test]
    fn test_expected_rating_applies_bias() {
        let rater = SimulatedRater::new(&ProfileTables::default(), SimulatedBias::default(), 0);

        assert_relative_eq!(
            rater.expected_rating(&profile("James Wilson", "Local Post-92 University")),
            6.0
        );
        assert_relative_eq!(
            rater.expected_rating(&profile("Raj Patel", "Local Post-92 University")),
            4.5
        );
        assert_relative_eq!(
            rater.expected_rating(&profile("Raj Patel", "Oxford/Cambridge")),
            5.5
        );
    }

    #[test]
    fn test_ratings_stay_on_scale() {
        let bias = SimulatedBias {
            base: 9.5,
            name_penalty: 0.0,
            prestige_bonus: 5.0,
            noise: 3.0,
        };
        let mut rater = SimulatedRater::new(&ProfileTables::default(), bias, 9);
        let default = RatingScale::one_to_ten().default_rating();
        for _ in 0..100 {
            let value = rater
                .rate(&profile("Emma Clarke", "Oxford/Cambridge"), 1, 10, default)
                .unwrap();
            assert!((1..=10).contains(&value));
        }
    }

    #[test]
    fn test_noiseless_rater_shows_its_bias_in_report() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut rater = SimulatedRater::new(
            &ProfileTables::default(),
            SimulatedBias {
                base: 6.0,
                name_penalty: 2.0,
                prestige_bonus: 0.0,
                noise: 0.0,
            },
            0,
        );

        let outcome = Exercise::builder()
            .rounds(200)
            .build()
            .unwrap()
            .run(&mut rng, &mut rater)
            .unwrap();

        let report = match outcome {
            ExerciseOutcome::Completed { report, .. } => report,
            ExerciseOutcome::Abandoned { .. } => panic!("Expected Completed"),
        };
        assert_relative_eq!(report.western_mean().value().unwrap(), 6.0);
        assert_relative_eq!(report.non_western_mean().value().unwrap(), 4.0);
        assert_relative_eq!(report.name_origin.gap().unwrap(), 2.0);
    }

    #[test]
    fn test_validate_rejects_non_finite_bias() {
        assert!(SimulatedBias::default().validate().is_ok());

        let nan_penalty = SimulatedBias {
            name_penalty: f64::NAN,
            ..SimulatedBias::default()
        };
        assert!(nan_penalty.validate().unwrap_err().contains("name_penalty"));

        let infinite_noise = SimulatedBias {
            noise: f64::INFINITY,
            ..SimulatedBias::default()
        };
        assert!(infinite_noise.validate().unwrap_err().contains("noise"));

        let negative_noise = SimulatedBias {
            noise: -1.0,
            ..SimulatedBias::default()
        };
        assert!(negative_noise.validate().is_err());
    }

    #[test]
    fn test_nan_bias_falls_back_to_default_and_finishes() {
        let mut rng = StdRng::seed_from_u64(3);
        let bias = SimulatedBias {
            name_penalty: f64::NAN,
            ..SimulatedBias::default()
        };
        let mut rater = SimulatedRater::new(&ProfileTables::default(), bias, 3);

        let outcome = Exercise::builder()
            .build()
            .unwrap()
            .run(&mut rng, &mut rater)
            .unwrap();
        let session = match outcome {
            ExerciseOutcome::Completed { session, .. } => session,
            ExerciseOutcome::Abandoned { .. } => panic!("Expected Completed"),
        };
        // Western names never touch the penalty; the rest fall back to 5.
        for decision in session.decisions() {
            let expected = if rater.name_origin.matches(&decision.profile) {
                rater.expected_rating(&decision.profile) as u8
            } else {
                5
            };
            assert_eq!(decision.rating.value(), expected);
        }
    }

    #[test]
    fn test_infinite_noise_does_not_panic() {
        let bias = SimulatedBias {
            noise: f64::INFINITY,
            ..SimulatedBias::default()
        };
        let mut rater = SimulatedRater::new(&ProfileTables::default(), bias, 11);
        let default = RatingScale::one_to_ten().default_rating();
        for _ in 0..20 {
            let value = rater
                .rate(&profile("Sophie Taylor", "Russell Group University"), 1, 10, default)
                .unwrap();
            assert!((1..=10).contains(&value));
        }
    }
}
