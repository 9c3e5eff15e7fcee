//! Step-based driver for one run of the rating exercise
//!
//! The exercise never blocks on input. The caller asks it for the next step,
//! shows the profile it returns, and hands the user's rating back. One
//! rating submission is one state transition.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::aggregation::{BiasReport, ReportAggregator};
use super::evaluator::{RatedDecision, RatingScale};
use super::session::{Session, SessionState, SESSION_LENGTH};
use super::traits::Rater;
use crate::error::{BiasResult, ConfigError, SessionError};
use crate::profile::generator::{CandidateProfile, ProfileGenerator};
use crate::profile::tables::ProfileTables;

/// Configuration for an exercise
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExerciseConfig {
    /// Number of profiles to rate
    pub rounds: usize,
    /// Tables profiles are drawn from
    pub tables: ProfileTables,
}

impl Default for ExerciseConfig {
    fn default() -> Self {
        Self {
            rounds: SESSION_LENGTH,
            tables: ProfileTables::default(),
        }
    }
}

/// Result of a single exercise step
#[derive(Clone, Debug)]
pub enum StepResult {
    /// A profile is on screen and waiting for a rating
    NeedsRating {
        /// 1-based round number
        round: usize,
        /// Total rounds in the session
        total: usize,
        /// The profile to rate
        profile: CandidateProfile,
    },

    /// Every round is rated
    Complete(Box<BiasReport>),
}

/// Outcome of a full run driven by a [`Rater`]
#[derive(Clone, Debug)]
pub enum ExerciseOutcome {
    /// All rounds rated
    Completed {
        report: Box<BiasReport>,
        session: Session,
    },
    /// The rater stopped before the last round
    Abandoned { collected: usize },
}

/// One run of the rating exercise
///
/// # Example
///
/// ```rust,ignore
/// use cv_bias_check::prelude::*;
///
/// let mut exercise = Exercise::builder().build()?;
/// let mut rng = rand::thread_rng();
///
/// loop {
///     match exercise.step(&mut rng)? {
///         StepResult::NeedsRating { profile, .. } => {
///             let rating = ask_user(&profile);
///             exercise.provide_rating(rating)?;
///         }
///         StepResult::Complete(report) => {
///             println!("{}", report.western_mean());
///             break;
///         }
///     }
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Exercise {
    config: ExerciseConfig,
    generator: ProfileGenerator,
    aggregator: ReportAggregator,
    session: Session,
    /// Profile shown but not yet rated
    pending: Option<CandidateProfile>,
}

impl Exercise {
    /// Create an exercise from a configuration
    pub fn new(config: ExerciseConfig) -> Result<Self, ConfigError> {
        let generator = ProfileGenerator::new(config.tables.clone())?;
        let aggregator = ReportAggregator::new(&config.tables);
        let session = Session::with_length(config.rounds);
        Ok(Self {
            config,
            generator,
            aggregator,
            session,
            pending: None,
        })
    }

    /// Start building an exercise
    pub fn builder() -> ExerciseBuilder {
        ExerciseBuilder::new()
    }

    /// Get the configuration
    pub fn config(&self) -> &ExerciseConfig {
        &self.config
    }

    /// Get the current session
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Give up ownership of the session
    pub fn into_session(self) -> Session {
        self.session
    }

    /// Current lifecycle stage
    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// The profile waiting for a rating, if any
    pub fn pending_profile(&self) -> Option<&CandidateProfile> {
        self.pending.as_ref()
    }

    /// Advance to the next step
    ///
    /// While collecting, returns the profile awaiting a rating, generating a
    /// new one only when none is pending. Once every round is rated, returns
    /// the report.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<StepResult, SessionError> {
        match self.session.state() {
            SessionState::Reporting => {
                let report = self.aggregator.compute_report(&self.session)?;
                Ok(StepResult::Complete(Box::new(report)))
            }
            SessionState::Collecting(collected) => {
                let profile = match &self.pending {
                    Some(profile) => profile.clone(),
                    None => {
                        let profile = self.generator.generate(rng);
                        self.pending = Some(profile.clone());
                        profile
                    }
                };
                Ok(StepResult::NeedsRating {
                    round: collected + 1,
                    total: self.session.capacity(),
                    profile,
                })
            }
        }
    }

    /// Submit a rating for the pending profile
    ///
    /// An out-of-range value is rejected and the pending profile stays on
    /// screen so the caller can ask again.
    pub fn provide_rating(&mut self, value: i64) -> Result<&RatedDecision, SessionError> {
        if self.session.is_complete() {
            return Err(SessionError::SessionFull {
                capacity: self.session.capacity(),
            });
        }
        if self.pending.is_none() {
            return Err(SessionError::NoPendingProfile);
        }

        let rating = match RatingScale::one_to_ten().validate(value) {
            Ok(rating) => rating,
            Err(e) => {
                tracing::warn!(value, "rejected rating outside scale");
                return Err(e);
            }
        };

        let profile = self.pending.take().ok_or(SessionError::NoPendingProfile)?;
        self.session.record_decision(profile, rating)
    }

    /// Compute the report for the finished session
    pub fn report(&self) -> Result<BiasReport, SessionError> {
        self.aggregator.compute_report(&self.session)
    }

    /// Drive the exercise to the end with a rater
    pub fn run<R, T>(mut self, rng: &mut R, rater: &mut T) -> BiasResult<ExerciseOutcome>
    where
        R: Rng + ?Sized,
        T: Rater + ?Sized,
    {
        let default = RatingScale::one_to_ten().default_rating();
        loop {
            match self.step(rng)? {
                StepResult::NeedsRating {
                    round,
                    total,
                    profile,
                } => {
                    let Some(value) = rater.rate(&profile, round, total, default) else {
                        tracing::info!(collected = self.session.len(), "session abandoned");
                        return Ok(ExerciseOutcome::Abandoned {
                            collected: self.session.len(),
                        });
                    };
                    match self.provide_rating(value) {
                        Ok(_) => {}
                        Err(e @ SessionError::RatingOutOfRange { .. }) => {
                            rater.rejected(value, &e.to_string());
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
                StepResult::Complete(report) => {
                    return Ok(ExerciseOutcome::Completed {
                        report,
                        session: self.session,
                    });
                }
            }
        }
    }
}

/// Builder for [`Exercise`]
#[derive(Clone, Debug, Default)]
pub struct ExerciseBuilder {
    config: ExerciseConfig,
}

impl ExerciseBuilder {
    /// Create a builder with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of rounds
    pub fn rounds(mut self, rounds: usize) -> Self {
        self.config.rounds = rounds;
        self
    }

    /// Set the profile tables
    pub fn tables(mut self, tables: ProfileTables) -> Self {
        self.config.tables = tables;
        self
    }

    /// Build the exercise
    pub fn build(self) -> Result<Exercise, ConfigError> {
        Exercise::new(self.config)
    }
}
