//! Interactive rating session
//!
//! This module collects one rating per synthetic profile and turns the
//! finished session into a report of mean ratings per group.
//!
//! # Lifecycle
//!
//! A session starts empty in `Collecting(0)`. Each accepted rating appends
//! one decision. The tenth moves it to `Reporting`, after which it is
//! read-only. Ratings are final once submitted; there is no edit or undo.
//!
//! # Example
//!
//! ```rust,ignore
//! use cv_bias_check::prelude::*;
//!
//! let mut exercise = Exercise::builder().build()?;
//!
//! loop {
//!     match exercise.step(&mut rng)? {
//!         StepResult::NeedsRating { round, total, profile } => {
//!             let value = present_to_user(round, total, &profile);
//!             if let Err(e) = exercise.provide_rating(value) {
//!                 show_error(e);
//!             }
//!         }
//!         StepResult::Complete(report) => {
//!             show_report(&report);
//!             break;
//!         }
//!     }
//! }
//! ```

pub mod aggregation;
pub mod evaluator;
pub mod exercise;
pub mod session;
pub mod traits;

/// Prelude for convenient imports
pub mod prelude {
    pub use super::aggregation::{
        compute_report, BiasReport, NameOriginPredicate, PartitionMean, PartitionSplit,
        PrestigePredicate, ReportAggregator,
    };
    pub use super::evaluator::{RatedDecision, Rating, RatingScale};
    pub use super::exercise::{
        Exercise, ExerciseBuilder, ExerciseConfig, ExerciseOutcome, StepResult,
    };
    pub use super::session::{Session, SessionState, SESSION_LENGTH, SESSION_VERSION};
    pub use super::traits::{PartitionPredicate, Rater};
}
