//! Core types for collecting ratings
//!
//! This module defines the rating scale, the validated rating value and the
//! rated decision that a session records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SessionError;
use crate::profile::generator::CandidateProfile;

/// Rating scale for numeric ratings
///
/// Defines the valid range of a rating and the value a front end should
/// preselect. Every rating in the exercise, stored or displayed, is on the
/// 1-10 scale returned by [`RatingScale::one_to_ten`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingScale {
    /// Minimum rating value
    pub min: u8,
    /// Maximum rating value
    pub max: u8,
    /// Value preselected by the input control
    pub default: u8,
}

impl RatingScale {
    /// Standard 1-10 rating scale with 5 preselected
    pub fn one_to_ten() -> Self {
        Self {
            min: 1,
            max: 10,
            default: 5,
        }
    }

    /// Check whether a raw value lies on this scale
    pub fn contains(&self, value: i64) -> bool {
        value >= i64::from(self.min) && value <= i64::from(self.max)
    }

    /// Validate a raw value into a rating on this scale
    pub fn validate(&self, value: i64) -> Result<Rating, SessionError> {
        if self.contains(value) {
            // Range checked above, fits in u8.
            Ok(Rating(value as u8))
        } else {
            Err(SessionError::RatingOutOfRange {
                value,
                min: self.min,
                max: self.max,
            })
        }
    }

    /// The preselected rating
    pub fn default_rating(&self) -> Rating {
        Rating(self.default)
    }
}

impl Default for RatingScale {
    fn default() -> Self {
        Self::one_to_ten()
    }
}

/// A rating that has passed scale validation
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Validate a value against the standard 1-10 scale
    pub fn new(value: i64) -> Result<Self, SessionError> {
        RatingScale::one_to_ten().validate(value)
    }

    /// The rating as an integer
    pub fn value(&self) -> u8 {
        self.0
    }

    /// The rating as a float, for averaging
    pub fn as_f64(&self) -> f64 {
        f64::from(self.0)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Rating {
    type Error = SessionError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// A profile paired with the rating the user gave it
///
/// Created once when the rating is submitted and never changed afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatedDecision {
    pub profile: CandidateProfile,
    pub rating: Rating,
}

impl RatedDecision {
    /// Pair a profile with its rating
    pub fn new(profile: CandidateProfile, rating: Rating) -> Self {
        Self { profile, rating }
    }
}
