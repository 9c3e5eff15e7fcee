//! Synthetic candidate profile generation
//!
//! Each field is sampled uniformly and independently, so any rating gap
//! between name groups cannot be explained by the other three fields.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::tables::ProfileTables;
use crate::error::ConfigError;

/// One synthetic CV shown to the user
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub name: String,
    pub education: String,
    pub experience: String,
    pub extracurricular: String,
}

impl CandidateProfile {
    /// Create a profile from its four fields
    pub fn new(
        name: impl Into<String>,
        education: impl Into<String>,
        experience: impl Into<String>,
        extracurricular: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            education: education.into(),
            experience: experience.into(),
            extracurricular: extracurricular.into(),
        }
    }
}

impl fmt::Display for CandidateProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | {}",
            self.name, self.education, self.experience, self.extracurricular
        )
    }
}

/// Draws candidate profiles from a validated set of tables
#[derive(Clone, Debug)]
pub struct ProfileGenerator {
    tables: ProfileTables,
}

impl ProfileGenerator {
    /// Create a generator, rejecting tables that cannot be sampled from
    pub fn new(tables: ProfileTables) -> Result<Self, ConfigError> {
        tables.validate()?;
        Ok(Self { tables })
    }

    /// The tables this generator samples from
    pub fn tables(&self) -> &ProfileTables {
        &self.tables
    }

    /// Generate one profile
    ///
    /// A bucket is chosen first, then a name within it, so each bucket is
    /// equally likely regardless of how many names it holds.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> CandidateProfile {
        let bucket = pick(&self.tables.name_buckets, rng);
        let name = pick(&bucket.names, rng);

        let profile = CandidateProfile {
            name: name.clone(),
            education: pick(&self.tables.universities, rng).clone(),
            experience: pick(&self.tables.experiences, rng).clone(),
            extracurricular: pick(&self.tables.extracurriculars, rng).clone(),
        };
        tracing::debug!(bucket = %bucket.label, profile = %profile, "generated profile");
        profile
    }
}

impl Default for ProfileGenerator {
    fn default() -> Self {
        Self {
            tables: ProfileTables::default(),
        }
    }
}

// Tables are validated non-empty in `ProfileGenerator::new`.
fn pick<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}
