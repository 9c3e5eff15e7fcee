//! Synthetic candidate profiles
//!
//! Profiles are assembled from four fixed lookup tables. Name-origin and
//! education tier are the two attributes the final report splits on; the
//! generator keeps them statistically independent of everything else.

pub mod generator;
pub mod tables;

/// Prelude for convenient imports
pub mod prelude {
    pub use super::generator::{CandidateProfile, ProfileGenerator};
    pub use super::tables::{NameBucket, NameOrigin, ProfileTables, DEFAULT_PRESTIGE_MARKERS};
}
