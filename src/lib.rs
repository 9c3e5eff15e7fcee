//! # cv-bias-check
//!
//! A small exercise for spotting unconscious bias in CV screening.
//!
//! The user rates ten synthetic graduate CVs. Each CV is assembled from
//! fixed lookup tables with every field drawn independently, so the only
//! systematic difference between groups of candidates is the attribute the
//! report splits on. At the end the mean rating is shown for western versus
//! non-western names and for Russell Group/Oxbridge versus other
//! universities.
//!
//! ## Core Concepts
//!
//! - **Profile**: one synthetic candidate with four descriptive fields
//! - **Decision**: a profile paired with the user's 1-10 rating
//! - **Session**: the ordered, append-only collection of ten decisions
//! - **Partition mean**: the average rating of decisions matching (or not
//!   matching) a literal membership test
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cv_bias_check::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let mut rater = SimulatedRater::new(&ProfileTables::default(), SimulatedBias::default(), 42);
//!
//! match Exercise::builder().build()?.run(&mut rng, &mut rater)? {
//!     ExerciseOutcome::Completed { report, .. } => println!("{}", render_report(&report)),
//!     ExerciseOutcome::Abandoned { collected } => println!("stopped after {}", collected),
//! }
//! ```

pub mod config;
pub mod console;
pub mod error;
pub mod interactive;
pub mod profile;
pub mod simulate;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{load_config, AppConfig};
    pub use crate::console::{render_json, render_profile, render_report, ConsoleRater};
    pub use crate::error::*;
    pub use crate::interactive::prelude::*;
    pub use crate::profile::prelude::*;
    pub use crate::simulate::{SimulatedBias, SimulatedRater};
}
