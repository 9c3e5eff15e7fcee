//! Session state for one run of the exercise
//!
//! A session is an append-only list of rated decisions with a fixed number
//! of rounds. It is owned by whoever drives the exercise and passed around
//! explicitly; nothing about it is global.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use super::evaluator::{RatedDecision, Rating};
use crate::error::{ExportError, SessionError};
use crate::profile::generator::CandidateProfile;

/// Current session export format version
pub const SESSION_VERSION: u32 = 1;

/// Number of profiles rated in one session
pub const SESSION_LENGTH: usize = 10;

/// Lifecycle stage of a session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Still accepting ratings; holds the number recorded so far
    Collecting(usize),
    /// Every round rated; read-only from here on
    Reporting,
}

/// Ordered collection of rated decisions for one run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Schema version for forward compatibility
    pub version: u32,
    /// Number of decisions that completes the session
    capacity: usize,
    /// Decisions in submission order
    decisions: Vec<RatedDecision>,
}

impl Session {
    /// Create an empty session of the standard length
    pub fn new() -> Self {
        Self::with_length(SESSION_LENGTH)
    }

    /// Create an empty session that completes after `length` decisions
    ///
    /// A zero length is bumped to one so a session always collects something.
    pub fn with_length(length: usize) -> Self {
        let capacity = length.max(1);
        Self {
            version: SESSION_VERSION,
            capacity,
            decisions: Vec::with_capacity(capacity),
        }
    }

    /// Append a decision
    ///
    /// Fails without modifying the session once every round is rated.
    pub fn record_decision(
        &mut self,
        profile: CandidateProfile,
        rating: Rating,
    ) -> Result<&RatedDecision, SessionError> {
        if self.is_complete() {
            return Err(SessionError::SessionFull {
                capacity: self.capacity,
            });
        }

        tracing::debug!(
            round = self.decisions.len() + 1,
            name = %profile.name,
            education = %profile.education,
            rating = rating.value(),
            "recorded decision"
        );
        self.decisions.push(RatedDecision::new(profile, rating));
        self.decisions.last().ok_or(SessionError::Incomplete {
            collected: self.decisions.len(),
            required: self.capacity,
        })
    }

    /// Current lifecycle stage
    pub fn state(&self) -> SessionState {
        if self.is_complete() {
            SessionState::Reporting
        } else {
            SessionState::Collecting(self.decisions.len())
        }
    }

    /// All decisions in submission order
    pub fn decisions(&self) -> &[RatedDecision] {
        &self.decisions
    }

    /// Number of decisions recorded
    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    /// Whether no decision has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }

    /// Number of decisions that completes the session
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Rounds still to be rated
    pub fn remaining(&self) -> usize {
        self.capacity - self.decisions.len()
    }

    /// Whether every round has been rated
    pub fn is_complete(&self) -> bool {
        self.decisions.len() >= self.capacity
    }

    /// Return the decisions if the session is complete
    pub fn completed_decisions(&self) -> Result<&[RatedDecision], SessionError> {
        if self.is_complete() {
            Ok(&self.decisions)
        } else {
            Err(SessionError::Incomplete {
                collected: self.decisions.len(),
                required: self.capacity,
            })
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// JSON export of a session
impl Session {
    /// Serialize session to a JSON string
    pub fn to_json(&self) -> Result<String, ExportError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ExportError::Serialization(format!("Failed to serialize session: {}", e)))
    }

    /// Deserialize session from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        let session: Self = serde_json::from_str(json).map_err(|e| {
            ExportError::Deserialization(format!("Failed to deserialize session: {}", e))
        })?;
        session.check_version()
    }

    /// Save session to a file
    pub fn save(&self, path: &Path) -> Result<(), ExportError> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self).map_err(|e| {
            ExportError::Serialization(format!("Failed to serialize session: {}", e))
        })?;
        Ok(())
    }

    /// Load session from a file
    pub fn load(path: &Path) -> Result<Self, ExportError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let session: Self = serde_json::from_reader(reader).map_err(|e| {
            ExportError::Deserialization(format!("Failed to deserialize session: {}", e))
        })?;
        session.check_version()
    }

    fn check_version(self) -> Result<Self, ExportError> {
        if self.version > SESSION_VERSION {
            return Err(ExportError::VersionTooNew(self.version));
        }
        if self.decisions.len() > self.capacity {
            return Err(ExportError::Deserialization(format!(
                "Session holds {} decisions but only {} rounds",
                self.decisions.len(),
                self.capacity
            )));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str) -> CandidateProfile {
        CandidateProfile::new(
            name,
            "Russell Group University",
            "2 years retail at Tesco",
            "Cricket club captain",
        )
    }

    fn rating(value: i64) -> Rating {
        Rating::new(value).unwrap()
    }

    #[test]
    fn test_new_session_is_collecting() {
        let session = Session::new();
        assert_eq!(session.state(), SessionState::Collecting(0));
        assert_eq!(session.capacity(), SESSION_LENGTH);
        assert!(session.is_empty());
        assert_eq!(session.remaining(), 10);
    }

    #[test]
    fn test_record_preserves_order() {
        let mut session = Session::new();
        for i in 0..5 {
            session
                .record_decision(profile(&format!("Person {}", i)), rating(i + 1))
                .unwrap();
        }

        assert_eq!(session.len(), 5);
        assert_eq!(session.state(), SessionState::Collecting(5));
        for (i, decision) in session.decisions().iter().enumerate() {
            assert_eq!(decision.profile.name, format!("Person {}", i));
            assert_eq!(decision.rating.value() as usize, i + 1);
        }
    }

    #[test]
    fn test_record_returns_the_new_decision() {
        let mut session = Session::new();
        session.record_decision(profile("Oliver Smith"), rating(2)).unwrap();
        let recorded = session
            .record_decision(profile("Priya Sharma"), rating(9))
            .unwrap()
            .clone();

        assert_eq!(recorded.profile.name, "Priya Sharma");
        assert_eq!(recorded.rating.value(), 9);
        assert_eq!(session.decisions().last(), Some(&recorded));
    }

    #[test]
    fn test_tenth_decision_moves_to_reporting() {
        let mut session = Session::new();
        for _ in 0..9 {
            session.record_decision(profile("Wei Zhang"), rating(6)).unwrap();
        }
        assert_eq!(session.state(), SessionState::Collecting(9));

        session.record_decision(profile("Wei Zhang"), rating(6)).unwrap();
        assert_eq!(session.state(), SessionState::Reporting);
        assert!(session.is_complete());
    }

    #[test]
    fn test_full_session_rejects_append() {
        let mut session = Session::new();
        for _ in 0..SESSION_LENGTH {
            session.record_decision(profile("Raj Patel"), rating(4)).unwrap();
        }

        let before = session.clone();
        let result = session.record_decision(profile("Extra"), rating(8));
        assert_eq!(result.unwrap_err(), SessionError::SessionFull { capacity: 10 });
        assert_eq!(session, before);
    }

    #[test]
    fn test_completed_decisions_requires_full_session() {
        let mut session = Session::with_length(2);
        session.record_decision(profile("Min Liu"), rating(3)).unwrap();
        assert_eq!(
            session.completed_decisions().unwrap_err(),
            SessionError::Incomplete {
                collected: 1,
                required: 2
            }
        );

        session.record_decision(profile("Min Liu"), rating(3)).unwrap();
        assert_eq!(session.completed_decisions().unwrap().len(), 2);
    }

    #[test]
    fn test_zero_length_is_bumped() {
        assert_eq!(Session::with_length(0).capacity(), 1);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut session = Session::new();
        session.record_decision(profile("Emma Clarke"), rating(8)).unwrap();

        let json = session.to_json().expect("Failed to serialize");
        let restored = Session::from_json(&json).expect("Failed to deserialize");
        assert_eq!(restored, session);
    }

    #[test]
    fn test_rejects_newer_version() {
        let mut session = Session::new();
        session.version = SESSION_VERSION + 1;
        let json = serde_json::to_string(&session).unwrap();
        assert!(matches!(
            Session::from_json(&json),
            Err(ExportError::VersionTooNew(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut session = Session::new();
        session.record_decision(profile("Lucy Williams"), rating(10)).unwrap();
        session.save(&path).unwrap();

        let loaded = Session::load(&path).unwrap();
        assert_eq!(loaded.decisions(), session.decisions());
    }
}
