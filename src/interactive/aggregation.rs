//! Partition means over a completed session
//!
//! This module splits the rated decisions of a session along two fixed
//! dimensions and averages the ratings on each side.
//!
//! # Partitions
//!
//! - **Name origin**: exact membership of the candidate name in the names of
//!   the buckets marked western. Everything else counts as non-western.
//! - **University tier**: the education entry contains one of the prestige
//!   markers (`Russell`, `Oxford`, `Cambridge` by default). Everything else
//!   counts as other.
//!
//! Each pair of partitions is disjoint and covers every decision. A side
//! with no decisions reports [`PartitionMean::InsufficientData`] instead of
//! dividing by zero.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::evaluator::{RatedDecision, RatingScale};
use super::session::Session;
use super::traits::PartitionPredicate;
use crate::error::SessionError;
use crate::profile::generator::CandidateProfile;
use crate::profile::tables::{NameOrigin, ProfileTables};

/// Selects candidates whose full name is listed in a western bucket
#[derive(Clone, Debug)]
pub struct NameOriginPredicate {
    western_names: HashSet<String>,
}

impl NameOriginPredicate {
    /// Build from the western buckets of the tables
    pub fn from_tables(tables: &ProfileTables) -> Self {
        Self {
            western_names: tables
                .names_with_origin(NameOrigin::Western)
                .map(str::to_string)
                .collect(),
        }
    }

    /// Build from an explicit list of western names
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            western_names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl PartitionPredicate for NameOriginPredicate {
    fn label(&self) -> &str {
        "Western Names"
    }

    fn complement_label(&self) -> &str {
        "Non-Western Names"
    }

    fn matches(&self, profile: &CandidateProfile) -> bool {
        self.western_names.contains(&profile.name)
    }
}

/// Selects candidates whose education mentions a prestige marker
#[derive(Clone, Debug)]
pub struct PrestigePredicate {
    markers: Vec<String>,
}

impl PrestigePredicate {
    /// Build from the prestige markers of the tables
    pub fn from_tables(tables: &ProfileTables) -> Self {
        Self::new(tables.prestige_markers.iter().cloned())
    }

    /// Build from explicit markers
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }
}

impl PartitionPredicate for PrestigePredicate {
    fn label(&self) -> &str {
        "Russell Group/Oxbridge"
    }

    fn complement_label(&self) -> &str {
        "Other Universities"
    }

    fn matches(&self, profile: &CandidateProfile) -> bool {
        self.markers
            .iter()
            .any(|marker| profile.education.contains(marker.as_str()))
    }
}

/// Mean rating of one side of a partition
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PartitionMean {
    /// At least one decision fell on this side
    Mean { value: f64, count: usize },
    /// No decision fell on this side
    InsufficientData,
}

impl PartitionMean {
    /// Average the ratings of the given decisions
    pub fn of<'a, I>(decisions: I) -> Self
    where
        I: IntoIterator<Item = &'a RatedDecision>,
    {
        let (sum, count) = decisions
            .into_iter()
            .fold((0.0, 0usize), |(sum, count), d| (sum + d.rating.as_f64(), count + 1));

        if count > 0 {
            Self::Mean {
                value: sum / count as f64,
                count,
            }
        } else {
            Self::InsufficientData
        }
    }

    /// The mean, if any decision fell on this side
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Mean { value, .. } => Some(*value),
            Self::InsufficientData => None,
        }
    }

    /// Number of decisions averaged
    pub fn count(&self) -> usize {
        match self {
            Self::Mean { count, .. } => *count,
            Self::InsufficientData => 0,
        }
    }
}

impl fmt::Display for PartitionMean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mean { value, .. } => {
                write!(f, "{:.1}/{}", value, RatingScale::one_to_ten().max)
            }
            Self::InsufficientData => write!(f, "insufficient data"),
        }
    }
}

/// A labelled group mean and the mean of its complement
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartitionSplit {
    pub label: String,
    pub mean: PartitionMean,
    pub complement_label: String,
    pub complement_mean: PartitionMean,
}

impl PartitionSplit {
    /// Split decisions with a predicate and average each side
    pub fn compute<P>(decisions: &[RatedDecision], predicate: &P) -> Self
    where
        P: PartitionPredicate + ?Sized,
    {
        let (inside, outside): (Vec<&RatedDecision>, Vec<&RatedDecision>) = decisions
            .iter()
            .partition(|d| predicate.matches(&d.profile));

        Self {
            label: predicate.label().to_string(),
            mean: PartitionMean::of(inside),
            complement_label: predicate.complement_label().to_string(),
            complement_mean: PartitionMean::of(outside),
        }
    }

    /// Group mean minus complement mean, when both sides have data
    pub fn gap(&self) -> Option<f64> {
        Some(self.mean.value()? - self.complement_mean.value()?)
    }
}

/// The four group means shown at the end of a session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiasReport {
    pub name_origin: PartitionSplit,
    pub university: PartitionSplit,
    /// Number of decisions the report was computed from
    pub decisions: usize,
}

impl BiasReport {
    /// Mean rating of candidates with western names
    pub fn western_mean(&self) -> PartitionMean {
        self.name_origin.mean
    }

    /// Mean rating of candidates with non-western names
    pub fn non_western_mean(&self) -> PartitionMean {
        self.name_origin.complement_mean
    }

    /// Mean rating of candidates from prestige universities
    pub fn prestige_mean(&self) -> PartitionMean {
        self.university.mean
    }

    /// Mean rating of candidates from other universities
    pub fn other_mean(&self) -> PartitionMean {
        self.university.complement_mean
    }

    /// The four metrics in display order
    pub fn metrics(&self) -> [(&str, PartitionMean); 4] {
        [
            (self.name_origin.label.as_str(), self.name_origin.mean),
            (
                self.name_origin.complement_label.as_str(),
                self.name_origin.complement_mean,
            ),
            (self.university.label.as_str(), self.university.mean),
            (
                self.university.complement_label.as_str(),
                self.university.complement_mean,
            ),
        ]
    }
}

/// Computes bias reports for sessions drawn from one set of tables
#[derive(Clone, Debug)]
pub struct ReportAggregator {
    name_origin: NameOriginPredicate,
    university: PrestigePredicate,
}

impl ReportAggregator {
    /// Build both predicates from the tables
    pub fn new(tables: &ProfileTables) -> Self {
        Self {
            name_origin: NameOriginPredicate::from_tables(tables),
            university: PrestigePredicate::from_tables(tables),
        }
    }

    /// Compute the report for a completed session
    pub fn compute_report(&self, session: &Session) -> Result<BiasReport, SessionError> {
        let decisions = session.completed_decisions()?;
        let report = self.report_for(decisions);

        tracing::info!(
            decisions = report.decisions,
            western = %report.western_mean(),
            non_western = %report.non_western_mean(),
            prestige = %report.prestige_mean(),
            other = %report.other_mean(),
            "computed bias report"
        );
        Ok(report)
    }

    /// Compute the report over any slice of decisions
    pub fn report_for(&self, decisions: &[RatedDecision]) -> BiasReport {
        BiasReport {
            name_origin: PartitionSplit::compute(decisions, &self.name_origin),
            university: PartitionSplit::compute(decisions, &self.university),
            decisions: decisions.len(),
        }
    }
}

impl Default for ReportAggregator {
    fn default() -> Self {
        Self::new(&ProfileTables::default())
    }
}

/// Compute the report for a completed session using the default tables
pub fn compute_report(session: &Session) -> Result<BiasReport, SessionError> {
    ReportAggregator::default().compute_report(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactive::evaluator::Rating;
    use approx::assert_relative_eq;

    fn decision(name: &str, education: &str, rating: i64) -> (CandidateProfile, Rating) {
        (
            CandidateProfile::new(
                name,
                education,
                "18 months office admin",
                "Student newspaper editor",
            ),
            Rating::new(rating).unwrap(),
        )
    }

    fn session_of(decisions: Vec<(CandidateProfile, Rating)>) -> Session {
        let mut session = Session::new();
        for (profile, rating) in decisions {
            session.record_decision(profile, rating).unwrap();
        }
        session
    }

    fn mixed_session(rating: i64) -> Session {
        let names = ["James Wilson", "Mohammed Khan"];
        let schools = ["Oxford/Cambridge", "Local Post-92 University"];
        session_of(
            (0..10)
                .map(|i| decision(names[i % 2], schools[(i / 2) % 2], rating))
                .collect(),
        )
    }

    #[test]
    fn test_all_sevens_report_seven_everywhere() {
        let report = compute_report(&mixed_session(7)).unwrap();
        for (_, mean) in report.metrics() {
            assert_eq!(mean.to_string(), "7.0/10");
        }
    }

    #[test]
    fn test_name_origin_membership() {
        let mut decisions = vec![
            decision("James Wilson", "International University", 9),
            decision("Mohammed Khan", "International University", 3),
        ];
        decisions.extend((0..8).map(|_| decision("Sophie Taylor", "International University", 5)));
        let report = compute_report(&session_of(decisions)).unwrap();

        assert_eq!(report.western_mean().count(), 9);
        assert_eq!(report.non_western_mean().count(), 1);
        assert_relative_eq!(report.non_western_mean().value().unwrap(), 3.0);
        assert_relative_eq!(report.western_mean().value().unwrap(), 49.0 / 9.0);
    }

    #[test]
    fn test_university_membership() {
        let mut decisions = vec![
            decision("Wei Zhang", "Oxford/Cambridge", 10),
            decision("Wei Zhang", "Local Post-92 University", 2),
        ];
        decisions.extend((0..8).map(|_| decision("Wei Zhang", "Russell Group University", 6)));
        let report = compute_report(&session_of(decisions)).unwrap();

        assert_eq!(report.prestige_mean().count(), 9);
        assert_eq!(report.other_mean().count(), 1);
        assert_relative_eq!(report.other_mean().value().unwrap(), 2.0);
        assert_relative_eq!(report.prestige_mean().value().unwrap(), 58.0 / 9.0);
    }

    #[test]
    fn test_empty_partition_reports_sentinel() {
        let session = session_of(
            (0..10)
                .map(|_| decision("Priya Sharma", "International University", 4))
                .collect(),
        );
        let report = compute_report(&session).unwrap();

        assert_eq!(report.western_mean(), PartitionMean::InsufficientData);
        assert_eq!(report.western_mean().to_string(), "insufficient data");
        assert_eq!(report.prestige_mean(), PartitionMean::InsufficientData);
        assert_eq!(report.non_western_mean().to_string(), "4.0/10");
        assert_eq!(report.other_mean().to_string(), "4.0/10");
        assert_eq!(report.name_origin.gap(), None);
    }

    #[test]
    fn test_partitions_are_exhaustive_and_disjoint() {
        let report = compute_report(&mixed_session(5)).unwrap();
        assert_eq!(
            report.western_mean().count() + report.non_western_mean().count(),
            10
        );
        assert_eq!(
            report.prestige_mean().count() + report.other_mean().count(),
            10
        );
    }

    #[test]
    fn test_incomplete_session_is_rejected() {
        let session = session_of(vec![decision("Min Liu", "Oxford/Cambridge", 8)]);
        assert_eq!(
            compute_report(&session).unwrap_err(),
            SessionError::Incomplete {
                collected: 1,
                required: 10
            }
        );
    }

    #[test]
    fn test_name_match_is_exact_not_substring() {
        let predicate = NameOriginPredicate::from_tables(&ProfileTables::default());
        let (profile, _) = decision("Robin Williamson", "Oxford/Cambridge", 5);
        assert!(!predicate.matches(&profile));
    }

    #[test]
    fn test_gap() {
        let split = PartitionSplit {
            label: "a".into(),
            mean: PartitionMean::Mean {
                value: 7.5,
                count: 4,
            },
            complement_label: "b".into(),
            complement_mean: PartitionMean::Mean {
                value: 6.0,
                count: 6,
            },
        };
        assert_relative_eq!(split.gap().unwrap(), 1.5);
    }

    #[test]
    fn test_custom_markers() {
        let predicate = PrestigePredicate::new(["Sorbonne"]);
        let (profile, _) = decision("Emma Clarke", "Sorbonne Université", 5);
        assert!(predicate.matches(&profile));
        let (profile, _) = decision("Emma Clarke", "Oxford/Cambridge", 5);
        assert!(!predicate.matches(&profile));
    }

    #[test]
    fn test_mean_formatting_rounds_to_one_decimal() {
        let mean = PartitionMean::Mean {
            value: 20.0 / 3.0,
            count: 3,
        };
        assert_eq!(mean.to_string(), "6.7/10");
    }
}
