//! Lookup tables for synthetic candidate profiles
//!
//! Every field of a generated profile is drawn from one of these tables.
//! The built-in lists are illustrative content only; any of them can be
//! replaced through a config file as long as the tables stay non-empty.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which side of the name-origin partition a bucket belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameOrigin {
    Western,
    NonWestern,
}

impl NameOrigin {
    /// Human-readable label used in reports and errors
    pub fn label(&self) -> &'static str {
        match self {
            Self::Western => "western",
            Self::NonWestern => "non-western",
        }
    }
}

/// A labelled pool of literal full names
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NameBucket {
    /// Bucket label, e.g. `male_western`
    pub label: String,
    /// Side of the name-origin partition
    pub origin: NameOrigin,
    /// Full names, in a fixed order
    pub names: Vec<String>,
}

impl NameBucket {
    /// Create a bucket from literal names
    pub fn new(label: impl Into<String>, origin: NameOrigin, names: &[&str]) -> Self {
        Self {
            label: label.into(),
            origin,
            names: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Check whether this bucket lists the given full name
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

/// Education strings that mark a prestige institution
pub const DEFAULT_PRESTIGE_MARKERS: [&str; 3] = ["Russell", "Oxford", "Cambridge"];

/// All lookup tables used by the profile generator and the report
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileTables {
    pub name_buckets: Vec<NameBucket>,
    pub universities: Vec<String>,
    pub experiences: Vec<String>,
    pub extracurriculars: Vec<String>,
    /// Substrings of an education entry that place it in the prestige tier
    pub prestige_markers: Vec<String>,
}

impl Default for ProfileTables {
    fn default() -> Self {
        Self {
            name_buckets: vec![
                NameBucket::new(
                    "male_western",
                    NameOrigin::Western,
                    &["James Wilson", "Oliver Smith", "Thomas Brown"],
                ),
                NameBucket::new(
                    "female_western",
                    NameOrigin::Western,
                    &["Emma Clarke", "Sophie Taylor", "Lucy Williams"],
                ),
                NameBucket::new(
                    "male_non_western",
                    NameOrigin::NonWestern,
                    &["Mohammed Khan", "Wei Zhang", "Raj Patel"],
                ),
                NameBucket::new(
                    "female_non_western",
                    NameOrigin::NonWestern,
                    &["Fatima Hussein", "Min Liu", "Priya Sharma"],
                ),
            ],
            universities: strings(&[
                "Local Post-92 University",
                "Russell Group University",
                "Oxford/Cambridge",
                "International University",
            ]),
            experiences: strings(&[
                "2 years retail at Tesco",
                "18 months office admin",
                "Summer internship at big tech company",
                "Part-time work through university",
            ]),
            extracurriculars: strings(&[
                "Cricket club captain",
                "Student newspaper editor",
                "Community volunteer",
                "University debate society",
            ]),
            prestige_markers: strings(&DEFAULT_PRESTIGE_MARKERS),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn has_blank(entries: &[String]) -> bool {
    entries.iter().any(|e| e.trim().is_empty())
}

impl ProfileTables {
    /// Check that every table can be sampled from and both name origins exist
    ///
    /// Blank entries are rejected: a blank prestige marker would match every
    /// education string, and a blank name or field renders as nothing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name_buckets.is_empty() {
            return Err(ConfigError::EmptyTable("name_buckets".into()));
        }
        for bucket in &self.name_buckets {
            if bucket.names.is_empty() {
                return Err(ConfigError::EmptyTable(format!(
                    "name_buckets.{}",
                    bucket.label
                )));
            }
            if has_blank(&bucket.names) {
                return Err(ConfigError::BlankEntry(format!(
                    "name_buckets.{}",
                    bucket.label
                )));
            }
        }
        for origin in [NameOrigin::Western, NameOrigin::NonWestern] {
            if !self.name_buckets.iter().any(|b| b.origin == origin) {
                return Err(ConfigError::MissingOrigin(origin.label()));
            }
        }

        let tables = [
            ("universities", &self.universities),
            ("experiences", &self.experiences),
            ("extracurriculars", &self.extracurriculars),
            ("prestige_markers", &self.prestige_markers),
        ];
        for (name, table) in tables {
            if table.is_empty() {
                return Err(ConfigError::EmptyTable(name.into()));
            }
            if has_blank(table) {
                return Err(ConfigError::BlankEntry(name.into()));
            }
        }
        Ok(())
    }

    /// Every name across every bucket
    pub fn all_names(&self) -> impl Iterator<Item = &str> {
        self.name_buckets
            .iter()
            .flat_map(|b| b.names.iter().map(String::as_str))
    }

    /// Names belonging to buckets of the given origin
    pub fn names_with_origin(&self, origin: NameOrigin) -> impl Iterator<Item = &str> {
        self.name_buckets
            .iter()
            .filter(move |b| b.origin == origin)
            .flat_map(|b| b.names.iter().map(String::as_str))
    }

    /// Find the bucket listing a name
    pub fn bucket_of(&self, name: &str) -> Option<&NameBucket> {
        self.name_buckets.iter().find(|b| b.contains(name))
    }
}
