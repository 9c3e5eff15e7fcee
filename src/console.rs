//! Terminal front end: profile table, rating prompt and report
//!
//! Everything here renders to plain strings or talks to a generic reader and
//! writer, so the same code drives stdin/stdout in the binary and in-memory
//! cursors in tests.

use serde::Serialize;
use std::io::{BufRead, Write};

use crate::interactive::aggregation::BiasReport;
use crate::interactive::evaluator::{RatedDecision, Rating};
use crate::interactive::traits::Rater;
use crate::profile::generator::CandidateProfile;

/// Heading printed above the instructions
pub const TITLE: &str = "Check Your Bias: CV Rating Exercise";

/// Instructions shown once before the first profile
pub const ABOUT: &str = "\
### About This Exercise
You're about to rate 10 graduate CVs. Each decision you make helps reveal potential unconscious biases in hiring.

Try to be consistent in your ratings, but don't overthink each decision - often biases show up in quick, instinctive judgments.";

/// Question asked under every profile
pub const RATING_PROMPT: &str = "How suitable is this candidate? (1-10)";

/// Meaning of the ends of the scale
pub const RATING_HINT: &str = "1 = Not at all suitable, 10 = Extremely suitable";

/// Questions printed after the average ratings
pub const REFLECTION_QUESTIONS: [&str; 4] = [
    "Were you surprised by any patterns in your ratings?",
    "Did certain names, universities, or experiences influence your decisions more than others?",
    "How might these subtle preferences affect real-world hiring decisions?",
    "What steps could you take to make more objective assessments?",
];

const COLUMNS: [&str; 4] = ["Name", "Education", "Experience", "Extra-curricular"];

/// Title and instructions shown once at the start
pub fn render_intro() -> String {
    format!("{}\n{}\n\n{}\n", TITLE, "=".repeat(TITLE.len()), ABOUT)
}

/// Heading plus a one-row table of the profile
pub fn render_profile(profile: &CandidateProfile, round: usize, total: usize) -> String {
    let cells = [
        profile.name.as_str(),
        profile.education.as_str(),
        profile.experience.as_str(),
        profile.extracurricular.as_str(),
    ];
    let widths: Vec<usize> = COLUMNS
        .iter()
        .zip(cells.iter())
        .map(|(h, c)| h.chars().count().max(c.chars().count()))
        .collect();

    let row = |values: &[&str]| {
        values
            .iter()
            .zip(widths.iter())
            .map(|(v, w)| format!(" {:<w$} ", v, w = *w))
            .collect::<Vec<_>>()
            .join("|")
    };
    let rule = widths
        .iter()
        .map(|w| "-".repeat(w + 2))
        .collect::<Vec<_>>()
        .join("|");

    format!(
        "\nCandidate Profile: {}/{}\n\n{}\n{}\n{}\n",
        round,
        total,
        row(&COLUMNS),
        rule,
        row(&cells)
    )
}

/// The four group means and the reflection questions
pub fn render_report(report: &BiasReport) -> String {
    let metrics = report.metrics();
    let label_width = metrics
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::from("\nYour Rating Patterns\n\n### Your Average Ratings\n");
    for (label, mean) in metrics {
        out.push_str(&format!("  {:<label_width$}  {}\n", label, mean));
    }

    out.push_str("\n### Reflection Questions\n");
    for (i, question) in REFLECTION_QUESTIONS.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, question));
    }
    out
}

#[derive(Serialize)]
struct JsonMetric<'a> {
    label: &'a str,
    mean: Option<f64>,
    count: usize,
    display: String,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    metrics: Vec<JsonMetric<'a>>,
    name_origin_gap: Option<f64>,
    university_gap: Option<f64>,
    decisions: &'a [RatedDecision],
}

/// The report and the decisions behind it as pretty JSON
pub fn render_json(
    report: &BiasReport,
    decisions: &[RatedDecision],
) -> Result<String, serde_json::Error> {
    let output = JsonOutput {
        metrics: report
            .metrics()
            .into_iter()
            .map(|(label, mean)| JsonMetric {
                label,
                mean: mean.value(),
                count: mean.count(),
                display: mean.to_string(),
            })
            .collect(),
        name_origin_gap: report.name_origin.gap(),
        university_gap: report.university.gap(),
        decisions,
    };
    serde_json::to_string_pretty(&output)
}

/// Outcome of reading one line of rating input
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RatingInput {
    /// An integer was entered, or the default was accepted
    Value(i64),
    /// The line was not an integer
    Invalid(String),
    /// Input ended
    Closed,
}

/// Interpret one line of input; empty submits the default
pub fn parse_rating_line(line: &str, default: Rating) -> RatingInput {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return RatingInput::Value(i64::from(default.value()));
    }
    match trimmed.parse::<i64>() {
        Ok(value) => RatingInput::Value(value),
        Err(_) => RatingInput::Invalid(trimmed.to_string()),
    }
}

/// Rater that shows each profile on a writer and reads ratings from a reader
pub struct ConsoleRater<I, O> {
    input: I,
    output: O,
}

impl<I: BufRead, O: Write> ConsoleRater<I, O> {
    /// Create a rater reading ratings from `input` and writing to `output`
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    /// Give back the writer, e.g. to inspect captured output
    pub fn into_output(self) -> O {
        self.output
    }

    fn read_line(&mut self, default: Rating) -> RatingInput {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => RatingInput::Closed,
            Ok(_) => parse_rating_line(&line, default),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read rating");
                RatingInput::Closed
            }
        }
    }

    // Output errors are not fatal to the exercise; a closed stdout is
    // noticed when the next read hits end of input.
    fn write(&mut self, text: &str) {
        if let Err(e) = self.output.write_all(text.as_bytes()).and_then(|_| self.output.flush()) {
            tracing::warn!(error = %e, "failed to write to terminal");
        }
    }
}

impl<I: BufRead, O: Write> Rater for ConsoleRater<I, O> {
    fn rate(
        &mut self,
        profile: &CandidateProfile,
        round: usize,
        total: usize,
        default: Rating,
    ) -> Option<i64> {
        self.write(&render_profile(profile, round, total));
        loop {
            self.write(&format!(
                "\n{}\n{}\nRating [{}]: ",
                RATING_PROMPT, RATING_HINT, default
            ));
            match self.read_line(default) {
                RatingInput::Value(value) => return Some(value),
                RatingInput::Invalid(text) => {
                    self.write(&format!("'{}' is not a whole number, try again.\n", text));
                }
                RatingInput::Closed => return None,
            }
        }
    }

    fn rejected(&mut self, _value: i64, reason: &str) {
        self.write(&format!("{}. Try again.\n", reason));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactive::exercise::{Exercise, ExerciseOutcome};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Cursor;

    fn sample_profile() -> CandidateProfile {
        CandidateProfile::new(
            "Fatima Hussein",
            "International University",
            "Part-time work through university",
            "University debate society",
        )
    }

    #[test]
    fn test_render_profile_contains_fields() {
        let text = render_profile(&sample_profile(), 3, 10);
        assert!(text.contains("Candidate Profile: 3/10"));
        assert!(text.contains("Extra-curricular"));
        assert!(text.contains("Fatima Hussein"));
        assert!(text.contains("University debate society"));
    }

    #[test]
    fn test_parse_rating_line() {
        let default = Rating::new(5).unwrap();
        assert_eq!(parse_rating_line("\n", default), RatingInput::Value(5));
        assert_eq!(parse_rating_line(" 8 \n", default), RatingInput::Value(8));
        assert_eq!(parse_rating_line("42", default), RatingInput::Value(42));
        assert_eq!(
            parse_rating_line("seven", default),
            RatingInput::Invalid("seven".to_string())
        );
    }

    #[test]
    fn test_console_rater_reprompts_on_bad_input() {
        let input = Cursor::new("abc\n7\n");
        let mut rater = ConsoleRater::new(input, Vec::new());
        let default = Rating::new(5).unwrap();

        assert_eq!(rater.rate(&sample_profile(), 1, 10, default), Some(7));
        let output = String::from_utf8(rater.into_output()).unwrap();
        assert!(output.contains("'abc' is not a whole number"));
        assert_eq!(output.matches(RATING_PROMPT).count(), 2);
    }

    #[test]
    fn test_console_rater_end_of_input() {
        let mut rater = ConsoleRater::new(Cursor::new(""), Vec::new());
        let default = Rating::new(5).unwrap();
        assert_eq!(rater.rate(&sample_profile(), 1, 10, default), None);
    }

    #[test]
    fn test_console_session_end_to_end() {
        // Out-of-range first answer, then defaults for every round.
        let input = Cursor::new(format!("11\n{}", "\n".repeat(10)));
        let mut rater = ConsoleRater::new(input, Vec::new());
        let mut rng = StdRng::seed_from_u64(5);

        let outcome = Exercise::builder()
            .build()
            .unwrap()
            .run(&mut rng, &mut rater)
            .unwrap();
        let (report, session) = match outcome {
            ExerciseOutcome::Completed { report, session } => (report, session),
            ExerciseOutcome::Abandoned { .. } => panic!("Expected Completed"),
        };
        assert!(session.decisions().iter().all(|d| d.rating.value() == 5));

        let output = String::from_utf8(rater.into_output()).unwrap();
        assert!(output.contains("Rating 11 is outside the scale 1-10"));
        assert!(output.contains("Candidate Profile: 10/10"));

        let text = render_report(&report);
        assert!(text.contains("Your Average Ratings"));
        assert!(text.contains("4. What steps could you take"));
    }

    #[test]
    fn test_render_json() {
        let report = crate::interactive::aggregation::ReportAggregator::default().report_for(&[]);
        let json = render_json(&report, &[]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["metrics"][0]["label"], "Western Names");
        assert_eq!(value["metrics"][0]["display"], "insufficient data");
        assert!(value["metrics"][0]["mean"].is_null());
    }
}
