//! Per-subject and overall averages.
//!
//! The overall average is the mean of the subject averages, not the mean of
//! every individual mark: a subject with one mark weighs as much as a subject
//! with ten.

use serde::{Deserialize, Serialize};

use crate::mark;
use crate::model::{Roster, Subject};

/// Arithmetic mean of the usable entries, or `None` if there are none.
///
/// Entries that do not parse or lie outside `[0, 10]` are skipped, not
/// counted as zero.
pub fn subject_average<S: AsRef<str>>(marks: &[S]) -> Option<f64> {
    mean(marks.iter().filter_map(|m| mark::value(m.as_ref())))
}

/// Mean of the subject averages of every subject that has one.
pub fn overall_average(roster: &Roster) -> Option<f64> {
    mean(
        roster
            .subjects()
            .iter()
            .filter_map(|s| subject_average(&s.marks[..])),
    )
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0f64, 0usize), |(sum, n), v| (sum + v, n + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Render an average with two decimals, or `"N/A"` when there is no data.
///
/// Rounding works on the exact binary value, so `0.015` (stored just below
/// the half) shows as `"0.01"`. Exact halves round up: `0.125` shows as
/// `"0.13"`.
pub fn format_average(average: Option<f64>) -> String {
    match average {
        Some(avg) if is_exact_half(avg) => format!("{:.2}", (avg * 100.0).round() / 100.0),
        Some(avg) => format!("{avg:.2}"),
        None => "N/A".to_string(),
    }
}

/// Whether the exact decimal expansion of `value` is `d.dd5` followed only by
/// zeros. `{:.2}` would round these to even.
fn is_exact_half(value: f64) -> bool {
    let expanded = format!("{value:.60}");
    let Some(point) = expanded.find('.') else {
        return false;
    };
    let mut rest = expanded[point + 1..].chars().skip(2);
    rest.next() == Some('5') && rest.all(|c| c == '0')
}

/// Averages for every subject plus the overall average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterSummary {
    /// One entry per subject, in roster order.
    pub subjects: Vec<SubjectSummary>,
    /// Mean of the subject averages that exist.
    pub overall_average: Option<f64>,
}

/// Averages for a single subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectSummary {
    pub name: String,
    pub marks: Vec<String>,
    /// Number of entries that count towards the average.
    pub counted: usize,
    pub average: Option<f64>,
}

impl SubjectSummary {
    fn compute(subject: &Subject) -> Self {
        Self {
            name: subject.name.clone(),
            marks: subject.marks.clone(),
            counted: subject
                .marks
                .iter()
                .filter(|m| mark::value(m).is_some())
                .count(),
            average: subject_average(&subject.marks[..]),
        }
    }
}

impl RosterSummary {
    pub fn compute(roster: &Roster) -> Self {
        let subjects: Vec<SubjectSummary> =
            roster.subjects().iter().map(SubjectSummary::compute).collect();
        let overall_average = mean(subjects.iter().filter_map(|s| s.average));
        Self {
            subjects,
            overall_average,
        }
    }
}
