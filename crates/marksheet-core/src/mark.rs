//! Mark-entry validation.
//!
//! Mark entries are kept as the text the user typed so that half-finished
//! input such as `"7."` survives between keystrokes. Acceptance is decided by
//! two separate gates: a lexical shape check and a numeric range check.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Lowest mark on the scale.
pub const MIN_MARK: f64 = 0.0;

/// Highest mark on the scale.
pub const MAX_MARK: f64 = 10.0;

/// At most two integer digits, optionally a point and at most two fractional
/// digits. Both sides may be empty so partial input like `"."` passes.
fn shape_pattern() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    SHAPE.get_or_init(|| Regex::new(r"^[0-9]{0,2}(\.[0-9]{0,2})?$").unwrap())
}

/// Same as the shape pattern but with at least one digit on each side that
/// is present. Entries outside this form are shown as incomplete.
fn complete_pattern() -> &'static Regex {
    static COMPLETE: OnceLock<Regex> = OnceLock::new();
    COMPLETE.get_or_init(|| Regex::new(r"^[0-9]{1,2}(\.[0-9]{1,2})?$").unwrap())
}

/// Longest leading decimal literal, as used when averaging stored entries.
fn number_prefix() -> &'static Regex {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    PREFIX.get_or_init(|| {
        Regex::new(r"^[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?").unwrap()
    })
}

/// Why a mark entry was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rejection {
    /// The text is not a decimal of the form `dd.dd`.
    Shape,
    /// The text has the right form but is not a number in `[0, 10]`.
    Range,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Shape => write!(f, "expected up to two digits before and after the point"),
            Rejection::Range => write!(f, "mark must be between 0 and 10"),
        }
    }
}

/// Outcome of [`Roster::set_mark`](crate::model::Roster::set_mark).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "outcome", content = "reason")]
pub enum MarkUpdate {
    /// The text was stored verbatim.
    Stored,
    /// Empty input removed the entry.
    Removed,
    /// The input was refused and the stored entry is unchanged.
    Rejected(Rejection),
}

impl MarkUpdate {
    /// Returns `true` if the roster changed.
    pub fn is_change(&self) -> bool {
        !matches!(self, MarkUpdate::Rejected(_))
    }
}

/// Check non-empty mark text against both gates.
///
/// Returns `Ok(())` if the text may be stored.
pub fn check(raw: &str) -> Result<(), Rejection> {
    if !shape_pattern().is_match(raw) {
        return Err(Rejection::Shape);
    }
    match raw.parse::<f64>() {
        Ok(value) if in_range(value) => Ok(()),
        _ => Err(Rejection::Range),
    }
}

/// Parse an entry into a mark usable for averaging.
///
/// Only the leading number counts, so a hand-edited `"8abc"` averages as 8.
/// Entries with no leading number, or whose number falls outside `[0, 10]`,
/// yield `None`.
pub fn value(entry: &str) -> Option<f64> {
    let literal = number_prefix().find(entry.trim())?;
    literal
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && in_range(*v))
}

fn in_range(value: f64) -> bool {
    (MIN_MARK..=MAX_MARK).contains(&value)
}

/// Display state of a stored entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkState {
    /// Nothing typed yet.
    Empty,
    /// A finished decimal such as `"7"` or `"7.25"`.
    Complete,
    /// Accepted but unfinished, such as `"7."` or `".5"`.
    Incomplete,
}

impl MarkState {
    pub fn classify(entry: &str) -> Self {
        if entry.is_empty() {
            MarkState::Empty
        } else if complete_pattern().is_match(entry) {
            MarkState::Complete
        } else {
            MarkState::Incomplete
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_marks_on_scale() {
        for s in ["0", "10", "7", "7.5", "9.75", "05", "7.", ".5", "0.0", "10.00"] {
            assert_eq!(check(s), Ok(()), "{s} should be accepted");
        }
    }

    #[test]
    fn shape_gate() {
        for s in ["100", "1.234", "abc", "-1", "7,5", " 7", "1e1", "+5", "7..", "٣"] {
            assert_eq!(check(s), Err(Rejection::Shape), "{s} should fail shape");
        }
    }

    #[test]
    fn range_gate() {
        for s in ["11", "99", "10.01", "10.5", "."] {
            assert_eq!(check(s), Err(Rejection::Range), "{s} should fail range");
        }
    }

    #[test]
    fn value_excludes_invalid_entries() {
        assert_eq!(value("8"), Some(8.0));
        assert_eq!(value("7."), Some(7.0));
        assert_eq!(value(".5"), Some(0.5));
        assert_eq!(value(""), None);
        assert_eq!(value("abc"), None);
        assert_eq!(value("11"), None);
        assert_eq!(value("-1"), None);
        assert_eq!(value("NaN"), None);
        assert_eq!(value("inf"), None);
        assert_eq!(value("Infinity"), None);
    }

    #[test]
    fn value_reads_leading_number() {
        assert_eq!(value("8abc"), Some(8.0));
        assert_eq!(value(" 7.5 "), Some(7.5));
        assert_eq!(value("7,5"), Some(7.0));
        assert_eq!(value("1.5.3"), Some(1.5));
        assert_eq!(value("1e1"), Some(10.0));
        assert_eq!(value("2e"), Some(2.0));
        assert_eq!(value("+5"), Some(5.0));
        assert_eq!(value("12abc"), None);
        assert_eq!(value("x8"), None);
    }

    #[test]
    fn classify_states() {
        assert_eq!(MarkState::classify(""), MarkState::Empty);
        assert_eq!(MarkState::classify("7"), MarkState::Complete);
        assert_eq!(MarkState::classify("7.25"), MarkState::Complete);
        assert_eq!(MarkState::classify("7."), MarkState::Incomplete);
        assert_eq!(MarkState::classify(".5"), MarkState::Incomplete);
    }

    #[test]
    fn rejected_update_is_not_a_change() {
        assert!(MarkUpdate::Stored.is_change());
        assert!(MarkUpdate::Removed.is_change());
        assert!(!MarkUpdate::Rejected(Rejection::Range).is_change());
    }
}
