//! Core data model types for marksheet.
//!
//! A [`Roster`] is an ordered list of [`Subject`]s, each holding the raw text
//! of its marks. The roster is never empty and no subject has an empty mark
//! list; every operation that removes something restores those invariants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RosterError;
use crate::mark::{self, MarkUpdate};

/// A subject and the marks recorded for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Free-form subject name. May be empty.
    #[serde(default)]
    pub name: String,
    /// Raw mark entries in display order.
    #[serde(default)]
    pub marks: Vec<String>,
}

impl Subject {
    /// A subject with no name and a single empty mark entry.
    pub fn blank() -> Self {
        Self {
            name: String::new(),
            marks: vec![String::new()],
        }
    }

    fn ensure_mark_slot(&mut self) {
        if self.marks.is_empty() {
            self.marks.push(String::new());
        }
    }
}

impl Default for Subject {
    fn default() -> Self {
        Self::blank()
    }
}

/// Ordered list of subjects, in display order.
///
/// Serializes as a plain JSON array of subjects. Deserializing an empty array
/// or a subject without marks re-establishes the invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Subject>", into = "Vec<Subject>")]
pub struct Roster {
    subjects: Vec<Subject>,
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            subjects: vec![Subject::blank()],
        }
    }
}

impl From<Vec<Subject>> for Roster {
    fn from(mut subjects: Vec<Subject>) -> Self {
        if subjects.is_empty() {
            subjects.push(Subject::blank());
        }
        for subject in &mut subjects {
            subject.ensure_mark_slot();
        }
        Self { subjects }
    }
}

impl From<Roster> for Vec<Subject> {
    fn from(roster: Roster) -> Self {
        roster.subjects
    }
}

impl Roster {
    /// The seeded roster: one blank subject.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    /// Never true: a roster always holds at least one subject.
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub fn subject(&self, index: usize) -> Result<&Subject, RosterError> {
        self.subjects.get(index).ok_or(RosterError::SubjectOutOfRange {
            index,
            len: self.subjects.len(),
        })
    }

    fn subject_mut(&mut self, index: usize) -> Result<&mut Subject, RosterError> {
        let len = self.subjects.len();
        self.subjects
            .get_mut(index)
            .ok_or(RosterError::SubjectOutOfRange { index, len })
    }

    /// Append a blank subject and return its index.
    pub fn add_subject(&mut self) -> usize {
        self.subjects.push(Subject::blank());
        self.subjects.len() - 1
    }

    pub fn rename_subject(
        &mut self,
        index: usize,
        name: impl Into<String>,
    ) -> Result<(), RosterError> {
        self.subject_mut(index)?.name = name.into();
        Ok(())
    }

    /// Remove a subject. Removing the only subject leaves a blank one.
    pub fn remove_subject(&mut self, index: usize) -> Result<Subject, RosterError> {
        self.subject(index)?;
        let removed = self.subjects.remove(index);
        if self.subjects.is_empty() {
            self.subjects.push(Subject::blank());
        }
        Ok(removed)
    }

    /// Append an empty mark entry and return its index.
    pub fn add_mark(&mut self, subject_index: usize) -> Result<usize, RosterError> {
        let subject = self.subject_mut(subject_index)?;
        subject.marks.push(String::new());
        Ok(subject.marks.len() - 1)
    }

    /// Apply typed text to a mark entry.
    ///
    /// Empty text removes the entry (a blank one is put back if it was the
    /// last). Other text is stored verbatim only if it passes both the shape
    /// and the range gate; otherwise the entry is left as it was.
    pub fn set_mark(
        &mut self,
        subject_index: usize,
        mark_index: usize,
        raw: &str,
    ) -> Result<MarkUpdate, RosterError> {
        let subject = self.subject_mut(subject_index)?;
        let len = subject.marks.len();
        if mark_index >= len {
            return Err(RosterError::MarkOutOfRange {
                subject: subject_index,
                index: mark_index,
                len,
            });
        }

        if raw.is_empty() {
            subject.marks.remove(mark_index);
            subject.ensure_mark_slot();
            return Ok(MarkUpdate::Removed);
        }

        match mark::check(raw) {
            Ok(()) => {
                subject.marks[mark_index] = raw.to_string();
                Ok(MarkUpdate::Stored)
            }
            Err(rejection) => Ok(MarkUpdate::Rejected(rejection)),
        }
    }

    /// Drop everything and go back to the seeded roster.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Colour theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    /// Only the exact stored values are recognised.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mark::Rejection;

    fn roster_of(marks: &[&str]) -> Roster {
        Roster::from(vec![Subject {
            name: "Maths".into(),
            marks: marks.iter().map(|m| m.to_string()).collect(),
        }])
    }

    #[test]
    fn seeded_roster() {
        let roster = Roster::new();
        assert_eq!(roster.subjects(), &[Subject::blank()]);
        assert!(!roster.is_empty());
    }

    #[test]
    fn add_and_rename_subject() {
        let mut roster = Roster::new();
        let idx = roster.add_subject();
        assert_eq!(idx, 1);
        roster.rename_subject(idx, "History").unwrap();
        assert_eq!(roster.subject(1).unwrap().name, "History");
        assert_eq!(roster.subject(1).unwrap().marks, vec![String::new()]);
    }

    #[test]
    fn rename_out_of_range() {
        let mut roster = Roster::new();
        let err = roster.rename_subject(3, "x").unwrap_err();
        assert_eq!(err, RosterError::SubjectOutOfRange { index: 3, len: 1 });
    }

    #[test]
    fn set_mark_stores_raw_text() {
        let mut roster = Roster::new();
        assert_eq!(roster.set_mark(0, 0, "7.").unwrap(), MarkUpdate::Stored);
        assert_eq!(roster.subject(0).unwrap().marks, vec!["7.".to_string()]);
        assert_eq!(roster.set_mark(0, 0, "7.5").unwrap(), MarkUpdate::Stored);
        assert_eq!(roster.subject(0).unwrap().marks, vec!["7.5".to_string()]);
    }

    #[test]
    fn set_mark_rejections_leave_entry_unchanged() {
        let mut roster = roster_of(&["6"]);
        assert_eq!(
            roster.set_mark(0, 0, "6a").unwrap(),
            MarkUpdate::Rejected(Rejection::Shape)
        );
        assert_eq!(
            roster.set_mark(0, 0, "99").unwrap(),
            MarkUpdate::Rejected(Rejection::Range)
        );
        assert_eq!(roster.subject(0).unwrap().marks, vec!["6".to_string()]);
    }

    #[test]
    fn empty_input_removes_entry() {
        let mut roster = roster_of(&["6", "7", "8"]);
        assert_eq!(roster.set_mark(0, 1, "").unwrap(), MarkUpdate::Removed);
        assert_eq!(
            roster.subject(0).unwrap().marks,
            vec!["6".to_string(), "8".to_string()]
        );
    }

    #[test]
    fn removing_last_entry_leaves_one_blank() {
        let mut roster = roster_of(&["6"]);
        roster.set_mark(0, 0, "").unwrap();
        assert_eq!(roster.subject(0).unwrap().marks, vec![String::new()]);
        roster.set_mark(0, 0, "").unwrap();
        assert_eq!(roster.subject(0).unwrap().marks, vec![String::new()]);
    }

    #[test]
    fn set_mark_out_of_range() {
        let mut roster = Roster::new();
        assert_eq!(
            roster.set_mark(0, 1, "5").unwrap_err(),
            RosterError::MarkOutOfRange {
                subject: 0,
                index: 1,
                len: 1
            }
        );
        assert!(roster.set_mark(1, 0, "5").is_err());
    }

    #[test]
    fn add_mark_appends_blank() {
        let mut roster = roster_of(&["6"]);
        assert_eq!(roster.add_mark(0).unwrap(), 1);
        assert_eq!(
            roster.subject(0).unwrap().marks,
            vec!["6".to_string(), String::new()]
        );
    }

    #[test]
    fn removing_only_subject_reseeds() {
        let mut roster = roster_of(&["6"]);
        let removed = roster.remove_subject(0).unwrap();
        assert_eq!(removed.name, "Maths");
        assert_eq!(roster, Roster::new());
    }

    #[test]
    fn reset_restores_seed() {
        let mut roster = roster_of(&["6", "9"]);
        roster.add_subject();
        roster.reset();
        assert_eq!(roster, Roster::new());
    }

    #[test]
    fn snapshot_is_plain_array() {
        let roster = roster_of(&["8", "7."]);
        let json = serde_json::to_string(&roster).unwrap();
        assert_eq!(json, r#"[{"name":"Maths","marks":["8","7."]}]"#);
        let back: Roster = serde_json::from_str(&json).unwrap();
        assert_eq!(back, roster);
    }

    #[test]
    fn deserialize_normalizes_invariants() {
        let roster: Roster = serde_json::from_str("[]").unwrap();
        assert_eq!(roster, Roster::new());

        let roster: Roster = serde_json::from_str(r#"[{"name":"Art","marks":[]}]"#).unwrap();
        assert_eq!(roster.subject(0).unwrap().marks, vec![String::new()]);
    }

    #[test]
    fn theme_display_and_parse() {
        assert_eq!(Theme::Light.to_string(), "light");
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("Dark".parse::<Theme>().is_err());
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }
}
