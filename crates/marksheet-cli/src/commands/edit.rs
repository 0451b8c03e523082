//! Commands that edit the roster: subjects and marks.
//!
//! Each command opens the stored roster, applies one edit, waits for the
//! write to finish, and reports what happened.

use std::io::{self, Write};

use anyhow::Result;

use marksheet_core::mark::MarkUpdate;
use marksheet_core::session::Session;
use marksheet_core::statistics::{format_average, subject_average};

use crate::render::{mark_label, subject_label};
use crate::GlobalArgs;

use super::{mark_index, open_session, subject_index};

pub async fn add_subject(global: &GlobalArgs, name: Option<String>) -> Result<()> {
    let mut session = open_session(global).await?;
    let index = session.add_subject();
    if let Some(name) = name {
        session.rename_subject(index, name)?;
    }
    session.flush().await;

    let subject = session.roster().subject(index)?;
    println!("Added subject #{}: {}", index + 1, subject_label(&subject.name));
    Ok(())
}

pub async fn rename(global: &GlobalArgs, subject: usize, name: String) -> Result<()> {
    let mut session = open_session(global).await?;
    let index = subject_index(session.roster(), subject)?;
    session.rename_subject(index, name)?;
    session.flush().await;

    let subject = session.roster().subject(index)?;
    println!("Renamed subject #{} to {}", index + 1, subject_label(&subject.name));
    Ok(())
}

pub async fn remove_subject(global: &GlobalArgs, subject: usize) -> Result<()> {
    let mut session = open_session(global).await?;
    let index = subject_index(session.roster(), subject)?;
    let removed = session.remove_subject(index)?;
    session.flush().await;

    println!(
        "Removed subject #{} ({})",
        index + 1,
        subject_label(&removed.name)
    );
    Ok(())
}

pub async fn add_mark(global: &GlobalArgs, subject: usize, value: Option<String>) -> Result<()> {
    let mut session = open_session(global).await?;
    let s = subject_index(session.roster(), subject)?;
    let m = session.add_mark(s)?;

    let update = match value.as_deref() {
        Some(text) if !text.is_empty() => Some(session.set_mark(s, m, text)?),
        _ => None,
    };
    session.flush().await;

    println!("Added mark #{} to subject #{}", m + 1, s + 1);
    if let Some(update) = update {
        report_update(&mut io::stdout(), &session, s, m, update)?;
    }
    Ok(())
}

pub async fn set_mark(
    global: &GlobalArgs,
    subject: usize,
    mark: usize,
    value: String,
) -> Result<()> {
    let mut session = open_session(global).await?;
    let s = subject_index(session.roster(), subject)?;
    let m = mark_index(session.roster(), s, mark)?;

    let update = session.set_mark(s, m, &value)?;
    session.flush().await;

    report_update(&mut io::stdout(), &session, s, m, update)?;
    Ok(())
}

/// Print the outcome of a mark edit and the subject's new average.
pub fn report_update(
    out: &mut dyn Write,
    session: &Session,
    subject: usize,
    mark: usize,
    update: MarkUpdate,
) -> io::Result<()> {
    let Ok(entry) = session.roster().subject(subject) else {
        return Ok(());
    };
    match update {
        MarkUpdate::Stored => writeln!(
            out,
            "Subject #{} mark #{} = {}",
            subject + 1,
            mark + 1,
            mark_label(&entry.marks[mark])
        )?,
        MarkUpdate::Removed => writeln!(
            out,
            "Removed mark #{} from subject #{}",
            mark + 1,
            subject + 1
        )?,
        MarkUpdate::Rejected(reason) => writeln!(out, "Rejected: {reason}")?,
    }
    writeln!(
        out,
        "Average for {}: {}",
        subject_label(&entry.name),
        format_average(subject_average(&entry.marks[..]))
    )
}
