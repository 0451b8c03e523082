//! The `marksheet shell` command: an interactive session.
//!
//! Unlike the one-shot commands, edits here are saved in the background
//! while the user keeps typing. Pending writes are awaited on exit.

use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use marksheet_core::model::Theme;
use marksheet_core::session::Session;

use crate::render::{roster_text, subject_label};
use crate::GlobalArgs;

use super::edit::report_update;
use super::theme::{self, ThemeAction};
use super::{mark_index, open_session, subject_index};

const HELP: &str = "\
Commands (numbers start at 1):
  show                       list subjects, marks and averages
  add-subject [name]         add a subject
  rename <s> <name>          rename subject s
  remove-subject <s>         remove subject s
  add-mark <s> [value]       add a mark to subject s
  mark <s> <m> [value]       set mark m of subject s; no value removes it
  theme [toggle|light|dark]  show or change the theme
  reset                      delete all subjects and marks
  help                       show this help
  quit                       leave the shell
";

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Show,
    AddSubject(Option<String>),
    Rename(usize, String),
    RemoveSubject(usize),
    AddMark(usize, Option<String>),
    Mark(usize, usize, String),
    Theme(ThemeAction),
    Reset,
    Help,
    Quit,
}

fn parse(line: &str) -> Result<Option<Command>, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&verb, rest)) = words.split_first() else {
        return Ok(None);
    };

    let number = |i: usize, what: &str| -> Result<usize, String> {
        let word = rest.get(i).ok_or_else(|| format!("missing {what} number"))?;
        word.parse::<usize>()
            .map_err(|_| format!("invalid {what} number: {word}"))
    };
    let at_most = |n: usize| -> Result<(), String> {
        match rest.get(n..) {
            Some(extra) if !extra.is_empty() => {
                Err(format!("unexpected arguments for {verb}: {}", extra.join(" ")))
            }
            _ => Ok(()),
        }
    };
    let text_from = |i: usize| -> Option<String> {
        rest.get(i..)
            .filter(|words| !words.is_empty())
            .map(|words| words.join(" "))
    };

    let command = match verb {
        "show" | "ls" => Command::Show,
        "add-subject" => Command::AddSubject(text_from(0)),
        "rename" => Command::Rename(
            number(0, "subject")?,
            text_from(1).ok_or("missing name")?,
        ),
        "remove-subject" => {
            at_most(1)?;
            Command::RemoveSubject(number(0, "subject")?)
        }
        "add-mark" => {
            at_most(2)?;
            Command::AddMark(number(0, "subject")?, rest.get(1).map(|v| v.to_string()))
        }
        "mark" => {
            at_most(3)?;
            Command::Mark(
                number(0, "subject")?,
                number(1, "mark")?,
                rest.get(2).map(|v| v.to_string()).unwrap_or_default(),
            )
        }
        "theme" => Command::Theme(match rest.first().copied() {
            None => ThemeAction::Show,
            Some("toggle") => ThemeAction::Toggle,
            Some(name) => ThemeAction::Set(name.parse::<Theme>()?),
        }),
        "reset" => Command::Reset,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: {other} (try `help`)")),
    };
    Ok(Some(command))
}

fn apply(session: &mut Session, command: Command, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Show => write!(out, "{}", roster_text(&session.summary(), session.theme()))?,
        Command::AddSubject(name) => {
            let index = session.add_subject();
            if let Some(name) = name {
                session.rename_subject(index, name)?;
            }
            writeln!(out, "Added subject #{}", index + 1)?;
        }
        Command::Rename(subject, name) => {
            let s = subject_index(session.roster(), subject)?;
            session.rename_subject(s, name)?;
            let renamed = session.roster().subject(s)?;
            writeln!(out, "Renamed subject #{} to {}", s + 1, subject_label(&renamed.name))?;
        }
        Command::RemoveSubject(subject) => {
            let s = subject_index(session.roster(), subject)?;
            let removed = session.remove_subject(s)?;
            writeln!(out, "Removed subject #{} ({})", s + 1, subject_label(&removed.name))?;
        }
        Command::AddMark(subject, value) => {
            let s = subject_index(session.roster(), subject)?;
            let m = session.add_mark(s)?;
            writeln!(out, "Added mark #{} to subject #{}", m + 1, s + 1)?;
            if let Some(value) = value {
                let update = session.set_mark(s, m, &value)?;
                report_update(out, session, s, m, update)?;
            }
        }
        Command::Mark(subject, mark, value) => {
            let s = subject_index(session.roster(), subject)?;
            let m = mark_index(session.roster(), s, mark)?;
            let update = session.set_mark(s, m, &value)?;
            report_update(out, session, s, m, update)?;
        }
        Command::Theme(action) => {
            let theme = theme::apply(session, action);
            writeln!(out, "Theme: {theme}")?;
        }
        Command::Help => write!(out, "{HELP}")?,
        // Both need the input stream and are handled by `run`.
        Command::Reset | Command::Quit => {}
    }
    Ok(())
}

/// Read commands from `input` until it ends or the user quits.
pub async fn run<R>(session: &mut Session, input: R, out: &mut dyn Write) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    writeln!(out, "marksheet shell, type `help` for commands")?;

    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Reset => {
                write!(out, "Delete all subjects and marks? [y/N] ")?;
                out.flush()?;
                let answer = lines.next_line().await?.unwrap_or_default();
                if matches!(answer.trim(), "y" | "Y" | "yes") {
                    session.reset();
                    writeln!(out, "Data reset.")?;
                } else {
                    writeln!(out, "Cancelled.")?;
                }
            }
            other => {
                if let Err(e) = apply(session, other, out) {
                    writeln!(out, "Error: {e:#}")?;
                }
            }
        }
    }

    session.flush().await;
    Ok(())
}

pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let mut session = open_session(global).await?;
    let stdin = BufReader::new(tokio::io::stdin());
    run(&mut session, stdin, &mut std::io::stdout()).await
}
