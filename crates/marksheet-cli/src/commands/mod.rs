//! Subcommand implementations.

use std::sync::Arc;

use anyhow::Result;

use marksheet_core::model::Roster;
use marksheet_core::session::Session;
use marksheet_store::config::{load_config_from, MarksheetConfig};

use crate::GlobalArgs;

pub mod edit;
pub mod init;
pub mod reset;
pub mod shell;
pub mod show;
pub mod theme;

/// Load the config, applying command-line overrides.
pub fn load_config(global: &GlobalArgs) -> Result<MarksheetConfig> {
    let mut config = load_config_from(global.config.as_deref())?;
    if let Some(dir) = &global.data_dir {
        config.data_dir = dir.clone();
    }
    Ok(config)
}

/// Open a session on the configured file store.
pub async fn open_session(global: &GlobalArgs) -> Result<Session> {
    let config = load_config(global)?;
    Ok(open_session_with(&config).await)
}

pub async fn open_session_with(config: &MarksheetConfig) -> Session {
    tracing::debug!(data_dir = %config.data_dir.display(), "opening file store");
    let store = Arc::new(config.file_store());
    Session::open(store, config.session_keys(), config.default_theme).await
}

/// Convert a 1-based subject number into a roster index.
pub fn subject_index(roster: &Roster, number: usize) -> Result<usize> {
    anyhow::ensure!(
        (1..=roster.len()).contains(&number),
        "no subject #{number} (roster has {})",
        plural(roster.len(), "subject")
    );
    Ok(number - 1)
}

/// Convert a 1-based mark number into an index within a subject.
pub fn mark_index(roster: &Roster, subject: usize, number: usize) -> Result<usize> {
    let len = roster.subject(subject)?.marks.len();
    anyhow::ensure!(
        (1..=len).contains(&number),
        "no mark #{number} in subject #{} (it has {})",
        subject + 1,
        plural(len, "mark")
    );
    Ok(number - 1)
}

pub fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}
