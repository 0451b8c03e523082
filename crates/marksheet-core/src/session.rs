//! The running session: roster and theme plus their persistence.
//!
//! A [`Session`] is created by loading both values from a [`KeyValueStore`],
//! so nothing can be edited before the load has finished. After that every
//! change spawns a background write. Writes to the same key carry increasing
//! revisions and a write older than one already applied is dropped, so the
//! stored value ends up matching the latest in-memory state no matter in
//! which order the tasks finish.
//!
//! Storage failures are logged and otherwise ignored: the in-memory roster
//! is the source of truth.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::error::RosterError;
use crate::mark::MarkUpdate;
use crate::model::{Roster, Subject, Theme};
use crate::statistics::RosterSummary;
use crate::traits::KeyValueStore;

/// Default key for the roster snapshot.
pub const DEFAULT_ROSTER_KEY: &str = "student-subjects";

/// Default key for the theme preference.
pub const DEFAULT_THEME_KEY: &str = "app-theme";

/// Storage keys used by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKeys {
    pub roster: String,
    pub theme: String,
}

impl Default for SessionKeys {
    fn default() -> Self {
        Self {
            roster: DEFAULT_ROSTER_KEY.to_string(),
            theme: DEFAULT_THEME_KEY.to_string(),
        }
    }
}

#[derive(Debug)]
enum Write {
    Set(String),
    Remove,
}

/// Serializes writes to a single key and drops stale ones.
struct KeyWriter {
    store: Arc<dyn KeyValueStore>,
    key: String,
    revision: u64,
    applied: Arc<Mutex<u64>>,
}

impl KeyWriter {
    fn new(store: Arc<dyn KeyValueStore>, key: String) -> Self {
        Self {
            store,
            key,
            revision: 0,
            applied: Arc::new(Mutex::new(0)),
        }
    }

    fn submit(&mut self, write: Write) -> JoinHandle<()> {
        self.revision += 1;
        tokio::spawn(apply(
            Arc::clone(&self.store),
            Arc::clone(&self.applied),
            self.key.clone(),
            self.revision,
            write,
        ))
    }
}

async fn apply(
    store: Arc<dyn KeyValueStore>,
    applied: Arc<Mutex<u64>>,
    key: String,
    revision: u64,
    write: Write,
) {
    let mut latest = applied.lock().await;
    if *latest > revision {
        tracing::debug!(key = %key, revision, latest = *latest, "dropping stale write");
        return;
    }
    // Recorded even on failure so an older write can't land afterwards.
    *latest = revision;

    let result = match &write {
        Write::Set(value) => store.set(&key, value).await,
        Write::Remove => store.remove(&key).await,
    };
    match result {
        Ok(()) => tracing::debug!(key = %key, revision, "write applied"),
        Err(e) => tracing::warn!(
            key = %key,
            revision,
            backend = store.name(),
            "failed to persist {}: {e:#}",
            match write {
                Write::Set(_) => "value",
                Write::Remove => "removal",
            }
        ),
    }
}

/// Roster and theme for one running front end.
pub struct Session {
    store: Arc<dyn KeyValueStore>,
    keys: SessionKeys,
    roster: Roster,
    theme: Theme,
    roster_writer: KeyWriter,
    theme_writer: KeyWriter,
    pending: Vec<JoinHandle<()>>,
}

impl Session {
    /// Load the roster and theme from `store`.
    ///
    /// A missing or unreadable roster gives the seeded roster. A missing,
    /// unreadable or unknown theme gives `default_theme`. Must be called
    /// within a Tokio runtime, as must every mutating method.
    pub async fn open(
        store: Arc<dyn KeyValueStore>,
        keys: SessionKeys,
        default_theme: Theme,
    ) -> Self {
        let roster = load_roster(store.as_ref(), &keys.roster).await;
        let theme = load_theme(store.as_ref(), &keys.theme)
            .await
            .unwrap_or(default_theme);
        tracing::debug!(
            subjects = roster.len(),
            theme = %theme,
            backend = store.name(),
            "session opened"
        );

        Self {
            roster_writer: KeyWriter::new(Arc::clone(&store), keys.roster.clone()),
            theme_writer: KeyWriter::new(Arc::clone(&store), keys.theme.clone()),
            store,
            keys,
            roster,
            theme,
            pending: Vec::new(),
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn keys(&self) -> &SessionKeys {
        &self.keys
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn summary(&self) -> RosterSummary {
        RosterSummary::compute(&self.roster)
    }

    pub fn add_subject(&mut self) -> usize {
        let index = self.roster.add_subject();
        self.save_roster();
        index
    }

    pub fn rename_subject(
        &mut self,
        index: usize,
        name: impl Into<String>,
    ) -> Result<(), RosterError> {
        self.roster.rename_subject(index, name)?;
        self.save_roster();
        Ok(())
    }

    pub fn remove_subject(&mut self, index: usize) -> Result<Subject, RosterError> {
        let removed = self.roster.remove_subject(index)?;
        self.save_roster();
        Ok(removed)
    }

    pub fn add_mark(&mut self, subject_index: usize) -> Result<usize, RosterError> {
        let index = self.roster.add_mark(subject_index)?;
        self.save_roster();
        Ok(index)
    }

    /// Apply typed mark text. Rejected input changes nothing and is not saved.
    pub fn set_mark(
        &mut self,
        subject_index: usize,
        mark_index: usize,
        raw: &str,
    ) -> Result<MarkUpdate, RosterError> {
        let update = self.roster.set_mark(subject_index, mark_index, raw)?;
        if update.is_change() {
            self.save_roster();
        } else {
            tracing::debug!(subject_index, mark_index, ?update, "mark input rejected");
        }
        Ok(update)
    }

    /// Go back to the seeded roster and delete the stored snapshot.
    ///
    /// The seeded roster itself is not written, so the key stays absent
    /// until the next edit.
    pub fn reset(&mut self) {
        self.roster.reset();
        let handle = self.roster_writer.submit(Write::Remove);
        self.track(handle);
        tracing::info!("roster reset");
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        let handle = self
            .theme_writer
            .submit(Write::Set(theme.as_str().to_string()));
        self.track(handle);
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.set_theme(self.theme.toggled());
        self.theme
    }

    /// Wait for every write spawned so far.
    pub async fn flush(&mut self) {
        let handles = std::mem::take(&mut self.pending);
        for result in join_all(handles).await {
            if let Err(e) = result {
                tracing::error!("write task failed: {e}");
            }
        }
    }

    fn save_roster(&mut self) {
        match serde_json::to_string(&self.roster) {
            Ok(json) => {
                let handle = self.roster_writer.submit(Write::Set(json));
                self.track(handle);
            }
            Err(e) => tracing::error!("failed to serialize roster: {e}"),
        }
    }

    fn track(&mut self, handle: JoinHandle<()>) {
        self.pending.retain(|h| !h.is_finished());
        self.pending.push(handle);
    }
}

async fn load_roster(store: &dyn KeyValueStore, key: &str) -> Roster {
    match store.get(key).await {
        Ok(Some(json)) => match serde_json::from_str::<Roster>(&json) {
            Ok(roster) => roster,
            Err(e) => {
                tracing::warn!(key, "stored roster is not valid JSON, starting empty: {e}");
                Roster::new()
            }
        },
        Ok(None) => {
            tracing::debug!(key, "no stored roster");
            Roster::new()
        }
        Err(e) => {
            tracing::error!(key, "failed to load roster: {e:#}");
            Roster::new()
        }
    }
}

async fn load_theme(store: &dyn KeyValueStore, key: &str) -> Option<Theme> {
    match store.get(key).await {
        Ok(Some(value)) => match value.parse::<Theme>() {
            Ok(theme) => Some(theme),
            Err(e) => {
                tracing::warn!(key, "ignoring stored theme: {e}");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::error!(key, "failed to load theme: {e:#}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;

    #[derive(Default)]
    struct TestStore {
        values: StdMutex<HashMap<String, String>>,
        broken: bool,
    }

    impl TestStore {
        fn broken() -> Self {
            Self {
                broken: true,
                ..Default::default()
            }
        }

        fn value(&self, key: &str) -> Option<String> {
            self.values.lock().unwrap().get(key).cloned()
        }
    }

    #[async_trait]
    impl KeyValueStore for TestStore {
        fn name(&self) -> &str {
            "test"
        }

        async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
            anyhow::ensure!(!self.broken, "disk on fire");
            Ok(self.value(key))
        }

        async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
            anyhow::ensure!(!self.broken, "disk on fire");
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn remove(&self, key: &str) -> anyhow::Result<()> {
            anyhow::ensure!(!self.broken, "disk on fire");
            self.values.lock().unwrap().remove(key);
            Ok(())
        }
    }

    #[tokio::test]
    async fn stale_write_is_dropped() {
        let store = Arc::new(TestStore::default());
        let gate = Arc::new(Mutex::new(0));
        let dyn_store: Arc<dyn KeyValueStore> = store.clone();

        apply(dyn_store.clone(), gate.clone(), "k".into(), 2, Write::Set("new".into())).await;
        apply(dyn_store, gate.clone(), "k".into(), 1, Write::Set("old".into())).await;

        assert_eq!(store.value("k").as_deref(), Some("new"));
        assert_eq!(*gate.lock().await, 2);
    }

    #[tokio::test]
    async fn edits_are_persisted_after_flush() {
        let store = Arc::new(TestStore::default());
        let mut session = Session::open(store.clone(), SessionKeys::default(), Theme::Light).await;

        session.rename_subject(0, "Maths").unwrap();
        session.set_mark(0, 0, "8").unwrap();
        session.add_mark(0).unwrap();
        session.set_mark(0, 1, "6").unwrap();
        session.flush().await;

        let stored = store.value(DEFAULT_ROSTER_KEY).unwrap();
        let roster: Roster = serde_json::from_str(&stored).unwrap();
        assert_eq!(&roster, session.roster());
    }

    #[tokio::test]
    async fn rejected_mark_is_not_saved() {
        let store = Arc::new(TestStore::default());
        let mut session = Session::open(store.clone(), SessionKeys::default(), Theme::Light).await;

        let update = session.set_mark(0, 0, "42").unwrap();
        assert!(!update.is_change());
        session.flush().await;
        assert!(store.value(DEFAULT_ROSTER_KEY).is_none());
    }

    #[tokio::test]
    async fn failing_store_keeps_memory_state() {
        let store: Arc<dyn KeyValueStore> = Arc::new(TestStore::broken());
        let mut session = Session::open(store, SessionKeys::default(), Theme::Dark).await;

        assert_eq!(session.roster(), &Roster::new());
        assert_eq!(session.theme(), Theme::Dark);

        session.set_mark(0, 0, "9").unwrap();
        session.toggle_theme();
        session.flush().await;

        assert_eq!(session.roster().subject(0).unwrap().marks, vec!["9".to_string()]);
        assert_eq!(session.theme(), Theme::Light);
    }

    #[tokio::test]
    async fn reset_removes_snapshot() {
        let store = Arc::new(TestStore::default());
        let mut session = Session::open(store.clone(), SessionKeys::default(), Theme::Light).await;

        session.set_mark(0, 0, "7").unwrap();
        session.add_subject();
        session.reset();
        session.flush().await;

        assert_eq!(session.roster(), &Roster::new());
        assert!(store.value(DEFAULT_ROSTER_KEY).is_none());
    }
}
