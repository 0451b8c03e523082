//! Marksheet configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use marksheet_core::model::Theme;
use marksheet_core::session::{SessionKeys, DEFAULT_ROSTER_KEY, DEFAULT_THEME_KEY};

use crate::file::FileStore;

/// Top-level marksheet configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarksheetConfig {
    /// Directory holding the stored values.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Theme used when none has been stored yet.
    #[serde(default)]
    pub default_theme: Theme,
    /// Key of the roster snapshot.
    #[serde(default = "default_roster_key")]
    pub roster_key: String,
    /// Key of the theme preference.
    #[serde(default = "default_theme_key")]
    pub theme_key: String,
}

fn default_data_dir() -> PathBuf {
    match home_dir() {
        Some(home) => home.join(".local").join("share").join("marksheet"),
        None => PathBuf::from("./marksheet-data"),
    }
}
fn default_roster_key() -> String {
    DEFAULT_ROSTER_KEY.to_string()
}
fn default_theme_key() -> String {
    DEFAULT_THEME_KEY.to_string()
}

impl Default for MarksheetConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            default_theme: Theme::default(),
            roster_key: default_roster_key(),
            theme_key: default_theme_key(),
        }
    }
}

impl MarksheetConfig {
    pub fn session_keys(&self) -> SessionKeys {
        SessionKeys {
            roster: self.roster_key.clone(),
            theme: self.theme_key.clone(),
        }
    }

    /// File store rooted at `data_dir`.
    pub fn file_store(&self) -> FileStore {
        FileStore::new(&self.data_dir)
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `marksheet.toml` in the current directory
/// 2. `~/.config/marksheet/config.toml`
///
/// Falls back to defaults when neither exists.
pub fn load_config() -> Result<MarksheetConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<MarksheetConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("marksheet.toml");
        if local.exists() {
            Some(local)
        } else {
            config_dir()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<MarksheetConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => MarksheetConfig::default(),
    };

    anyhow::ensure!(
        config.roster_key != config.theme_key,
        "roster_key and theme_key must differ (both are {:?})",
        config.roster_key
    );

    Ok(config)
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

fn config_dir() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".config").join("marksheet"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = MarksheetConfig::default();
        assert_eq!(config.default_theme, Theme::Light);
        assert_eq!(config.roster_key, "student-subjects");
        assert_eq!(config.theme_key, "app-theme");
        assert_eq!(config.session_keys(), SessionKeys::default());
    }

    #[test]
    fn parse_partial_config() {
        let toml_str = r#"
data_dir = "/tmp/marks"
default_theme = "dark"
"#;
        let config: MarksheetConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/marks"));
        assert_eq!(config.default_theme, Theme::Dark);
        assert_eq!(config.roster_key, "student-subjects");
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let err = load_config_from(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marksheet.toml");
        std::fs::write(&path, "roster_key = \"marks\"\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.roster_key, "marks");
        assert_eq!(config.theme_key, "app-theme");
    }

    #[test]
    fn clashing_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marksheet.toml");
        std::fs::write(&path, "roster_key = \"same\"\ntheme_key = \"same\"\n").unwrap();
        assert!(load_config_from(Some(&path)).is_err());
    }
}
