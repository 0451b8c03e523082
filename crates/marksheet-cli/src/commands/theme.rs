//! The `marksheet theme` and `marksheet settings` commands.

use anyhow::Result;

use marksheet_core::model::Theme;
use marksheet_core::session::Session;

use crate::GlobalArgs;

use super::{load_config, open_session, open_session_with};

/// What to do with the theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeAction {
    Show,
    Toggle,
    Set(Theme),
}

impl ThemeAction {
    pub fn from_args(toggle: bool, set: Option<&str>) -> Result<Self> {
        match (toggle, set) {
            (true, Some(_)) => anyhow::bail!("use either --toggle or --set, not both"),
            (true, None) => Ok(ThemeAction::Toggle),
            (false, Some(name)) => name
                .parse::<Theme>()
                .map(ThemeAction::Set)
                .map_err(|e| anyhow::anyhow!("{e} (expected light or dark)")),
            (false, None) => Ok(ThemeAction::Show),
        }
    }
}

/// Apply the action and return the resulting theme.
pub fn apply(session: &mut Session, action: ThemeAction) -> Theme {
    match action {
        ThemeAction::Show => session.theme(),
        ThemeAction::Toggle => session.toggle_theme(),
        ThemeAction::Set(theme) => {
            session.set_theme(theme);
            theme
        }
    }
}

pub async fn execute(global: &GlobalArgs, toggle: bool, set: Option<String>) -> Result<()> {
    let action = ThemeAction::from_args(toggle, set.as_deref())?;
    let mut session = open_session(global).await?;
    let theme = apply(&mut session, action);
    session.flush().await;

    println!("Theme: {theme}");
    Ok(())
}

pub async fn settings(global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let session = open_session_with(&config).await;
    let dark = session.theme() == Theme::Dark;

    println!("Dark mode: {}", if dark { "on" } else { "off" });
    println!(
        "Storage: {} in {}",
        session.store().name(),
        config.data_dir.display()
    );
    println!(
        "Keys: roster={}, theme={}",
        session.keys().roster,
        session.keys().theme
    );
    println!();
    println!("Credits");
    println!("  Made with care.");
    println!("  Thanks for using the app!");
    println!();
    println!("App version");
    println!("  {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
