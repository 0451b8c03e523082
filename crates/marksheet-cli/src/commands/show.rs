//! The `marksheet show` command.

use anyhow::Result;
use serde::Serialize;

use marksheet_core::model::Theme;
use marksheet_core::statistics::RosterSummary;

use crate::render::roster_text;
use crate::GlobalArgs;

#[derive(Serialize)]
struct JsonView<'a> {
    theme: Theme,
    #[serde(flatten)]
    summary: &'a RosterSummary,
}

pub async fn execute(global: &GlobalArgs, format: String) -> Result<()> {
    let session = super::open_session(global).await?;
    let summary = session.summary();

    match format.as_str() {
        "json" => {
            let view = JsonView {
                theme: session.theme(),
                summary: &summary,
            };
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        "text" => print!("{}", roster_text(&summary, session.theme())),
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }

    Ok(())
}
