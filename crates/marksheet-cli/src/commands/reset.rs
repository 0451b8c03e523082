//! The `marksheet reset` command.

use anyhow::Result;

use crate::GlobalArgs;

pub async fn execute(global: &GlobalArgs, yes: bool) -> Result<()> {
    anyhow::ensure!(
        yes,
        "this deletes all subjects and marks; run again with --yes to confirm"
    );

    let mut session = super::open_session(global).await?;
    session.reset();
    session.flush().await;

    println!("Data reset.");
    Ok(())
}
