//! Drive a replay script through the router's event loop.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::info;

use slashwire_commands::Router;

use crate::script::{Script, Transcript};

/// Send every scripted interaction through [`Router::run`], wait for the
/// loop to drain, then collect what each interaction recorded.
pub async fn replay(router: Arc<Router>, script: &Script) -> Result<Vec<Transcript>> {
    let (tx, rx) = mpsc::channel(64);
    let running = tokio::spawn(router.run(rx));

    let mut recorded = Vec::with_capacity(script.interactions.len());
    for entry in &script.interactions {
        let (interaction, memory) = entry.to_interaction();
        tx.send(Ok(interaction)).await.context("Router stopped before the script finished")?;
        recorded.push((entry, memory));
    }
    drop(tx);
    running.await.context("Router task failed")?;
    info!(interactions = recorded.len(), "Replay finished");

    Ok(recorded
        .into_iter()
        .enumerate()
        .map(|(index, (entry, memory))| Transcript {
            index,
            kind: entry.kind,
            command: entry.command.clone(),
            replies: memory.replies(),
            choices: memory.choices(),
        })
        .collect())
}
