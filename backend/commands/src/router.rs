/// Interaction router: the entry point a transport feeds interactions into.
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tracing::{error, info};

use slashwire_core::{AutocompleteInteraction, CommandInteraction};

use crate::autocomplete::{dispatch_autocomplete, AutocompleteOutcome};
use crate::dispatch::{dispatch_command, CommandOutcome, RouterSettings};
use crate::registry::Registry;

/// An interaction delivered by the event source.
#[derive(Clone)]
pub enum Interaction {
    Command(Arc<dyn CommandInteraction>),
    Autocomplete(Arc<dyn AutocompleteInteraction>),
}

/// Result of routing one interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Command(CommandOutcome),
    Autocomplete(AutocompleteOutcome),
}

/// Routes interactions against one immutable registry.
pub struct Router {
    registry: Arc<Registry>,
    settings: RouterSettings,
}

impl Router {
    pub fn new(registry: Registry) -> Self {
        Self::with_settings(registry, RouterSettings::default())
    }

    pub fn with_settings(registry: Registry, settings: RouterSettings) -> Self {
        Self { registry: Arc::new(registry), settings }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn settings(&self) -> &RouterSettings {
        &self.settings
    }

    /// Route a single interaction to completion.
    pub async fn handle(&self, interaction: Interaction) -> Outcome {
        match interaction {
            Interaction::Command(i) => Outcome::Command(dispatch_command(&self.registry, i, &self.settings).await),
            Interaction::Autocomplete(i) => {
                Outcome::Autocomplete(dispatch_autocomplete(&self.registry, i, &self.settings).await)
            }
        }
    }

    /// Consume interactions until the sender side closes.
    ///
    /// Each interaction runs in its own task, so a slow or panicking handler
    /// never holds up the others. `Err` items are event source errors and go
    /// to [`Router::on_source_error`]. Returns after in-flight dispatches finish.
    pub async fn run(self: Arc<Self>, mut rx: mpsc::Receiver<anyhow::Result<Interaction>>) {
        let mut in_flight = JoinSet::new();
        info!(commands = self.registry.len(), "Router started");

        loop {
            tokio::select! {
                received = rx.recv() => match received {
                    Some(Ok(interaction)) => {
                        let router = Arc::clone(&self);
                        in_flight.spawn(async move { router.handle(interaction).await });
                    }
                    Some(Err(err)) => self.on_source_error(&err),
                    None => break,
                },
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => log_task_result(joined),
            }
        }

        while let Some(joined) = in_flight.join_next().await {
            log_task_result(joined);
        }
        info!("Interaction stream closed; router stopped");
    }

    /// Errors raised by the event source itself are logged and otherwise ignored.
    pub fn on_source_error(&self, err: &anyhow::Error) {
        error!(error = ?err, "Interaction source error");
    }
}

fn log_task_result(joined: Result<Outcome, JoinError>) {
    if let Err(e) = joined {
        if e.is_panic() {
            error!(error = %e, "Interaction task panicked");
        } else {
            error!(error = %e, "Interaction task was cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use rand::Rng;
    use slashwire_core::{CommandError, MemoryInteraction, Reply};

    use crate::autocomplete::provider_fn;
    use crate::dispatch::handler_fn;
    use crate::types::{Arguments, CommandLeaf, OptionSpec};

    async fn echo(ctx: Arc<dyn CommandInteraction>, args: Arguments) -> Result<(), CommandError> {
        let delay = args.integer("delay").unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(delay as u64)).await;
        let text = args.string("text").unwrap_or_default().to_string();
        ctx.reply(Reply::text(text)).await?;
        Ok(())
    }

    async fn shout(_ctx: Arc<dyn CommandInteraction>, args: Arguments) -> Result<(), CommandError> {
        let delay = args.integer("delay").unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(delay as u64)).await;
        Err(CommandError::failed(format!("shout failed: {}", args.string("text").unwrap_or_default())))
    }

    async fn panics(_ctx: Arc<dyn CommandInteraction>, _args: Arguments) -> Result<(), CommandError> {
        panic!("handler bug");
    }

    async fn names(input: String) -> anyhow::Result<Vec<String>> {
        Ok(vec![format!("{input}-1"), format!("{input}-2")])
    }

    fn router() -> Arc<Router> {
        let registry = Registry::builder()
            .command(
                "echo",
                CommandLeaf::new("Echo", handler_fn(echo))
                    .option("text", OptionSpec::string("Text").with_autocomplete(provider_fn(names)))
                    .option("delay", OptionSpec::integer("Delay ms").with_default(0)),
            )
            .command(
                "shout",
                CommandLeaf::new("Always fails", handler_fn(shout))
                    .option("text", OptionSpec::string("Text"))
                    .option("delay", OptionSpec::integer("Delay ms")),
            )
            .command("panics", CommandLeaf::new("Panics", handler_fn(panics)))
            .build()
            .unwrap();
        Arc::new(Router::new(registry))
    }

    #[tokio::test]
    async fn concurrent_dispatches_stay_isolated() {
        let router = router();
        let (tx, rx) = mpsc::channel(64);
        let handle = tokio::spawn(Arc::clone(&router).run(rx));

        let mut rng = rand::thread_rng();
        let mut sent = Vec::new();
        for n in 0..40 {
            let command = if n % 3 == 0 { "shout" } else { "echo" };
            let i = Arc::new(
                MemoryInteraction::new(command)
                    .option("text", format!("msg-{n}"))
                    .option("delay", rng.gen_range(0..20_i64)),
            );
            tx.send(Ok(Interaction::Command(i.clone()))).await.unwrap();
            sent.push((command, n, i));
        }
        drop(tx);
        tokio::time::timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();

        for (command, n, i) in sent {
            let replies = i.replies();
            assert_eq!(replies.len(), 1, "interaction {n} got {replies:?}");
            match command {
                "echo" => assert_eq!(replies[0], Reply::text(format!("msg-{n}"))),
                _ => {
                    assert!(replies[0].is_ephemeral());
                    assert_eq!(replies[0].body(), format!("shout failed: msg-{n}"));
                }
            }
        }
    }

    #[tokio::test]
    async fn panicking_handler_does_not_stop_the_loop() {
        let router = router();
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(Arc::clone(&router).run(rx));

        let boom = Arc::new(MemoryInteraction::new("panics"));
        let after = Arc::new(MemoryInteraction::new("echo").option("text", "still here"));
        tx.send(Ok(Interaction::Command(boom.clone()))).await.unwrap();
        tx.send(Ok(Interaction::Command(after.clone()))).await.unwrap();
        drop(tx);
        tokio::time::timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();

        assert!(boom.replies().is_empty());
        assert_eq!(after.replies(), vec![Reply::text("still here")]);
    }

    #[tokio::test]
    async fn source_errors_are_logged_and_the_loop_continues() {
        let router = router();
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(Arc::clone(&router).run(rx));

        let before = Arc::new(MemoryInteraction::new("echo").option("text", "before"));
        let after = Arc::new(MemoryInteraction::new("echo").option("text", "after"));
        tx.send(Ok(Interaction::Command(before.clone()))).await.unwrap();
        tx.send(Err(anyhow::anyhow!("gateway dropped a frame"))).await.unwrap();
        tx.send(Ok(Interaction::Command(after.clone()))).await.unwrap();
        drop(tx);
        tokio::time::timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();

        assert_eq!(before.replies(), vec![Reply::text("before")]);
        assert_eq!(after.replies(), vec![Reply::text("after")]);
    }

    #[tokio::test]
    async fn routes_autocomplete_and_ignores_foreign_commands() {
        let router = router();

        let complete = Arc::new(MemoryInteraction::new("echo").with_focus("text", "ab"));
        let outcome = router.handle(Interaction::Autocomplete(complete.clone())).await;
        assert_eq!(outcome, Outcome::Autocomplete(AutocompleteOutcome::Responded { suggestions: 2, delivered: true }));
        let values: Vec<String> = complete.choices().unwrap().into_iter().map(|c| c.value).collect();
        assert_eq!(values, vec!["ab-1", "ab-2"]);

        let foreign = Arc::new(MemoryInteraction::new("other-bot"));
        let outcome = router.handle(Interaction::Command(foreign.clone())).await;
        assert_eq!(outcome, Outcome::Command(CommandOutcome::Unmatched));
        assert!(foreign.replies().is_empty());
    }
}
