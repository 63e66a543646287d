/// Command dispatch: run the resolved handler and report its outcome.
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use slashwire_config::SlashwireConfig;
use slashwire_core::{CommandError, CommandInteraction, Embed, Reply, ERROR_COLOR};

use crate::coerce::coerce;
use crate::registry::Registry;
use crate::types::{Arguments, CommandPath};

// ---------------------------------------------------------------------------
// Handler trait
// ---------------------------------------------------------------------------

/// Business logic behind one leaf command.
///
/// The handler may reply through `ctx` itself; if it returns `Ok` without
/// replying, the dispatcher acknowledges on its behalf.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, ctx: Arc<dyn CommandInteraction>, args: Arguments) -> Result<(), CommandError>;
}

/// Adapter turning an async function into a [`CommandHandler`].
pub struct HandlerFn<F>(F);

pub fn handler_fn<F, Fut>(f: F) -> HandlerFn<F>
where
    F: Fn(Arc<dyn CommandInteraction>, Arguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), CommandError>> + Send + 'static,
{
    HandlerFn(f)
}

#[async_trait]
impl<F, Fut> CommandHandler for HandlerFn<F>
where
    F: Fn(Arc<dyn CommandInteraction>, Arguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), CommandError>> + Send + 'static,
{
    async fn handle(&self, ctx: Arc<dyn CommandInteraction>, args: Arguments) -> Result<(), CommandError> {
        (self.0)(ctx, args).await
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Presentation knobs for the replies the router sends on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterSettings {
    /// Acknowledgment sent when a handler succeeds without replying.
    pub success_message: String,
    pub error_title: String,
    pub error_color: u32,
    /// Upper bound on suggestions forwarded per autocomplete request.
    pub max_choices: usize,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            success_message: "✅ Success".to_string(),
            error_title: "Error".to_string(),
            error_color: ERROR_COLOR,
            max_choices: 25,
        }
    }
}

impl From<&SlashwireConfig> for RouterSettings {
    /// Unset fields keep their built-in values.
    fn from(config: &SlashwireConfig) -> Self {
        let mut settings = Self::default();
        if let Some(replies) = &config.replies {
            if let Some(message) = &replies.success_message {
                settings.success_message = message.clone();
            }
            if let Some(title) = &replies.error_title {
                settings.error_title = title.clone();
            }
            if let Some(color) = replies.error_color {
                settings.error_color = color;
            }
        }
        if let Some(max) = config.autocomplete.as_ref().and_then(|a| a.max_choices) {
            settings.max_choices = max;
        }
        settings
    }
}

// ---------------------------------------------------------------------------
// Executor
// ---------------------------------------------------------------------------

/// What happened to one command interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// No registered command matched; nothing was sent.
    Unmatched,
    /// The handler succeeded. `acknowledged` is true when the dispatcher sent the default reply.
    Completed { acknowledged: bool },
    /// The handler failed. `reported` is true when an error notice reached the user.
    Failed { command: String, reported: bool },
}

/// Resolve, coerce and run one command interaction.
///
/// Never fails: handler errors and reply-delivery errors are logged and folded
/// into the returned outcome.
pub async fn dispatch_command(
    registry: &Registry,
    interaction: Arc<dyn CommandInteraction>,
    settings: &RouterSettings,
) -> CommandOutcome {
    let path = CommandPath::from_source(&*interaction);
    let Some(leaf) = registry.resolve(&path) else {
        debug!(command = %path, "No registered command matches; ignoring");
        return CommandOutcome::Unmatched;
    };

    let args = coerce(leaf, &*interaction);
    info!(command = %path, interaction = %interaction.id(), "Dispatching command");

    match leaf.handler().handle(Arc::clone(&interaction), args).await {
        Ok(()) => {
            if interaction.replied() {
                return CommandOutcome::Completed { acknowledged: false };
            }
            let acknowledged = match interaction.reply(Reply::text(settings.success_message.clone())).await {
                Ok(()) => true,
                Err(e) => {
                    warn!(command = %path, error = %e, "Failed to send success acknowledgment");
                    false
                }
            };
            CommandOutcome::Completed { acknowledged }
        }
        Err(err) => {
            error!(command = %path, error = ?err, "Error while running command '{}'", path);
            let reported = match err.user_message() {
                Some(message) => report_failure(&*interaction, &path, message, settings).await,
                None => false,
            };
            CommandOutcome::Failed { command: path.to_string(), reported }
        }
    }
}

/// Send the private error notice. Delivery errors stop here.
async fn report_failure(
    interaction: &dyn CommandInteraction,
    path: &CommandPath,
    message: String,
    settings: &RouterSettings,
) -> bool {
    let embed = Embed::error(settings.error_title.clone(), message, settings.error_color);
    match interaction.reply(Reply::ephemeral_embed(embed)).await {
        Ok(()) => true,
        Err(e) => {
            error!(command = %path, error = %e, "Failed to send error notice");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slashwire_core::MemoryInteraction;

    use crate::registry::Registry;
    use crate::types::{CommandLeaf, GroupDef, OptionSpec};

    async fn quiet(_ctx: Arc<dyn CommandInteraction>, _args: Arguments) -> Result<(), CommandError> {
        Ok(())
    }

    async fn talkative(ctx: Arc<dyn CommandInteraction>, _args: Arguments) -> Result<(), CommandError> {
        ctx.reply(Reply::text("done it myself")).await?;
        Ok(())
    }

    async fn bad_input(_ctx: Arc<dyn CommandInteraction>, _args: Arguments) -> Result<(), CommandError> {
        Err(CommandError::failed("bad input"))
    }

    async fn silent(_ctx: Arc<dyn CommandInteraction>, _args: Arguments) -> Result<(), CommandError> {
        Err(CommandError::Silent)
    }

    fn registry() -> Registry {
        Registry::builder()
            .command("quiet", CommandLeaf::new("Does nothing", handler_fn(quiet)))
            .command("talkative", CommandLeaf::new("Replies itself", handler_fn(talkative)))
            .command(
                "admin",
                GroupDef::new().command(
                    "user",
                    GroupDef::new()
                        .command("ban", CommandLeaf::new("Fails loudly", handler_fn(bad_input)))
                        .command("kick", CommandLeaf::new("Fails quietly", handler_fn(silent))),
                ),
            )
            .build()
            .unwrap()
    }

    async fn run(interaction: &Arc<MemoryInteraction>) -> CommandOutcome {
        let dyn_interaction: Arc<dyn CommandInteraction> = interaction.clone();
        dispatch_command(&registry(), dyn_interaction, &RouterSettings::default()).await
    }

    #[tokio::test]
    async fn quiet_handler_gets_exactly_one_acknowledgment() {
        let i = Arc::new(MemoryInteraction::new("quiet"));
        let outcome = run(&i).await;

        assert_eq!(outcome, CommandOutcome::Completed { acknowledged: true });
        assert_eq!(i.replies(), vec![Reply::text("✅ Success")]);
    }

    #[tokio::test]
    async fn handler_reply_suppresses_acknowledgment() {
        let i = Arc::new(MemoryInteraction::new("talkative"));
        let outcome = run(&i).await;

        assert_eq!(outcome, CommandOutcome::Completed { acknowledged: false });
        assert_eq!(i.replies(), vec![Reply::text("done it myself")]);
    }

    #[tokio::test]
    async fn failure_with_message_sends_one_private_notice() {
        let i = Arc::new(MemoryInteraction::new("admin").with_group("user").with_subcommand("ban"));
        let outcome = run(&i).await;

        assert_eq!(
            outcome,
            CommandOutcome::Failed { command: "admin user ban".into(), reported: true }
        );
        let replies = i.replies();
        assert_eq!(replies.len(), 1);
        assert!(replies[0].is_ephemeral());
        assert!(replies[0].body().contains("bad input"));
        match &replies[0] {
            Reply::Embed { embed, .. } => {
                assert_eq!(embed.title, "Error");
                assert_eq!(embed.color, ERROR_COLOR);
            }
            other => panic!("expected an embed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failure_without_message_is_only_logged() {
        let i = Arc::new(MemoryInteraction::new("admin").with_group("user").with_subcommand("kick"));
        let outcome = run(&i).await;

        assert_eq!(
            outcome,
            CommandOutcome::Failed { command: "admin user kick".into(), reported: false }
        );
        assert!(i.replies().is_empty());
    }

    #[tokio::test]
    async fn broken_reply_channel_is_swallowed() {
        let failing = Arc::new(MemoryInteraction::new("admin").with_group("user").with_subcommand("ban").failing_delivery());
        assert_eq!(
            run(&failing).await,
            CommandOutcome::Failed { command: "admin user ban".into(), reported: false }
        );

        let failing_ack = Arc::new(MemoryInteraction::new("quiet").failing_delivery());
        assert_eq!(run(&failing_ack).await, CommandOutcome::Completed { acknowledged: false });
    }

    #[test]
    fn settings_follow_config_overrides() {
        let config = SlashwireConfig {
            replies: Some(slashwire_config::RepliesConfig {
                success_message: Some("Done".into()),
                error_color: Some(0xFF0000),
                ..Default::default()
            }),
            autocomplete: Some(slashwire_config::AutocompleteConfig { max_choices: Some(10) }),
            ..Default::default()
        };
        let settings = RouterSettings::from(&config);
        assert_eq!(settings.success_message, "Done");
        assert_eq!(settings.error_title, "Error");
        assert_eq!(settings.error_color, 0xFF0000);
        assert_eq!(settings.max_choices, 10);
        assert_eq!(RouterSettings::from(&SlashwireConfig::default()), RouterSettings::default());
    }

    #[tokio::test]
    async fn empty_path_parts_still_reach_the_command() {
        let i = Arc::new(MemoryInteraction::new("quiet").with_group("").with_subcommand(""));
        assert_eq!(run(&i).await, CommandOutcome::Completed { acknowledged: true });
        assert_eq!(i.replies(), vec![Reply::text("✅ Success")]);
    }

    #[tokio::test]
    async fn unknown_command_sends_nothing() {
        let i = Arc::new(MemoryInteraction::new("nope"));
        assert_eq!(run(&i).await, CommandOutcome::Unmatched);
        assert!(i.replies().is_empty());
    }

    #[tokio::test]
    async fn handler_receives_coerced_arguments() {
        async fn echo(ctx: Arc<dyn CommandInteraction>, args: Arguments) -> Result<(), CommandError> {
            let text = args.string("text").unwrap_or("nothing");
            let times = args.integer("times").unwrap_or(0);
            ctx.reply(Reply::text(format!("{text} x{times}"))).await?;
            Ok(())
        }

        let registry = Registry::builder()
            .command(
                "echo",
                CommandLeaf::new("Echo", handler_fn(echo))
                    .option("text", OptionSpec::string("Text"))
                    .option("times", OptionSpec::integer("Repeat").with_default(5)),
            )
            .build()
            .unwrap();

        let i = Arc::new(MemoryInteraction::new("echo").option("text", "hey"));
        let dyn_i: Arc<dyn CommandInteraction> = i.clone();
        dispatch_command(&registry, dyn_i, &RouterSettings::default()).await;

        assert_eq!(i.replies(), vec![Reply::text("hey x5")]);
    }
}
