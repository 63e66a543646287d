/// Demo command set used by the `slashwire` binary.
///
/// Each handler is either a plain async function wrapped with `handler_fn`
/// or a struct implementing `CommandHandler` when it needs state.
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use slashwire_core::{CommandError, CommandInteraction, Reply};

use crate::autocomplete::provider_fn;
use crate::dispatch::{handler_fn, CommandHandler};
use crate::registry::{CommandSummary, Registry, RegistryBuilder, RegistryError};
use crate::types::{Arguments, CommandLeaf, GroupDef, OptionSpec};

const CITIES: &[&str] = &[
    "Amsterdam", "Athens", "Berlin", "Bern", "Brussels", "Lisbon", "London", "Madrid", "Oslo", "Paris",
    "Prague", "Rome", "Vienna", "Warsaw",
];

// ---------------------------------------------------------------------------
// /ping
// ---------------------------------------------------------------------------

async fn ping(ctx: Arc<dyn CommandInteraction>, _args: Arguments) -> Result<(), CommandError> {
    ctx.reply(Reply::text("🏓 Pong!")).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// /echo
// ---------------------------------------------------------------------------

async fn echo(ctx: Arc<dyn CommandInteraction>, args: Arguments) -> Result<(), CommandError> {
    let text = args.string("text").ok_or_else(|| CommandError::failed("Nothing to echo"))?;
    let reply = if args.boolean("private").unwrap_or(false) {
        Reply::ephemeral_text(text)
    } else {
        Reply::text(text)
    };
    ctx.reply(reply).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// /math add, /math div
// ---------------------------------------------------------------------------

async fn add(ctx: Arc<dyn CommandInteraction>, args: Arguments) -> Result<(), CommandError> {
    let a = args.integer("a").unwrap_or(0);
    let b = args.integer("b").unwrap_or(0);
    let sum = a.checked_add(b).ok_or_else(|| CommandError::failed("Result does not fit in 64 bits"))?;
    ctx.reply(Reply::text(format!("{a} + {b} = {sum}"))).await?;
    Ok(())
}

async fn div(ctx: Arc<dyn CommandInteraction>, args: Arguments) -> Result<(), CommandError> {
    let a = args.number("a").unwrap_or(0.0);
    let b = args.number("b").unwrap_or(1.0);
    if b == 0.0 {
        return Err(CommandError::failed("Cannot divide by zero"));
    }
    ctx.reply(Reply::text(format!("{a} / {b} = {}", a / b))).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// /weather forecast
// ---------------------------------------------------------------------------

async fn forecast(ctx: Arc<dyn CommandInteraction>, args: Arguments) -> Result<(), CommandError> {
    let city = args.string("city").ok_or_else(|| CommandError::failed("Pick a city"))?;
    let days = args.integer("days").unwrap_or(3);
    let unit = args.string("unit").unwrap_or("celsius");
    ctx.reply(Reply::text(format!("🌤️ {days}-day forecast for {city} ({unit}) is on its way"))).await?;
    Ok(())
}

async fn city_suggestions(input: String) -> Result<Vec<String>> {
    let needle = input.to_lowercase();
    Ok(CITIES
        .iter()
        .filter(|city| city.to_lowercase().starts_with(&needle))
        .map(|city| city.to_string())
        .collect())
}

// ---------------------------------------------------------------------------
// /admin status, /admin user info|ban
// ---------------------------------------------------------------------------

async fn status(_ctx: Arc<dyn CommandInteraction>, _args: Arguments) -> Result<(), CommandError> {
    info!("[Commands] Status requested");
    Ok(())
}

async fn user_info(ctx: Arc<dyn CommandInteraction>, args: Arguments) -> Result<(), CommandError> {
    let user = args.user("target").ok_or_else(|| CommandError::failed("No user given"))?;
    ctx.reply(Reply::ephemeral_text(format!("👤 {} (id `{}`)", user.username, user.id))).await?;
    Ok(())
}

async fn ban(_ctx: Arc<dyn CommandInteraction>, args: Arguments) -> Result<(), CommandError> {
    let who = args.user("target").map(|u| u.username.clone()).unwrap_or_default();
    info!("[Commands] Ban requested for '{}' but moderation is not wired up", who);
    Err(CommandError::Silent)
}

// ---------------------------------------------------------------------------
// /help
// ---------------------------------------------------------------------------

pub struct HelpHandler {
    pub commands: Vec<CommandSummary>,
}

#[async_trait]
impl CommandHandler for HelpHandler {
    async fn handle(&self, ctx: Arc<dyn CommandInteraction>, _args: Arguments) -> Result<(), CommandError> {
        let mut lines = vec!["*Available commands:*".to_string()];
        for cmd in &self.commands {
            lines.push(format!("• `/{}` — {}", cmd.path, cmd.description));
        }
        ctx.reply(Reply::ephemeral_text(lines.join("\n"))).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

fn demo_commands() -> RegistryBuilder {
    Registry::builder()
        .command("ping", CommandLeaf::new("Check that the bot is alive.", handler_fn(ping)))
        .command(
            "echo",
            CommandLeaf::new("Repeat some text.", handler_fn(echo))
                .option("text", OptionSpec::string("Text to repeat"))
                .option("private", OptionSpec::boolean("Only show it to me").with_default(false)),
        )
        .command(
            "math",
            GroupDef::new()
                .command(
                    "add",
                    CommandLeaf::new("Add two integers.", handler_fn(add))
                        .option("a", OptionSpec::integer("First term"))
                        .option("b", OptionSpec::integer("Second term").with_default(0)),
                )
                .command(
                    "div",
                    CommandLeaf::new("Divide two numbers.", handler_fn(div))
                        .option("a", OptionSpec::number("Dividend"))
                        .option("b", OptionSpec::number("Divisor").with_default(1)),
                ),
        )
        .command(
            "weather",
            GroupDef::new().command(
                "forecast",
                CommandLeaf::new("Show the forecast for a city.", handler_fn(forecast))
                    .option(
                        "city",
                        OptionSpec::string("City name").with_autocomplete(provider_fn(city_suggestions)),
                    )
                    .option("days", OptionSpec::integer("Number of days").with_default(3))
                    .option("unit", OptionSpec::choice("Temperature unit", &["celsius", "fahrenheit"])),
            ),
        )
        .command(
            "admin",
            GroupDef::new()
                .default_command("status", CommandLeaf::new("Show bot status.", handler_fn(status)))
                .command(
                    "user",
                    GroupDef::new()
                        .command(
                            "info",
                            CommandLeaf::new("Show a user's details.", handler_fn(user_info))
                                .option("target", OptionSpec::user("User to inspect")),
                        )
                        .command(
                            "ban",
                            CommandLeaf::new("Ban a user.", handler_fn(ban))
                                .option("target", OptionSpec::user("User to ban"))
                                .option("reason", OptionSpec::string("Reason")),
                        ),
                ),
        )
}

/// Build the demo registry, including a `/help` that lists every other command.
pub fn build_demo_registry() -> Result<Registry, RegistryError> {
    let listing = demo_commands().build()?.commands();
    demo_commands()
        .command("help", CommandLeaf::new("List available commands.", HelpHandler { commands: listing }))
        .build()
}
