//! The event-source side of the router.
//!
//! A transport adapter implements these traits for its own interaction types;
//! the router never sees the wire format.

use anyhow::Result;
use async_trait::async_trait;

use crate::reply::{Choice, FocusedOption, Reply};
use crate::value::{Attachment, UserRef};

/// Identity and command path of an incoming interaction.
pub trait InteractionSource: Send + Sync {
    /// Transport-assigned identifier, used to correlate log lines.
    fn id(&self) -> &str;

    fn command_name(&self) -> &str;

    fn subcommand_group(&self) -> Option<&str>;

    fn subcommand(&self) -> Option<&str>;
}

/// Typed accessors for the raw option values of a command interaction.
///
/// Each accessor returns `None` when the option is absent or holds a value of another type.
pub trait OptionSource: Send + Sync {
    fn get_string(&self, name: &str) -> Option<String>;
    fn get_integer(&self, name: &str) -> Option<i64>;
    fn get_number(&self, name: &str) -> Option<f64>;
    fn get_boolean(&self, name: &str) -> Option<bool>;
    fn get_user(&self, name: &str) -> Option<UserRef>;
    fn get_attachment(&self, name: &str) -> Option<Attachment>;
}

/// A command invocation plus its reply channel.
#[async_trait]
pub trait CommandInteraction: InteractionSource + OptionSource {
    /// Whether a reply has already been sent for this interaction.
    fn replied(&self) -> bool;

    async fn reply(&self, reply: Reply) -> Result<()>;
}

/// An autocomplete request plus its suggestion channel.
#[async_trait]
pub trait AutocompleteInteraction: InteractionSource {
    fn focused(&self) -> FocusedOption;

    async fn respond(&self, choices: Vec<Choice>) -> Result<()>;
}
