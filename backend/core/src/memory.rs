//! In-memory interaction used by the replay CLI and by tests.
//!
//! Options are held as JSON values and converted on access, the same way a
//! transport adapter would read them off a decoded payload.

use std::sync::{Mutex, PoisonError};

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::interaction::{AutocompleteInteraction, CommandInteraction, InteractionSource, OptionSource};
use crate::reply::{Choice, FocusedOption, Reply};
use crate::value::{Attachment, UserRef};

#[derive(Debug)]
pub struct MemoryInteraction {
    id: String,
    command: String,
    group: Option<String>,
    subcommand: Option<String>,
    options: Map<String, Value>,
    focused: FocusedOption,
    fail_delivery: bool,
    replies: Mutex<Vec<Reply>>,
    choices: Mutex<Option<Vec<Choice>>>,
}

impl MemoryInteraction {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            command: command.into(),
            group: None,
            subcommand: None,
            options: Map::new(),
            focused: FocusedOption { name: String::new(), value: String::new() },
            fail_delivery: false,
            replies: Mutex::new(Vec::new()),
            choices: Mutex::new(None),
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_subcommand(mut self, subcommand: impl Into<String>) -> Self {
        self.subcommand = Some(subcommand.into());
        self
    }

    pub fn option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    /// Mark `name` as the option being edited, with `value` as its partial input.
    pub fn with_focus(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.focused = FocusedOption { name: name.into(), value: value.into() };
        self
    }

    /// Make every reply and autocomplete response fail to deliver.
    pub fn failing_delivery(mut self) -> Self {
        self.fail_delivery = true;
        self
    }

    /// Replies delivered so far, in order.
    pub fn replies(&self) -> Vec<Reply> {
        self.replies.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// The suggestion list delivered for an autocomplete request, if any.
    pub fn choices(&self) -> Option<Vec<Choice>> {
        self.choices.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn raw(&self, name: &str) -> Option<&Value> {
        self.options.get(name).filter(|v| !v.is_null())
    }
}

impl InteractionSource for MemoryInteraction {
    fn id(&self) -> &str {
        &self.id
    }

    fn command_name(&self) -> &str {
        &self.command
    }

    fn subcommand_group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    fn subcommand(&self) -> Option<&str> {
        self.subcommand.as_deref()
    }
}

impl OptionSource for MemoryInteraction {
    fn get_string(&self, name: &str) -> Option<String> {
        self.raw(name)?.as_str().map(str::to_string)
    }

    fn get_integer(&self, name: &str) -> Option<i64> {
        self.raw(name)?.as_i64()
    }

    fn get_number(&self, name: &str) -> Option<f64> {
        self.raw(name)?.as_f64()
    }

    fn get_boolean(&self, name: &str) -> Option<bool> {
        self.raw(name)?.as_bool()
    }

    fn get_user(&self, name: &str) -> Option<UserRef> {
        serde_json::from_value(self.raw(name)?.clone()).ok()
    }

    fn get_attachment(&self, name: &str) -> Option<Attachment> {
        serde_json::from_value(self.raw(name)?.clone()).ok()
    }
}

#[async_trait]
impl CommandInteraction for MemoryInteraction {
    fn replied(&self) -> bool {
        !self.replies.lock().unwrap_or_else(PoisonError::into_inner).is_empty()
    }

    async fn reply(&self, reply: Reply) -> Result<()> {
        if self.fail_delivery {
            bail!("reply channel closed for interaction {}", self.id);
        }
        debug!(interaction = %self.id, ephemeral = reply.is_ephemeral(), "Reply recorded");
        self.replies.lock().unwrap_or_else(PoisonError::into_inner).push(reply);
        Ok(())
    }
}

#[async_trait]
impl AutocompleteInteraction for MemoryInteraction {
    fn focused(&self) -> FocusedOption {
        self.focused.clone()
    }

    async fn respond(&self, choices: Vec<Choice>) -> Result<()> {
        if self.fail_delivery {
            bail!("autocomplete channel closed for interaction {}", self.id);
        }
        let mut slot = self.choices.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            bail!("interaction {} already responded", self.id);
        }
        *slot = Some(choices);
        Ok(())
    }
}
