//! Replay scripts: a YAML list of interactions to feed through the router.
//!
//! ```yaml
//! interactions:
//!   - command: math
//!     subcommand: add
//!     options: { a: 2, b: 3 }
//!   - kind: autocomplete
//!     command: weather
//!     subcommand: forecast
//!     focused: { name: city, value: Pa }
//! ```

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use slashwire_commands::Interaction;
use slashwire_core::{Choice, MemoryInteraction, Reply};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptKind {
    #[default]
    Command,
    Autocomplete,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScriptFocus {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// One scripted interaction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptEntry {
    #[serde(default)]
    pub kind: ScriptKind,
    pub command: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub subcommand: Option<String>,
    #[serde(default)]
    pub options: Map<String, Value>,
    #[serde(default)]
    pub focused: Option<ScriptFocus>,
    /// Make every reply attempt fail, as a broken transport would.
    #[serde(default)]
    pub fail_delivery: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    pub interactions: Vec<ScriptEntry>,
}

impl Script {
    pub fn parse(raw: &str) -> Result<Self> {
        let script: Script = serde_yaml::from_str(raw).context("Failed to parse replay script")?;
        for (index, entry) in script.interactions.iter().enumerate() {
            if entry.kind == ScriptKind::Autocomplete && entry.focused.is_none() {
                anyhow::bail!("Interaction #{index} is an autocomplete without a `focused` option");
            }
        }
        Ok(script)
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read replay script: {}", path.display()))?;
        Self::parse(&raw)
    }
}

impl ScriptEntry {
    /// Build the in-memory interaction, returning the routed handle and the recorder.
    pub fn to_interaction(&self) -> (Interaction, Arc<MemoryInteraction>) {
        let mut memory = MemoryInteraction::new(&self.command);
        if let Some(group) = &self.group {
            memory = memory.with_group(group);
        }
        if let Some(subcommand) = &self.subcommand {
            memory = memory.with_subcommand(subcommand);
        }
        for (name, value) in &self.options {
            memory = memory.option(name, value.clone());
        }
        if let Some(focus) = &self.focused {
            memory = memory.with_focus(&focus.name, &focus.value);
        }
        if self.fail_delivery {
            memory = memory.failing_delivery();
        }

        let memory = Arc::new(memory);
        let interaction = match self.kind {
            ScriptKind::Command => Interaction::Command(memory.clone()),
            ScriptKind::Autocomplete => Interaction::Autocomplete(memory.clone()),
        };
        (interaction, memory)
    }
}

/// What one scripted interaction produced, printed as a JSON line.
#[derive(Debug, Serialize)]
pub struct Transcript {
    pub index: usize,
    pub kind: ScriptKind,
    pub command: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<Reply>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Choice>>,
}
