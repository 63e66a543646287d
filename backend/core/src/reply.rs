//! Reply payloads sent back through an interaction's reply channel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Colour of error notices (the platform's standard red).
pub const ERROR_COLOR: u32 = 15548997;

/// A titled, coloured, timestamped rich message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub timestamp: DateTime<Utc>,
}

impl Embed {
    /// Build an error card stamped with the current time.
    pub fn error(title: impl Into<String>, description: impl Into<String>, color: u32) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            color,
            timestamp: Utc::now(),
        }
    }
}

/// A response to a command interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reply {
    Text { content: String, ephemeral: bool },
    Embed { embed: Embed, ephemeral: bool },
}

impl Reply {
    /// A public plain-text reply.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text { content: content.into(), ephemeral: false }
    }

    /// A plain-text reply only the invoking user can see.
    pub fn ephemeral_text(content: impl Into<String>) -> Self {
        Self::Text { content: content.into(), ephemeral: true }
    }

    /// An embed only the invoking user can see.
    pub fn ephemeral_embed(embed: Embed) -> Self {
        Self::Embed { embed, ephemeral: true }
    }

    pub fn is_ephemeral(&self) -> bool {
        match self {
            Self::Text { ephemeral, .. } | Self::Embed { ephemeral, .. } => *ephemeral,
        }
    }

    /// The visible body: the text content, or the embed description.
    pub fn body(&self) -> &str {
        match self {
            Self::Text { content, .. } => content,
            Self::Embed { embed, .. } => &embed.description,
        }
    }
}

/// One autocomplete suggestion: what the user sees and what gets submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub name: String,
    pub value: String,
}

impl Choice {
    /// A suggestion whose label and value are the same string.
    pub fn same(text: impl Into<String>) -> Self {
        let text = text.into();
        Self { name: text.clone(), value: text }
    }
}

/// The option being edited in an autocomplete request, with its partial input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusedOption {
    pub name: String,
    pub value: String,
}
