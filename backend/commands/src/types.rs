/// Command tree types.
///
/// Authors describe commands with [`CommandDef`]; the registry normalizes
/// those into [`CommandNode`] trees that dispatch walks at runtime.
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use slashwire_core::{Attachment, InteractionSource, OptionValue, UserRef};

use crate::autocomplete::AutocompleteProvider;
use crate::dispatch::CommandHandler;

// ---------------------------------------------------------------------------
// Option type
// ---------------------------------------------------------------------------

/// Semantic type of a declared option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    #[serde(rename = "string")]
    String,
    #[serde(rename = "int")]
    Integer,
    #[serde(rename = "float")]
    Number,
    #[serde(rename = "bool")]
    Boolean,
    #[serde(rename = "user")]
    User,
    /// A string restricted to a fixed list at presentation time.
    #[serde(rename = "choice")]
    Choice,
    #[serde(rename = "attachment")]
    Attachment,
}

impl OptionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "int",
            Self::Number => "float",
            Self::Boolean => "bool",
            Self::User => "user",
            Self::Choice => "choice",
            Self::Attachment => "attachment",
        }
    }

    /// Whether `value` can be stored in an option of this type.
    pub fn accepts(self, value: &OptionValue) -> bool {
        matches!(
            (self, value),
            (Self::String | Self::Choice, OptionValue::String(_))
                | (Self::Integer, OptionValue::Integer(_))
                | (Self::Number, OptionValue::Number(_))
                | (Self::Boolean, OptionValue::Boolean(_))
                | (Self::User, OptionValue::User(_))
                | (Self::Attachment, OptionValue::Attachment(_))
        )
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Option descriptor
// ---------------------------------------------------------------------------

/// Declared shape of one handler argument.
#[derive(Clone)]
pub struct OptionSpec {
    kind: OptionType,
    description: String,
    default: Option<OptionValue>,
    choices: Vec<String>,
    autocomplete: Option<Arc<dyn AutocompleteProvider>>,
}

impl OptionSpec {
    pub fn new(kind: OptionType, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            default: None,
            choices: Vec::new(),
            autocomplete: None,
        }
    }

    pub fn string(description: impl Into<String>) -> Self {
        Self::new(OptionType::String, description)
    }

    pub fn integer(description: impl Into<String>) -> Self {
        Self::new(OptionType::Integer, description)
    }

    pub fn number(description: impl Into<String>) -> Self {
        Self::new(OptionType::Number, description)
    }

    pub fn boolean(description: impl Into<String>) -> Self {
        Self::new(OptionType::Boolean, description)
    }

    pub fn user(description: impl Into<String>) -> Self {
        Self::new(OptionType::User, description)
    }

    pub fn attachment(description: impl Into<String>) -> Self {
        Self::new(OptionType::Attachment, description)
    }

    pub fn choice(description: impl Into<String>, choices: &[&str]) -> Self {
        Self {
            choices: choices.iter().map(|c| c.to_string()).collect(),
            ..Self::new(OptionType::Choice, description)
        }
    }

    /// Value substituted when the interaction does not carry this option.
    ///
    /// Integers given to a `float` option are widened. Any other mismatch is
    /// rejected when the registry is built.
    pub fn with_default(mut self, value: impl Into<OptionValue>) -> Self {
        let value = match (self.kind, value.into()) {
            (OptionType::Number, OptionValue::Integer(i)) => OptionValue::Number(i as f64),
            (_, other) => other,
        };
        self.default = Some(value);
        self
    }

    pub fn with_autocomplete(mut self, provider: impl AutocompleteProvider + 'static) -> Self {
        self.autocomplete = Some(Arc::new(provider));
        self
    }

    pub fn kind(&self) -> OptionType {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn default_value(&self) -> Option<&OptionValue> {
        self.default.as_ref()
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn autocomplete(&self) -> Option<&Arc<dyn AutocompleteProvider>> {
        self.autocomplete.as_ref()
    }
}

impl fmt::Debug for OptionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionSpec")
            .field("kind", &self.kind)
            .field("default", &self.default)
            .field("choices", &self.choices)
            .field("autocomplete", &self.autocomplete.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Leaf
// ---------------------------------------------------------------------------

/// A command that terminates in a handler.
#[derive(Clone)]
pub struct CommandLeaf {
    description: String,
    handler: Arc<dyn CommandHandler>,
    options: Vec<(String, OptionSpec)>,
}

impl CommandLeaf {
    pub fn new(description: impl Into<String>, handler: impl CommandHandler + 'static) -> Self {
        Self {
            description: description.into(),
            handler: Arc::new(handler),
            options: Vec::new(),
        }
    }

    /// Declare an option. Declaration order is kept.
    pub fn option(mut self, name: impl Into<String>, spec: OptionSpec) -> Self {
        self.options.push((name.into(), spec));
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn handler(&self) -> &Arc<dyn CommandHandler> {
        &self.handler
    }

    pub fn options(&self) -> impl Iterator<Item = (&str, &OptionSpec)> {
        self.options.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn option_spec(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|(n, _)| n == name).map(|(_, spec)| spec)
    }
}

impl fmt::Debug for CommandLeaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandLeaf")
            .field("description", &self.description)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Author-facing definitions
// ---------------------------------------------------------------------------

/// A command as written by its author, before normalization.
#[derive(Debug, Clone)]
pub enum CommandDef {
    Leaf(Arc<CommandLeaf>),
    Group(GroupDef),
}

impl From<CommandLeaf> for CommandDef {
    fn from(leaf: CommandLeaf) -> Self {
        Self::Leaf(Arc::new(leaf))
    }
}

impl From<GroupDef> for CommandDef {
    fn from(group: GroupDef) -> Self {
        Self::Group(group)
    }
}

/// A group of named children.
///
/// Children filed with [`GroupDef::default_command`] go into the group's
/// reserved `default` bucket; normalization merges them with the directly
/// named children, and a direct child wins over a bucket child of the same name.
#[derive(Debug, Clone, Default)]
pub struct GroupDef {
    pub(crate) entries: BTreeMap<String, CommandDef>,
    pub(crate) defaults: BTreeMap<String, CommandDef>,
}

impl GroupDef {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directly named child. Re-adding a name replaces the earlier child.
    pub fn command(mut self, name: impl Into<String>, def: impl Into<CommandDef>) -> Self {
        self.entries.insert(name.into(), def.into());
        self
    }

    /// Add a child to the reserved `default` bucket.
    pub fn default_command(mut self, name: impl Into<String>, def: impl Into<CommandDef>) -> Self {
        self.defaults.insert(name.into(), def.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Canonical tree
// ---------------------------------------------------------------------------

/// A normalized command tree node.
#[derive(Debug, Clone)]
pub enum CommandNode {
    Leaf(Arc<CommandLeaf>),
    Group(BTreeMap<String, CommandNode>),
}

impl CommandNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }

    pub fn as_leaf(&self) -> Option<&Arc<CommandLeaf>> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Group(_) => None,
        }
    }

    /// Look up a child by name. Leaves have no children.
    pub fn child(&self, name: &str) -> Option<&CommandNode> {
        match self {
            Self::Group(children) => children.get(name),
            Self::Leaf(_) => None,
        }
    }
}

/// Leaves compare by identity, groups structurally.
impl PartialEq for CommandNode {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Leaf(a), Self::Leaf(b)) => Arc::ptr_eq(a, b),
            (Self::Group(a), Self::Group(b)) => a == b,
            _ => false,
        }
    }
}

impl From<CommandNode> for CommandDef {
    fn from(node: CommandNode) -> Self {
        match node {
            CommandNode::Leaf(leaf) => Self::Leaf(leaf),
            CommandNode::Group(children) => Self::Group(GroupDef {
                entries: children.into_iter().map(|(name, child)| (name, child.into())).collect(),
                defaults: BTreeMap::new(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Path
// ---------------------------------------------------------------------------

/// The (command, sub-group?, sub-command?) address carried by an interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandPath {
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcommand: Option<String>,
}

impl CommandPath {
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into(), group: None, subcommand: None }
    }

    /// An empty name leaves the part absent.
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = present(group.into());
        self
    }

    /// An empty name leaves the part absent.
    pub fn subcommand(mut self, subcommand: impl Into<String>) -> Self {
        self.subcommand = present(subcommand.into());
        self
    }

    /// Read the address from an interaction; empty parts count as absent.
    pub fn from_source<S: InteractionSource + ?Sized>(source: &S) -> Self {
        Self {
            command: source.command_name().to_string(),
            group: source.subcommand_group().map(str::to_string).and_then(present),
            subcommand: source.subcommand().map(str::to_string).and_then(present),
        }
    }
}

fn present(part: String) -> Option<String> {
    (!part.is_empty()).then_some(part)
}

/// Present parts joined by single spaces, e.g. `admin user ban`.
impl fmt::Display for CommandPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command)?;
        for part in [&self.group, &self.subcommand].into_iter().flatten().filter(|p| !p.is_empty()) {
            write!(f, " {part}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

/// Coerced arguments for one dispatch.
///
/// Every declared option has an entry; `None` means the option was neither
/// supplied nor defaulted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: HashMap<String, Option<OptionValue>>,
}

impl Arguments {
    pub(crate) fn insert(&mut self, name: &str, value: Option<OptionValue>) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)?.as_ref()
    }

    /// Whether `name` is a declared option of the dispatched command.
    pub fn is_declared(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            OptionValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            OptionValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            OptionValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            OptionValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn user(&self, name: &str) -> Option<&UserRef> {
        match self.get(name)? {
            OptionValue::User(user) => Some(user),
            _ => None,
        }
    }

    pub fn attachment(&self, name: &str) -> Option<&Attachment> {
        match self.get(name)? {
            OptionValue::Attachment(attachment) => Some(attachment),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&OptionValue>)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value.as_ref()))
    }
}
