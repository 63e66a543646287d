/// Command registry: normalizes author definitions into one canonical tree
/// and resolves interaction paths against it.
use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use thiserror::Error;
use tracing::{debug, info};

use crate::types::{CommandDef, CommandLeaf, CommandNode, CommandPath, GroupDef, OptionType};

/// Name of the bucket holding a group's unnamed-default children.
pub const DEFAULT_BUCKET: &str = "default";

/// Deepest level a group may sit at: top-level command (0) or sub-group (1).
const MAX_GROUP_DEPTH: usize = 1;

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-_\p{Ll}\p{Lo}\p{N}]{1,32}$").unwrap());

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A malformed command definition, reported when the registry is built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("command '{0}' is registered twice")]
    DuplicateCommand(String),

    #[error("invalid command name '{name}' under '{parent}'")]
    InvalidName { parent: String, name: String },

    #[error("'{parent}' names a child 'default', which is reserved for the default bucket")]
    ReservedName { parent: String },

    #[error("group '{path}' has no commands")]
    EmptyGroup { path: String },

    #[error("group '{path}' is nested deeper than a sub-command group")]
    TooDeep { path: String },

    #[error("invalid option name '{option}' on '{path}'")]
    InvalidOptionName { path: String, option: String },

    #[error("option '{option}' is declared twice on '{path}'")]
    DuplicateOption { path: String, option: String },

    #[error("default for option '{option}' on '{path}' is a {found}, expected {expected}")]
    DefaultTypeMismatch {
        path: String,
        option: String,
        expected: OptionType,
        found: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Normalize one top-level definition into its canonical tree.
///
/// Default-bucket children are merged into the group's direct children; a
/// direct child shadows a bucket child with the same name. Normalizing the
/// result again (via `CommandDef::from`) yields an equal tree.
pub fn normalize(name: &str, def: CommandDef) -> Result<CommandNode, RegistryError> {
    normalize_at(name.to_string(), def, 0)
}

fn normalize_at(path: String, def: CommandDef, depth: usize) -> Result<CommandNode, RegistryError> {
    match def {
        CommandDef::Leaf(leaf) => {
            validate_leaf(&path, &leaf)?;
            Ok(CommandNode::Leaf(leaf))
        }
        CommandDef::Group(group) => {
            if depth > MAX_GROUP_DEPTH {
                return Err(RegistryError::TooDeep { path });
            }
            let merged = merge_default_bucket(&path, group)?;
            if merged.is_empty() {
                return Err(RegistryError::EmptyGroup { path });
            }
            let mut children = BTreeMap::new();
            for (name, child) in merged {
                validate_name(&path, &name)?;
                let node = normalize_at(format!("{path} {name}"), child, depth + 1)?;
                children.insert(name, node);
            }
            Ok(CommandNode::Group(children))
        }
    }
}

/// Bucket entries first, then direct entries on top so they win collisions.
fn merge_default_bucket(path: &str, group: GroupDef) -> Result<BTreeMap<String, CommandDef>, RegistryError> {
    if group.entries.contains_key(DEFAULT_BUCKET) || group.defaults.contains_key(DEFAULT_BUCKET) {
        return Err(RegistryError::ReservedName { parent: path.to_string() });
    }
    let mut merged = group.defaults;
    for (name, def) in group.entries {
        if merged.contains_key(&name) {
            debug!(group = %path, child = %name, "Direct entry shadows default-bucket entry");
        }
        merged.insert(name, def);
    }
    Ok(merged)
}

fn validate_name(parent: &str, name: &str) -> Result<(), RegistryError> {
    if NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(RegistryError::InvalidName { parent: parent.to_string(), name: name.to_string() })
    }
}

fn validate_leaf(path: &str, leaf: &CommandLeaf) -> Result<(), RegistryError> {
    let mut seen: Vec<&str> = Vec::new();
    for (option, spec) in leaf.options() {
        if !NAME_RE.is_match(option) {
            return Err(RegistryError::InvalidOptionName { path: path.to_string(), option: option.to_string() });
        }
        if seen.contains(&option) {
            return Err(RegistryError::DuplicateOption { path: path.to_string(), option: option.to_string() });
        }
        seen.push(option);

        if let Some(default) = spec.default_value() {
            if !spec.kind().accepts(default) {
                return Err(RegistryError::DefaultTypeMismatch {
                    path: path.to_string(),
                    option: option.to_string(),
                    expected: spec.kind(),
                    found: default.kind_name(),
                });
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// One entry of the flattened command listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSummary {
    /// Space-separated path, e.g. `admin user ban`.
    pub path: String,
    pub description: String,
}

/// The canonical, read-only command tree.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    commands: BTreeMap<String, CommandNode>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&CommandNode> {
        self.commands.get(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Find the leaf addressed by `path`.
    ///
    /// Any mismatch between the path and the tree's shape is `None`; an
    /// unknown command is not an error since other routers may own it.
    pub fn resolve(&self, path: &CommandPath) -> Option<&Arc<CommandLeaf>> {
        let top = self.commands.get(&path.command)?;
        let group = path.group.as_deref().filter(|g| !g.is_empty());
        let subcommand = path.subcommand.as_deref().filter(|s| !s.is_empty());
        let node = match (group, subcommand) {
            (Some(group), Some(sub)) => {
                let group = top.child(group)?;
                if !group.is_group() {
                    return None;
                }
                group.child(sub)?
            }
            (Some(_), None) => return None,
            (None, Some(sub)) => top.child(sub)?,
            (None, None) => top,
        };
        node.as_leaf()
    }

    /// Every leaf with its full path, sorted by path.
    pub fn commands(&self) -> Vec<CommandSummary> {
        let mut out = Vec::new();
        for (name, node) in &self.commands {
            collect_leaves(name, node, &mut out);
        }
        out
    }
}

fn collect_leaves(path: &str, node: &CommandNode, out: &mut Vec<CommandSummary>) {
    match node {
        CommandNode::Leaf(leaf) => out.push(CommandSummary {
            path: path.to_string(),
            description: leaf.description().to_string(),
        }),
        CommandNode::Group(children) => {
            for (name, child) in children {
                collect_leaves(&format!("{path} {name}"), child, out);
            }
        }
    }
}

/// Collects top-level definitions and normalizes them in one pass.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    commands: Vec<(String, CommandDef)>,
}

impl RegistryBuilder {
    pub fn command(mut self, name: impl Into<String>, def: impl Into<CommandDef>) -> Self {
        self.commands.push((name.into(), def.into()));
        self
    }

    pub fn build(self) -> Result<Registry, RegistryError> {
        let mut commands = BTreeMap::new();
        for (name, def) in self.commands {
            validate_name("", &name)?;
            if commands.contains_key(&name) {
                return Err(RegistryError::DuplicateCommand(name));
            }
            let node = normalize(&name, def)?;
            commands.insert(name, node);
        }
        info!(commands = commands.len(), "Command registry built");
        Ok(Registry { commands })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use slashwire_core::{CommandError, CommandInteraction};

    use crate::dispatch::handler_fn;
    use crate::types::{Arguments, OptionSpec};

    async fn noop(_ctx: Arc<dyn CommandInteraction>, _args: Arguments) -> Result<(), CommandError> {
        Ok(())
    }

    fn leaf(description: &str) -> CommandLeaf {
        CommandLeaf::new(description, handler_fn(noop))
    }

    fn assert_classified(node: &CommandNode) {
        assert_ne!(node.is_leaf(), node.is_group());
        if let CommandNode::Group(children) = node {
            children.values().for_each(assert_classified);
        }
    }

    #[test]
    fn every_node_is_exactly_leaf_or_group() {
        let registry = Registry::builder()
            .command("ping", leaf("Ping"))
            .command(
                "admin",
                GroupDef::new()
                    .command("status", leaf("Status"))
                    .command("user", GroupDef::new().command("ban", leaf("Ban")).command("info", leaf("Info"))),
            )
            .build()
            .unwrap();

        for name in ["ping", "admin"] {
            assert_classified(registry.get(name).unwrap());
        }
    }

    #[test]
    fn direct_entry_wins_over_default_bucket() {
        let bucket = Arc::new(leaf("from bucket"));
        let direct = Arc::new(leaf("direct"));
        let node = normalize(
            "cfg",
            GroupDef::new()
                .default_command("show", CommandDef::Leaf(Arc::clone(&bucket)))
                .default_command("reset", leaf("only in bucket"))
                .command("show", CommandDef::Leaf(Arc::clone(&direct)))
                .into(),
        )
        .unwrap();

        let shown = node.child("show").and_then(CommandNode::as_leaf).unwrap();
        assert!(Arc::ptr_eq(shown, &direct));
        assert_eq!(
            node.child("reset").and_then(CommandNode::as_leaf).unwrap().description(),
            "only in bucket"
        );
    }

    #[test]
    fn normalizing_twice_is_a_no_op() {
        let def: CommandDef = GroupDef::new()
            .default_command("list", leaf("List"))
            .command("user", GroupDef::new().default_command("ban", leaf("Ban")).command("info", leaf("Info")))
            .into();

        let once = normalize("admin", def).unwrap();
        let twice = normalize("admin", CommandDef::from(once.clone())).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn resolves_two_level_paths_and_misses_silently() {
        let registry = Registry::builder()
            .command("a", GroupDef::new().command("b", GroupDef::new().command("c", leaf("C"))))
            .build()
            .unwrap();

        let hit = registry.resolve(&CommandPath::new("a").group("b").subcommand("c"));
        assert_eq!(hit.map(|l| l.description()), Some("C"));

        assert!(registry.resolve(&CommandPath::new("a").group("b").subcommand("x")).is_none());
        assert!(registry.resolve(&CommandPath::new("a").group("x").subcommand("c")).is_none());
        assert!(registry.resolve(&CommandPath::new("x").group("b").subcommand("c")).is_none());
        assert!(registry.resolve(&CommandPath::new("x")).is_none());
    }

    #[test]
    fn resolution_rejects_shape_mismatches() {
        let registry = Registry::builder()
            .command("ping", leaf("Ping"))
            .command("math", GroupDef::new().command("add", leaf("Add")))
            .build()
            .unwrap();

        // Group addressed as a leaf, leaf addressed as a group.
        assert!(registry.resolve(&CommandPath::new("math")).is_none());
        assert!(registry.resolve(&CommandPath::new("ping").subcommand("add")).is_none());
        // A leaf used as a sub-group.
        assert!(registry.resolve(&CommandPath::new("math").group("add").subcommand("add")).is_none());
        // Sub-group with no sub-command.
        assert!(registry.resolve(&CommandPath::new("math").group("add")).is_none());

        assert!(registry.resolve(&CommandPath::new("ping")).is_some());
        assert!(registry.resolve(&CommandPath::new("math").subcommand("add")).is_some());
    }

    #[test]
    fn empty_path_parts_are_ignored() {
        let registry = Registry::builder()
            .command("ping", leaf("Ping"))
            .command("math", GroupDef::new().command("add", leaf("Add")))
            .build()
            .unwrap();

        let raw = |command: &str, group: Option<&str>, subcommand: Option<&str>| CommandPath {
            command: command.into(),
            group: group.map(str::to_string),
            subcommand: subcommand.map(str::to_string),
        };
        let add = registry.resolve(&raw("math", Some(""), Some("add"))).unwrap();
        assert_eq!(add.description(), "Add");
        let ping = registry.resolve(&raw("ping", None, Some(""))).unwrap();
        assert_eq!(ping.description(), "Ping");
        assert!(registry.resolve(&raw("math", Some(""), Some(""))).is_none());
    }

    #[test]
    fn rejects_groups_below_sub_groups() {
        let err = Registry::builder()
            .command(
                "a",
                GroupDef::new().command("b", GroupDef::new().command("c", GroupDef::new().command("d", leaf("D")))),
            )
            .build()
            .unwrap_err();
        assert_eq!(err, RegistryError::TooDeep { path: "a b c".into() });
    }

    #[test]
    fn rejects_malformed_definitions() {
        let empty = Registry::builder().command("a", GroupDef::new()).build().unwrap_err();
        assert_eq!(empty, RegistryError::EmptyGroup { path: "a".into() });

        let reserved = Registry::builder()
            .command("a", GroupDef::new().command("default", leaf("D")))
            .build()
            .unwrap_err();
        assert_eq!(reserved, RegistryError::ReservedName { parent: "a".into() });

        let reserved_in_bucket = Registry::builder()
            .command("a", GroupDef::new().default_command("default", leaf("D")).command("b", leaf("B")))
            .build()
            .unwrap_err();
        assert_eq!(reserved_in_bucket, RegistryError::ReservedName { parent: "a".into() });

        let bad_name = Registry::builder().command("Ping", leaf("P")).build().unwrap_err();
        assert!(matches!(bad_name, RegistryError::InvalidName { .. }));

        let dup = Registry::builder()
            .command("ping", leaf("P"))
            .command("ping", leaf("P again"))
            .build()
            .unwrap_err();
        assert_eq!(dup, RegistryError::DuplicateCommand("ping".into()));
    }

    #[test]
    fn rejects_bad_options() {
        let dup = Registry::builder()
            .command(
                "echo",
                leaf("Echo").option("text", OptionSpec::string("A")).option("text", OptionSpec::string("B")),
            )
            .build()
            .unwrap_err();
        assert_eq!(dup, RegistryError::DuplicateOption { path: "echo".into(), option: "text".into() });

        let mismatch = Registry::builder()
            .command("echo", leaf("Echo").option("times", OptionSpec::integer("Times").with_default("five")))
            .build()
            .unwrap_err();
        assert_eq!(
            mismatch,
            RegistryError::DefaultTypeMismatch {
                path: "echo".into(),
                option: "times".into(),
                expected: OptionType::Integer,
                found: "string",
            }
        );
    }

    #[test]
    fn lists_leaves_with_full_paths() {
        let registry = Registry::builder()
            .command("ping", leaf("Ping"))
            .command(
                "admin",
                GroupDef::new()
                    .default_command("status", leaf("Status"))
                    .command("user", GroupDef::new().command("ban", leaf("Ban"))),
            )
            .build()
            .unwrap();

        let paths: Vec<String> = registry.commands().into_iter().map(|c| c.path).collect();
        assert_eq!(paths, vec!["admin status", "admin user ban", "ping"]);
    }
}
