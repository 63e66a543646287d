//! Command routing for structured slash-command interactions.
//!
//! Authors describe commands as [`CommandDef`] trees; [`Registry`] normalizes
//! them once at startup, and [`Router`] resolves each incoming interaction to
//! its leaf, coerces arguments, runs the handler and reports the outcome.

pub mod autocomplete;
pub mod coerce;
pub mod dispatch;
pub mod handlers;
pub mod registry;
pub mod router;
pub mod types;

pub use autocomplete::{
    dispatch_autocomplete, provider_fn, AutocompleteOutcome, AutocompleteProvider, ProviderFn, Suggestions,
};
pub use coerce::coerce;
pub use dispatch::{dispatch_command, handler_fn, CommandHandler, CommandOutcome, HandlerFn, RouterSettings};
pub use handlers::{build_demo_registry, HelpHandler};
pub use registry::{normalize, CommandSummary, Registry, RegistryBuilder, RegistryError, DEFAULT_BUCKET};
pub use router::{Interaction, Outcome, Router};
pub use types::{
    Arguments, CommandDef, CommandLeaf, CommandNode, CommandPath, GroupDef, OptionSpec, OptionType,
};
