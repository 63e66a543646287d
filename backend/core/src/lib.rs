pub mod error;
pub mod interaction;
pub mod memory;
pub mod reply;
pub mod value;

pub use error::CommandError;
pub use interaction::{AutocompleteInteraction, CommandInteraction, InteractionSource, OptionSource};
pub use memory::MemoryInteraction;
pub use reply::{Choice, Embed, FocusedOption, Reply, ERROR_COLOR};
pub use value::{Attachment, OptionValue, UserRef};
