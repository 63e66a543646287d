use thiserror::Error;

/// Failure signalled by a command handler.
///
/// Whether the invoking user sees anything depends on [`CommandError::user_message`]:
/// failures that carry a message are reported privately, `Silent` ones are only logged.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A failure with a message meant for the invoking user.
    #[error("{0}")]
    Failed(String),

    /// An unexpected failure bubbling up from the handler's collaborators.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),

    /// A failure with nothing to tell the user.
    #[error("command failed without a message")]
    Silent,
}

impl CommandError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// The message to show the invoking user, if this failure has one.
    ///
    /// Blank messages count as no message.
    pub fn user_message(&self) -> Option<String> {
        let message = match self {
            Self::Silent => return None,
            other => other.to_string(),
        };
        if message.trim().is_empty() {
            None
        } else {
            Some(message)
        }
    }
}
