//! Error types for storyplayer

use crate::model::PlayerState;

/// Errors surfaced to the caller. Construction validation and state-guard
/// violations propagate synchronously; environmental failures (fullscreen)
/// are absorbed by the player and only logged.
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    #[error("{reason} at index {index}")]
    Validation { index: usize, reason: String },

    #[error("descriptor list must not be empty")]
    EmptyPlaylist,

    #[error("invalid descriptor list: {0}")]
    Descriptors(#[from] serde_json::Error),

    #[error("order cannot be set when player is {0}")]
    OrderLocked(PlayerState),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlayerError {
    pub(crate) fn validation(index: usize, reason: impl Into<String>) -> Self {
        PlayerError::Validation {
            index,
            reason: reason.into(),
        }
    }
}

/// Specialized Result type for storyplayer.
pub type Result<T> = std::result::Result<T, PlayerError>;
