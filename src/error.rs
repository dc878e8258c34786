//! Error kinds surfaced by the round engine.
//!
//! Every failure is recoverable: the caller shows a message and the game state
//! is left exactly as it was before the call.

use thiserror::Error;

use crate::round::Channel;

/// Failures of channel submission and image assignment.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("input is locked while a channel sequence is running")]
    InputLocked,
    #[error("channel number must be between 1 and 999")]
    InvalidRange,
    #[error("channel {0} has already been selected")]
    ChannelAlreadyUsed(Channel),
    #[error("every channel image has already been used")]
    NoImagesRemaining,
    #[error("no game is in progress")]
    GameNotActive,
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Player name validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("please enter a name")]
    EmptyName,
    #[error("only Hangul, ASCII letters and digits are allowed")]
    InvalidCharacters,
    #[error("name length {len} must be between {min} and {max}")]
    LengthOutOfRange { len: usize, min: usize, max: usize },
}

/// Failures of `confirm_turn`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnError {
    #[error(transparent)]
    Name(#[from] NameError),
    #[error("please select a channel first")]
    NoChannelSelected,
    #[error("the scan is still running")]
    ScanPending,
    #[error("no game is in progress")]
    GameNotActive,
}

/// A scan was started while another one was still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("a scan is already running")]
pub struct ScanInProgress;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("image '{0}' not found in catalog")]
    NotFound(String),
    #[error("image '{0}' appears more than once in catalog")]
    DuplicateImage(String),
    #[error("cat marker {index} of image '{image}' is outside the unit square")]
    MarkerOutOfRange { image: String, index: usize },
    #[error("failed to parse cat position data: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("player count {count} is outside 1..={max}")]
    InvalidPlayerCount { count: usize, max: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse game config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid game config: {0}")]
    Invalid(&'static str),
}
