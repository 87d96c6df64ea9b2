//! Error taxonomy shared by the catalog, engines and score store.

use thiserror::Error;

/// Errors surfaced by the game core.
///
/// Catalog errors end a session before it starts. Asset errors are local to
/// one image. Score errors are warnings: gameplay results are never rolled
/// back because a save failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    /// The catalog store could not be reached or refused access.
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// No matching firm, game, or playable content.
    #[error("No active content: {0}")]
    CatalogEmpty(String),

    /// An image resource failed to load.
    #[error("Image {image} failed to load: {reason}")]
    AssetLoadFailed { image: usize, reason: String },

    /// Existing scores could not be fetched.
    #[error("Score lookup failed: {0}")]
    ScoreLookupFailed(String),

    /// A score could not be created or deleted.
    #[error("Score write failed: {0}")]
    ScoreWriteFailed(String),

    /// Malformed catalog data (bad quiz index, empty card content, ...).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Player or firm identity rejected at login.
    #[error("Invalid player: {0}")]
    InvalidPlayer(String),

    /// The session driver has stopped and no longer accepts input.
    #[error("Session closed")]
    SessionClosed,
}

impl GameError {
    /// Errors that leave the session in the "no content" state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GameError::CatalogUnavailable(_) | GameError::CatalogEmpty(_) | GameError::InvalidInput(_)
        )
    }

    /// Errors from the score store.
    #[must_use]
    pub fn is_persistence(&self) -> bool {
        matches!(self, GameError::ScoreLookupFailed(_) | GameError::ScoreWriteFailed(_))
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
