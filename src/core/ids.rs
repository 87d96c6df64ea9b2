//! Identifiers for players, firms, zones, pairs and cards.
//!
//! Player and firm names arrive as free text from the login surface, so
//! they are trimmed on construction and score keys always use the trimmed
//! form.

use serde::{Deserialize, Serialize};

use super::error::{GameError, Result};

/// Minimum player id length after trimming.
pub const MIN_PLAYER_ID_LEN: usize = 3;

/// Player identifier (trimmed, at least `MIN_PLAYER_ID_LEN` characters).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(String);

impl PlayerId {
    /// Validate and normalize a raw player id.
    ///
    /// ```
    /// use firm_games::core::PlayerId;
    ///
    /// let id = PlayerId::parse("  team-42 ").unwrap();
    /// assert_eq!(id.as_str(), "team-42");
    /// assert!(PlayerId::parse(" ab ").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.chars().count() < MIN_PLAYER_ID_LEN {
            return Err(GameError::InvalidPlayer(format!(
                "player id '{trimmed}' is shorter than {MIN_PLAYER_ID_LEN} characters"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Firm name as used in score keys (trimmed, non-empty).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FirmName(String);

impl FirmName {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(GameError::InvalidPlayer("firm name is empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased form used for case-insensitive comparisons.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

impl std::fmt::Display for FirmName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hazard zone identifier, unique within its image.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZoneId(pub String);

impl ZoneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Zone({})", self.0)
    }
}

/// Index of a symbol/meaning pair in the catalog list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairId(pub u32);

impl PairId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PairId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Pair({})", self.0)
    }
}

/// Card identifier, assigned before the deck is shuffled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}
