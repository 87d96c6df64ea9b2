//! Catalog data as the engines consume it.
//!
//! Firms carry a list of game entries. Hazard entries hold raw image assets
//! (as stored by the admin tooling); `GameEntry::image_targets` normalizes
//! them into `ImageTarget`s, filling in missing zone ids and deciding which
//! zones carry a quiz. Card-matching entries hold `Pair`s directly.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::core::{GameError, Result, ZoneId};
use crate::games::hazard::PercentRect;

/// Number of options in every quiz.
pub const QUIZ_OPTION_COUNT: usize = 4;

/// Which engine a catalog entry drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    /// Spot hidden zones in images.
    Hazard,
    /// Flip symbol/meaning card pairs.
    Matching,
}

impl GameKind {
    /// All kinds, in the order a game hub lists them.
    pub const ALL: [GameKind; 2] = [GameKind::Hazard, GameKind::Matching];

    /// Name used for the entry in the catalog and in score records.
    #[must_use]
    pub const fn catalog_name(self) -> &'static str {
        match self {
            GameKind::Hazard => "Tehlike Avı",
            GameKind::Matching => "Kart Eşleştirme",
        }
    }

    /// Resolve a catalog entry name. English names are accepted too.
    #[must_use]
    pub fn from_catalog_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name == GameKind::Hazard.catalog_name() || name.eq_ignore_ascii_case("hazard hunt") {
            Some(GameKind::Hazard)
        } else if name == GameKind::Matching.catalog_name() || name.eq_ignore_ascii_case("card matching") {
            Some(GameKind::Matching)
        } else {
            None
        }
    }
}

impl std::fmt::Display for GameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.catalog_name())
    }
}

/// Publication status of a game entry. Only `Active` is playable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GameStatus {
    Active,
    Pending,
    #[default]
    Inactive,
}

impl GameStatus {
    /// Parse a status label; unknown labels are treated as inactive.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "aktif" | "active" => GameStatus::Active,
            "beklemede" | "pending" => GameStatus::Pending,
            _ => GameStatus::Inactive,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            GameStatus::Active => "Aktif",
            GameStatus::Pending => "Beklemede",
            GameStatus::Inactive => "Pasif",
        }
    }

    #[must_use]
    pub fn is_playable(self) -> bool {
        self == GameStatus::Active
    }
}

impl From<String> for GameStatus {
    fn from(label: String) -> Self {
        GameStatus::from_label(&label)
    }
}

impl From<GameStatus> for String {
    fn from(status: GameStatus) -> Self {
        status.label().to_string()
    }
}

/// Four-option knowledge check attached to a zone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizChallenge {
    options: [String; QUIZ_OPTION_COUNT],
    correct: usize,
}

impl QuizChallenge {
    pub fn new(options: [String; QUIZ_OPTION_COUNT], correct: usize) -> Result<Self> {
        if correct >= QUIZ_OPTION_COUNT {
            return Err(GameError::InvalidInput(format!(
                "quiz correct index {correct} is out of range"
            )));
        }
        Ok(Self { options, correct })
    }

    /// Build from stored data.
    ///
    /// Only exactly four options with a non-empty first option make a quiz;
    /// anything else means the zone has none (`Ok(None)`). A missing correct
    /// index defaults to the first option.
    pub fn from_stored(options: &[String], correct: Option<usize>) -> Result<Option<Self>> {
        if options.len() != QUIZ_OPTION_COUNT || options[0].trim().is_empty() {
            return Ok(None);
        }
        let options = [
            options[0].clone(),
            options[1].clone(),
            options[2].clone(),
            options[3].clone(),
        ];
        Self::new(options, correct.unwrap_or(0)).map(Some)
    }

    #[must_use]
    pub fn options(&self) -> &[String; QUIZ_OPTION_COUNT] {
        &self.options
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn correct_text(&self) -> &str {
        &self.options[self.correct]
    }
}

/// A region of interest within an image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HazardZone {
    pub id: ZoneId,
    pub rect: PercentRect,
    pub quiz: Option<QuizChallenge>,
}

impl HazardZone {
    pub fn new(id: impl Into<String>, rect: PercentRect) -> Self {
        Self {
            id: ZoneId::new(id),
            rect,
            quiz: None,
        }
    }

    #[must_use]
    pub fn with_quiz(mut self, quiz: QuizChallenge) -> Self {
        self.quiz = Some(quiz);
        self
    }
}

/// One image of a hazard game with its ordered zones.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageTarget {
    pub asset_id: String,
    pub url: String,
    pub zones: Vec<HazardZone>,
}

impl ImageTarget {
    pub fn new(asset_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            asset_id: asset_id.into(),
            url: url.into(),
            zones: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_zone(mut self, zone: HazardZone) -> Self {
        self.zones.push(zone);
        self
    }
}

/// A symbol and its meaning; becomes two cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub symbol: String,
    pub meaning: String,
}

impl Pair {
    pub fn new(symbol: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            meaning: meaning.into(),
        }
    }
}

/// Zone as stored in the catalog.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoredZone {
    pub id: Option<String>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub options: Vec<String>,
    pub correct_answer: Option<usize>,
}

/// Image asset as stored in the catalog.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredAsset {
    pub id: Option<String>,
    pub url: Option<String>,
    pub coordinates: Vec<StoredZone>,
}

/// One game offered to a firm.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEntry {
    pub name: String,
    #[serde(default)]
    pub status: GameStatus,
    #[serde(default)]
    pub assets: Vec<StoredAsset>,
    #[serde(default)]
    pub pairs: Vec<Pair>,
}

impl GameEntry {
    pub fn new(kind: GameKind, status: GameStatus) -> Self {
        Self {
            name: kind.catalog_name().to_string(),
            status,
            assets: Vec::new(),
            pairs: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_asset(mut self, asset: StoredAsset) -> Self {
        self.assets.push(asset);
        self
    }

    #[must_use]
    pub fn with_pair(mut self, pair: Pair) -> Self {
        self.pairs.push(pair);
        self
    }

    #[must_use]
    pub fn kind(&self) -> Option<GameKind> {
        GameKind::from_catalog_name(&self.name)
    }

    /// Normalize stored assets into playable images.
    ///
    /// Assets without a URL are skipped. Zones without an id are named
    /// `"{asset_id}-{index}"`; assets without an id are named `asset-{index}`.
    /// Zone ids are unique within an image: a repeated stored id falls back
    /// to the positional name (suffixed further if that is taken too).
    pub fn image_targets(&self) -> Result<Vec<ImageTarget>> {
        let mut targets = Vec::with_capacity(self.assets.len());
        for (asset_idx, asset) in self.assets.iter().enumerate() {
            let Some(url) = asset.url.as_deref().filter(|u| !u.trim().is_empty()) else {
                tracing::warn!(asset = asset_idx, "skipping asset without url");
                continue;
            };
            let asset_id = asset
                .id
                .clone()
                .unwrap_or_else(|| format!("asset-{asset_idx}"));

            let mut target = ImageTarget::new(asset_id.clone(), url);
            let mut seen: FxHashSet<String> = FxHashSet::default();
            for (zone_idx, stored) in asset.coordinates.iter().enumerate() {
                let mut id = stored
                    .id
                    .clone()
                    .filter(|id| !seen.contains(id))
                    .unwrap_or_else(|| format!("{asset_id}-{zone_idx}"));
                let mut suffix = 1;
                while seen.contains(&id) {
                    id = format!("{asset_id}-{zone_idx}-{suffix}");
                    suffix += 1;
                }
                if stored.id.as_deref().is_some_and(|stored_id| stored_id != id) {
                    tracing::warn!(asset = %asset_id, zone = zone_idx, %id, "renamed duplicate zone id");
                }
                seen.insert(id.clone());
                let rect = PercentRect::new(stored.x, stored.y, stored.width, stored.height);
                let mut zone = HazardZone::new(id, rect);
                zone.quiz = QuizChallenge::from_stored(&stored.options, stored.correct_answer)?;
                target.zones.push(zone);
            }
            targets.push(target);
        }
        Ok(targets)
    }
}

/// A competing organization and its game catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Firm {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub games: Vec<GameEntry>,
}

impl Firm {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            games: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_game(mut self, game: GameEntry) -> Self {
        self.games.push(game);
        self
    }

    /// First entry for `kind`, whatever its status.
    #[must_use]
    pub fn game(&self, kind: GameKind) -> Option<&GameEntry> {
        self.games.iter().find(|g| g.kind() == Some(kind))
    }
}
