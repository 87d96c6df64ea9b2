//! Read-only access to the firm catalog.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::types::{Firm, GameKind};
use crate::core::{GameError, Result};

/// Catalog store interface.
///
/// Implementations only need `list_firms`; lookup by name has a default
/// built on `find_firm`.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// All firms. Fails with `CatalogUnavailable` if the store cannot be read.
    async fn list_firms(&self) -> Result<Vec<Firm>>;

    /// Firm matching `name` (see `find_firm`), or `None`.
    async fn get_firm_by_name(&self, name: &str) -> Result<Option<Firm>> {
        let firms = self.list_firms().await?;
        Ok(find_firm(&firms, name).cloned())
    }
}

/// Find a firm by name, case-insensitively.
///
/// An exact (trimmed, lowercased) match wins; otherwise the first firm whose
/// name contains the search or is contained by it.
///
/// ```
/// use firm_games::catalog::{find_firm, Firm};
///
/// let firms = vec![Firm::new("1", "Acme Industries"), Firm::new("2", "Acme")];
/// assert_eq!(find_firm(&firms, " ACME ").unwrap().id, "2");
/// assert_eq!(find_firm(&firms, "industries").unwrap().id, "1");
/// assert!(find_firm(&firms, "Globex").is_none());
/// ```
#[must_use]
pub fn find_firm<'a>(firms: &'a [Firm], name: &str) -> Option<&'a Firm> {
    let search = name.trim().to_lowercase();
    if search.is_empty() {
        return None;
    }
    let normalized = |f: &Firm| f.name.trim().to_lowercase();

    firms.iter().find(|f| normalized(f) == search).or_else(|| {
        firms.iter().find(|f| {
            let candidate = normalized(f);
            !candidate.is_empty() && (candidate.contains(&search) || search.contains(&candidate))
        })
    })
}

/// Playable games for a firm, hazard first, without duplicates.
#[must_use]
pub fn active_games(firm: &Firm) -> Vec<GameKind> {
    GameKind::ALL
        .into_iter()
        .filter(|&kind| firm.game(kind).is_some_and(|g| g.status.is_playable()))
        .collect()
}

/// Catalog held in memory. Used by hosts that preload content, and by tests.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    firms: RwLock<Vec<Firm>>,
    unavailable: RwLock<Option<String>>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new(firms: Vec<Firm>) -> Self {
        Self {
            firms: RwLock::new(firms),
            unavailable: RwLock::new(None),
        }
    }

    pub async fn insert(&self, firm: Firm) {
        self.firms.write().await.push(firm);
    }

    /// Make every read fail with `CatalogUnavailable(reason)`.
    pub async fn set_unavailable(&self, reason: Option<String>) {
        *self.unavailable.write().await = reason;
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalog {
    async fn list_firms(&self) -> Result<Vec<Firm>> {
        if let Some(reason) = self.unavailable.read().await.clone() {
            return Err(GameError::CatalogUnavailable(reason));
        }
        Ok(self.firms.read().await.clone())
    }
}
