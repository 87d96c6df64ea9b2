//! Card deck construction.
//!
//! Each catalog pair yields a symbol card and a meaning card that share a
//! `PairId`. The 2N cards are then put in a uniformly random order.

use serde::{Deserialize, Serialize};

use crate::catalog::Pair;
use crate::core::{CardId, GameError, PairId, Permuter, Result};

/// Which face of a pair a card shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Symbol,
    Meaning,
}

/// One tile in the grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub kind: CardKind,
    pub content: String,
    pub pair_id: PairId,
}

impl Card {
    /// Two cards match iff they share a pair and show different faces.
    #[must_use]
    pub fn matches(&self, other: &Card) -> bool {
        self.pair_id == other.pair_id && self.kind != other.kind
    }
}

/// Build the shuffled deck for `pairs`.
///
/// ```
/// use firm_games::catalog::Pair;
/// use firm_games::core::GameRng;
/// use firm_games::games::matching::build_deck;
///
/// let pairs = vec![Pair::new("⚠", "Warning"), Pair::new("☢", "Radiation")];
/// let deck = build_deck(&pairs, &mut GameRng::new(1)).unwrap();
/// assert_eq!(deck.len(), 4);
/// ```
pub fn build_deck(pairs: &[Pair], permuter: &mut dyn Permuter) -> Result<Vec<Card>> {
    if pairs.is_empty() {
        return Err(GameError::CatalogEmpty("card game has no pairs".into()));
    }

    let mut ordered = Vec::with_capacity(pairs.len() * 2);
    for (index, pair) in pairs.iter().enumerate() {
        let pair_id = PairId::new(index as u32);
        ordered.push(Card {
            id: CardId::new(ordered.len() as u32),
            kind: CardKind::Symbol,
            content: pair.symbol.clone(),
            pair_id,
        });
        ordered.push(Card {
            id: CardId::new(ordered.len() as u32),
            kind: CardKind::Meaning,
            content: pair.meaning.clone(),
            pair_id,
        });
    }

    let order = permuter.permutation(ordered.len());
    let mut slots: Vec<Option<Card>> = ordered.into_iter().map(Some).collect();
    let deck = order
        .into_iter()
        .filter_map(|index| slots.get_mut(index).and_then(Option::take))
        .collect::<Vec<_>>();

    if deck.len() != pairs.len() * 2 {
        return Err(GameError::InvalidInput("deck permutation is not a permutation".into()));
    }
    Ok(deck)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameRng, SequencePermuter};
    use rustc_hash::FxHashMap;

    fn pairs(n: usize) -> Vec<Pair> {
        (0..n).map(|i| Pair::new(format!("S{i}"), format!("M{i}"))).collect()
    }

    #[test]
    fn test_identity_order() {
        let deck = build_deck(&pairs(2), &mut SequencePermuter::identity()).unwrap();
        let faces: Vec<_> = deck.iter().map(|c| (c.pair_id.raw(), c.kind)).collect();
        assert_eq!(
            faces,
            vec![
                (0, CardKind::Symbol),
                (0, CardKind::Meaning),
                (1, CardKind::Symbol),
                (1, CardKind::Meaning),
            ]
        );
        assert_eq!(deck[1].content, "M0");
    }

    #[test]
    fn test_each_pair_has_both_faces() {
        let deck = build_deck(&pairs(8), &mut GameRng::new(42)).unwrap();
        assert_eq!(deck.len(), 16);

        let mut faces: FxHashMap<PairId, Vec<CardKind>> = FxHashMap::default();
        for card in &deck {
            faces.entry(card.pair_id).or_default().push(card.kind);
        }
        assert_eq!(faces.len(), 8);
        for kinds in faces.values() {
            assert_eq!(kinds.len(), 2);
            assert_ne!(kinds[0], kinds[1]);
        }
    }

    #[test]
    fn test_shuffle_changes_order() {
        let identity = build_deck(&pairs(10), &mut SequencePermuter::identity()).unwrap();
        let shuffled = build_deck(&pairs(10), &mut GameRng::new(42)).unwrap();
        assert_ne!(identity, shuffled);
    }

    #[test]
    fn test_matches() {
        let deck = build_deck(&pairs(2), &mut SequencePermuter::identity()).unwrap();
        assert!(deck[0].matches(&deck[1]));
        assert!(!deck[0].matches(&deck[2]));
        assert!(!deck[0].matches(&deck[0]));
    }

    #[test]
    fn test_empty_pairs() {
        let err = build_deck(&[], &mut SequencePermuter::identity()).unwrap_err();
        assert!(matches!(err, GameError::CatalogEmpty(_)));
    }

    #[test]
    fn test_duplicate_permutation_rejected() {
        struct Broken;
        impl Permuter for Broken {
            fn permutation(&mut self, len: usize) -> Vec<usize> {
                vec![0; len]
            }
        }
        assert!(build_deck(&pairs(2), &mut Broken).is_err());
    }
}
