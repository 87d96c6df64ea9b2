//! Card-matching game.
//!
//! Each symbol/meaning pair becomes two cards in a shuffled grid. Players
//! flip two at a time:
//! - Same pair, different faces: both stay up for good
//! - Otherwise both flip back after a short delay
//! - Score is `round(100 * cards / clicks)`, 0 on time-out

mod deck;
mod session;

pub use deck::{build_deck, Card, CardKind};
pub use session::{MatchEvent, MatchSession, MatchSnapshot, MatchStatus};
