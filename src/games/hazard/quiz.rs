//! Quiz overlay for zones that carry a knowledge check.
//!
//! Options are shown in a shuffled order. Each presented slot remembers the
//! catalog index it came from, so correctness is judged against the
//! original correct option no matter where the shuffle put it.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::{QuizChallenge, QUIZ_OPTION_COUNT};
use crate::core::{Permuter, ZoneId};

/// One presented option.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub text: String,
    pub original_index: usize,
    pub is_correct: bool,
}

/// Why a selection was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectError {
    /// An answer is already locked in.
    Locked,
    /// No such slot.
    OutOfRange,
}

/// An open quiz overlay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveQuiz {
    zone_id: ZoneId,
    token: u64,
    options: Vec<QuizOption>,
    selected: Option<usize>,
}

impl ActiveQuiz {
    /// Open a quiz for `zone_id`, shuffling the options with `permuter`.
    ///
    /// `token` identifies this opening; resolution events carry it back.
    /// An order that is not a permutation of the options is replaced by the
    /// stored order.
    pub fn open(zone_id: ZoneId, challenge: &QuizChallenge, token: u64, permuter: &mut dyn Permuter) -> Self {
        let mut order = permuter.permutation(QUIZ_OPTION_COUNT);
        if !is_permutation(&order) {
            warn!(zone = %zone_id, ?order, "invalid quiz option order, using stored order");
            order = (0..QUIZ_OPTION_COUNT).collect();
        }
        let options = order
            .into_iter()
            .map(|original_index| QuizOption {
                text: challenge.options()[original_index].clone(),
                original_index,
                is_correct: original_index == challenge.correct_index(),
            })
            .collect();

        Self {
            zone_id,
            token,
            options,
            selected: None,
        }
    }

    /// Lock in the option at presented `slot`. Returns whether it is correct.
    pub fn select(&mut self, slot: usize) -> Result<bool, SelectError> {
        if self.selected.is_some() {
            return Err(SelectError::Locked);
        }
        let option = self.options.get(slot).ok_or(SelectError::OutOfRange)?;
        let correct = option.is_correct;
        self.selected = Some(slot);
        Ok(correct)
    }

    #[must_use]
    pub fn zone_id(&self) -> &ZoneId {
        &self.zone_id
    }

    #[must_use]
    pub fn token(&self) -> u64 {
        self.token
    }

    #[must_use]
    pub fn options(&self) -> &[QuizOption] {
        &self.options
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.selected.is_some()
    }

    /// Whether the locked answer is correct. `None` until an answer is locked.
    #[must_use]
    pub fn answer_correct(&self) -> Option<bool> {
        self.selected.map(|slot| self.options[slot].is_correct)
    }

    /// Presented slot that now holds the correct option.
    #[must_use]
    pub fn correct_slot(&self) -> usize {
        self.options.iter().position(|o| o.is_correct).unwrap_or(0)
    }
}

fn is_permutation(order: &[usize]) -> bool {
    let mut seen = [false; QUIZ_OPTION_COUNT];
    order.len() == QUIZ_OPTION_COUNT
        && order
            .iter()
            .all(|&i| i < QUIZ_OPTION_COUNT && !std::mem::replace(&mut seen[i], true))
}
