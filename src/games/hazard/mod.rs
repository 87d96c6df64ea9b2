//! Hazard-spotting game.
//!
//! Players find hidden zones in a sequence of images against a per-image
//! countdown:
//! - A click is converted to percentage space and hit-tested against the
//!   zones not yet found (first in catalog order wins on overlap)
//! - Zones with a quiz are only found after a correct answer
//! - Image score is `round(100 * zones / clicks)`, 0 on time-out
//! - Session score is the mean of image scores, forced to 0 if any is 0

mod geometry;
mod quiz;
mod session;

pub use geometry::{PercentPoint, PercentRect, PointerEvent, RenderedBox};
pub use quiz::{ActiveQuiz, QuizOption, SelectError};
pub use session::{HazardEvent, HazardSession, HazardSnapshot, HazardStatus, ImageProgress, ImageStatus};
