//! Game implementations.

pub mod hazard;
pub mod matching;
