//! Session engine trait for game implementations.
//!
//! Both games implement `SessionEngine`:
//! - Which inputs are accepted in each state
//! - How inputs and clock ticks move the state machine
//! - When the session ends and with what score
//!
//! Hosts drive engines through this trait and never reach into
//! game-specific state directly.

pub mod engine;

pub use engine::{
    IgnoreReason, InputOutcome, SessionEngine, SessionOutcome, TerminalCallback, TerminalNotifier,
    TerminalReport,
};
