//! Engine configuration.
//!
//! Hosts configure timing and randomness at startup via `EngineConfig`.
//! Every field has a default, so a partial TOML fragment is enough:
//!
//! ```
//! use firm_games::core::{EngineConfig, QuizClockPolicy};
//!
//! let config = EngineConfig::from_toml_str("match_seconds = 120\nquiz_clock_policy = \"pause\"").unwrap();
//! assert_eq!(config.match_seconds, 120);
//! assert_eq!(config.hazard_seconds_per_image, 60);
//! assert_eq!(config.quiz_clock_policy, QuizClockPolicy::Pause);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::{GameError, Result};
use super::rng::GameRng;

/// What the per-image countdown does while a quiz overlay is open.
///
/// Zone clicks are blocked under both policies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizClockPolicy {
    /// Countdown continues; a quiz can run the image out of time.
    #[default]
    KeepRunning,
    /// Countdown is paused until the quiz closes.
    Pause,
}

/// Complete engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Countdown per hazard image, in seconds.
    pub hazard_seconds_per_image: u32,

    /// Countdown for a whole card-matching session, in seconds.
    pub match_seconds: u32,

    /// Delay between locking a quiz answer and resolving it.
    pub quiz_resolve_delay_ms: u64,

    /// Delay before two mismatched cards flip back.
    pub mismatch_resolve_delay_ms: u64,

    /// Clock tick period.
    pub tick_interval_ms: u64,

    /// Quiz overlay clock policy.
    pub quiz_clock_policy: QuizClockPolicy,

    /// Fixed seed for deck and quiz shuffles. `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hazard_seconds_per_image: 60,
            match_seconds: 180,
            quiz_resolve_delay_ms: 1500,
            mismatch_resolve_delay_ms: 1000,
            tick_interval_ms: 1000,
            quiz_clock_policy: QuizClockPolicy::KeepRunning,
            rng_seed: None,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML fragment; missing keys take their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|e| GameError::InvalidInput(format!("engine config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject zero-length countdowns and tick periods.
    pub fn validate(&self) -> Result<()> {
        if self.hazard_seconds_per_image == 0 || self.match_seconds == 0 {
            return Err(GameError::InvalidInput("countdown must be at least 1 second".into()));
        }
        if self.tick_interval_ms == 0 {
            return Err(GameError::InvalidInput("tick interval must be positive".into()));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_hazard_seconds(mut self, seconds: u32) -> Self {
        self.hazard_seconds_per_image = seconds;
        self
    }

    #[must_use]
    pub fn with_match_seconds(mut self, seconds: u32) -> Self {
        self.match_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_quiz_clock_policy(mut self, policy: QuizClockPolicy) -> Self {
        self.quiz_clock_policy = policy;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    #[must_use]
    pub fn quiz_resolve_delay(&self) -> Duration {
        Duration::from_millis(self.quiz_resolve_delay_ms)
    }

    #[must_use]
    pub fn mismatch_resolve_delay(&self) -> Duration {
        Duration::from_millis(self.mismatch_resolve_delay_ms)
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// RNG for this configuration, seeded or from entropy.
    #[must_use]
    pub fn rng(&self) -> GameRng {
        match self.rng_seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.hazard_seconds_per_image, 60);
        assert_eq!(config.match_seconds, 180);
        assert_eq!(config.quiz_resolve_delay(), Duration::from_millis(1500));
        assert_eq!(config.mismatch_resolve_delay(), Duration::from_secs(1));
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.quiz_clock_policy, QuizClockPolicy::KeepRunning);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::new()
            .with_hazard_seconds(30)
            .with_match_seconds(90)
            .with_quiz_clock_policy(QuizClockPolicy::Pause)
            .with_seed(7);

        assert_eq!(config.hazard_seconds_per_image, 30);
        assert_eq!(config.match_seconds, 90);
        assert_eq!(config.quiz_clock_policy, QuizClockPolicy::Pause);
        assert_eq!(config.rng_seed, Some(7));
    }

    #[test]
    fn test_toml_partial() {
        let config = EngineConfig::from_toml_str("rng_seed = 99\ntick_interval_ms = 250").unwrap();
        assert_eq!(config.rng_seed, Some(99));
        assert_eq!(config.tick_interval(), Duration::from_millis(250));
        assert_eq!(config.match_seconds, 180);
    }

    #[test]
    fn test_toml_rejects_zero_countdown() {
        let err = EngineConfig::from_toml_str("match_seconds = 0").unwrap_err();
        assert!(matches!(err, GameError::InvalidInput(_)));
    }

    #[test]
    fn test_toml_rejects_garbage() {
        assert!(EngineConfig::from_toml_str("match_seconds = \"soon\"").is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = EngineConfig::default().with_seed(3);
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
