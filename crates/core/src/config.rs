//! Rule tunables
//!
//! Defaults equal the constants in `blockfall-types`. Hosts may override a
//! few of them through the environment:
//!
//! | variable | field |
//! |---|---|
//! | `BLOCKFALL_SEED` | `seed` |
//! | `BLOCKFALL_LOCK_DELAY_MS` | `lock_delay` |
//! | `BLOCKFALL_MOVE_CAP` | `lock_move_limit` |
//! | `BLOCKFALL_MIN_FALL_MS` | `min_fall_interval` |
//!
//! Missing or unparsable values fall back to the default.

use std::time::Duration;

use crate::types::{
    CLEAR_MESSAGE_MS, LINE_CLEAR_DELAY_MS, LOCK_DELAY_MS, LOCK_MOVE_LIMIT, MIN_FALL_INTERVAL_MS,
    SOFT_DROP_INTERVAL_MS,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulesConfig {
    /// Grace period once the active piece is grounded
    pub lock_delay: Duration,
    /// Moves/rotations allowed while grounded before a forced lock
    pub lock_move_limit: u32,
    /// Window between marking full rows and removing them
    pub clear_delay: Duration,
    pub soft_drop_interval: Duration,
    pub message_lifetime: Duration,
    /// Lower bound on the gravity interval
    pub min_fall_interval: Duration,
    /// Fixed bag seed; `None` draws from entropy on every reset
    pub seed: Option<u64>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            lock_delay: ms(LOCK_DELAY_MS),
            lock_move_limit: LOCK_MOVE_LIMIT,
            clear_delay: ms(LINE_CLEAR_DELAY_MS),
            soft_drop_interval: ms(SOFT_DROP_INTERVAL_MS),
            message_lifetime: ms(CLEAR_MESSAGE_MS),
            min_fall_interval: ms(MIN_FALL_INTERVAL_MS),
            seed: None,
        }
    }
}

fn ms(value: u32) -> Duration {
    Duration::from_millis(value as u64)
}

impl RulesConfig {
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let seed = env::var("BLOCKFALL_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok());

        let lock_delay = env::var("BLOCKFALL_LOCK_DELAY_MS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .map(ms)
            .unwrap_or(defaults.lock_delay);

        let lock_move_limit = env::var("BLOCKFALL_MOVE_CAP")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.lock_move_limit);

        let min_fall_interval = env::var("BLOCKFALL_MIN_FALL_MS")
            .ok()
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|&v| v > 0)
            .map(ms)
            .unwrap_or(defaults.min_fall_interval);

        Self {
            lock_delay,
            lock_move_limit,
            min_fall_interval,
            seed,
            ..defaults
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
