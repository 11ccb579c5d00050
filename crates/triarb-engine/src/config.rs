//! Engine configuration.

use serde::{Deserialize, Serialize};

/// How the engine waits for all three quotes to become operational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitWaitMode {
    /// Block on each quote's readiness signal. No polling.
    Signal,
    /// Re-check all quotes on a fixed interval.
    Poll,
}

impl Default for InitWaitMode {
    fn default() -> Self {
        Self::Signal
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Evaluation cadence while running.
    #[serde(default = "default_eval_interval_ms")]
    pub eval_interval_ms: u64,

    /// Re-check interval when `init_wait` is `poll`.
    #[serde(default = "default_init_poll_interval_ms")]
    pub init_poll_interval_ms: u64,

    #[serde(default)]
    pub init_wait: InitWaitMode,
}

fn default_eval_interval_ms() -> u64 {
    100
}

fn default_init_poll_interval_ms() -> u64 {
    3_000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            eval_interval_ms: default_eval_interval_ms(),
            init_poll_interval_ms: default_init_poll_interval_ms(),
            init_wait: InitWaitMode::default(),
        }
    }
}
