//! Runtime configuration.
//!
//! `LudoConfig` carries the knobs a deployment may tune without touching the
//! rules: which outer-loop cells are safe, how often clients poll, an
//! optional fixed seed, and how bots pick their moves.
//!
//! Sources, lowest to highest precedence:
//! 1. Built-in defaults
//! 2. A TOML document (`LudoConfig::from_toml_str`)
//! 3. Environment overrides (`LUDO_SEED`, `LUDO_POLL_INTERVAL_MS`)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::error::ConfigError;
use crate::track::{DEFAULT_SAFE_CELLS, TRACK_LEN};

/// Default client poll cadence.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// How bots choose among legal moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotPolicyKind {
    /// Prefer finishing, then capturing, then leaving home, then the lead piece.
    #[default]
    Greedy,
    /// Uniform among legal moves.
    Random,
}

/// Engine and client configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LudoConfig {
    /// Outer-loop cells where pieces cannot be captured.
    pub safe_cells: Vec<u8>,

    /// Client poll cadence in milliseconds.
    pub poll_interval_ms: u64,

    /// Fixed seed for dice, invite codes and ids. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Bot move selection.
    pub bot_policy: BotPolicyKind,
}

impl Default for LudoConfig {
    fn default() -> Self {
        Self {
            safe_cells: DEFAULT_SAFE_CELLS.to_vec(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            seed: None,
            bot_policy: BotPolicyKind::default(),
        }
    }
}

impl LudoConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: LudoConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `LUDO_SEED` and `LUDO_POLL_INTERVAL_MS` overrides.
    ///
    /// Unparseable values are logged and ignored.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if let Ok(raw) = std::env::var("LUDO_SEED") {
            match raw.parse::<u64>() {
                Ok(seed) => {
                    debug!("LUDO_SEED override: {}", seed);
                    self.seed = Some(seed);
                }
                Err(e) => warn!("Ignoring LUDO_SEED={}: {}", raw, e),
            }
        }
        if let Ok(raw) = std::env::var("LUDO_POLL_INTERVAL_MS") {
            match raw.parse::<u64>() {
                Ok(ms) if ms > 0 => {
                    debug!("LUDO_POLL_INTERVAL_MS override: {}", ms);
                    self.poll_interval_ms = ms;
                }
                Ok(_) => warn!("Ignoring LUDO_POLL_INTERVAL_MS=0"),
                Err(e) => warn!("Ignoring LUDO_POLL_INTERVAL_MS={}: {}", raw, e),
            }
        }
        self
    }

    /// Check cell indices and the poll interval.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(&cell) = self.safe_cells.iter().find(|&&c| c >= TRACK_LEN) {
            return Err(ConfigError::InvalidSafeCell(cell));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        Ok(())
    }

    /// Replace the safe cell set.
    #[must_use]
    pub fn with_safe_cells(mut self, cells: impl Into<Vec<u8>>) -> Self {
        self.safe_cells = cells.into();
        self
    }

    /// Fix the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the poll cadence.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = interval.as_millis().max(1) as u64;
        self
    }

    /// Set the bot policy.
    #[must_use]
    pub fn with_bot_policy(mut self, policy: BotPolicyKind) -> Self {
        self.bot_policy = policy;
        self
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Is this outer-loop cell safe from capture?
    #[must_use]
    pub fn is_safe(&self, cell: u8) -> bool {
        self.safe_cells.contains(&cell)
    }
}
