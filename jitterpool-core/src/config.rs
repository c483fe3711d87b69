//! Configuration management for the jitterpool driver
//!
//! Pool constants (capacity, watermark, samples per round, mix shift) are the
//! algorithm itself and are deliberately not configurable; only the external
//! collaborators (probe target, whitener, output cadence) are.

use crate::{whiten::WhitenerKind, Error, Result, POOL_CAPACITY_BITS};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Stream driver configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StreamConfig {
    /// Host probed for round-trip jitter
    #[serde(default = "default_probe_host")]
    pub probe_host: String,

    /// Per-probe timeout in milliseconds
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Digest used to whiten output
    #[serde(default)]
    pub whitener: WhitenerKind,

    /// Pool bits drawn per emitted digest
    #[serde(default = "default_request_bits")]
    pub request_bits: u64,

    /// Pause between emitted digests in milliseconds
    #[serde(default = "default_emit_interval_ms")]
    pub emit_interval_ms: u64,
}

impl StreamConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let config: Self = envy::prefixed("JITTERPOOL_")
            .from_env()
            .map_err(|e| Error::Config(format!("Failed to parse environment variables: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.probe_host.is_empty() || self.probe_host.chars().any(char::is_whitespace) {
            return Err(Error::Config(
                "probe_host must be a non-empty hostname without whitespace".to_string(),
            ));
        }

        if self.probe_timeout_ms == 0 {
            return Err(Error::Config("probe_timeout_ms must be > 0".to_string()));
        }

        if self.request_bits == 0 || self.request_bits > POOL_CAPACITY_BITS {
            return Err(Error::Config(format!(
                "request_bits must be between 1 and {}",
                POOL_CAPACITY_BITS
            )));
        }

        Ok(())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn emit_interval(&self) -> Duration {
        Duration::from_millis(self.emit_interval_ms)
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            probe_host: default_probe_host(),
            probe_timeout_ms: default_probe_timeout_ms(),
            whitener: WhitenerKind::default(),
            request_bits: default_request_bits(),
            emit_interval_ms: default_emit_interval_ms(),
        }
    }
}

// Default value functions
fn default_probe_host() -> String {
    "google.com".to_string()
}

fn default_probe_timeout_ms() -> u64 {
    2000
}

fn default_request_bits() -> u64 {
    160
}

fn default_emit_interval_ms() -> u64 {
    500
}
