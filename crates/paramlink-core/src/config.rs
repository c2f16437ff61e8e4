//! Bridge session configuration.

use crate::error::{BridgeError, Result};
use crate::types::ParameterValue;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What a late-resolving initial `getParameter` does when the cell was
/// mutated (by a push or a write) while the read was in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialReadPolicy {
    /// Discard the read result if any mutation happened after it was issued.
    #[default]
    KeepNewer,
    /// Always apply the read result, even over a newer local value.
    AlwaysApply,
}

/// Configuration for a [`BridgeSession`](crate::BridgeSession).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Value a cell reports before its initial read resolves.
    pub placeholder_value: ParameterValue,
    /// Upper bound for a single host call. `None` waits forever.
    pub call_timeout_ms: Option<u64>,
    pub initial_read_policy: InitialReadPolicy,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            placeholder_value: 0.0,
            call_timeout_ms: None,
            initial_read_policy: InitialReadPolicy::KeepNewer,
        }
    }
}

impl BridgeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.call_timeout_ms == Some(0) {
            return Err(BridgeError::InvalidConfig(
                "call_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if !self.placeholder_value.is_finite() {
            return Err(BridgeError::InvalidConfig(format!(
                "placeholder_value {} is not finite",
                self.placeholder_value
            )));
        }
        Ok(())
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_ms.map(Duration::from_millis)
    }

    /// Rounded up to whole milliseconds, so any non-zero timeout stays valid.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        let ms = timeout.as_nanos().div_ceil(1_000_000);
        self.call_timeout_ms = Some(u64::try_from(ms).unwrap_or(u64::MAX));
        self
    }

    pub fn with_initial_read_policy(mut self, policy: InitialReadPolicy) -> Self {
        self.initial_read_policy = policy;
        self
    }

    pub fn with_placeholder(mut self, value: ParameterValue) -> Self {
        self.placeholder_value = value;
        self
    }
}
