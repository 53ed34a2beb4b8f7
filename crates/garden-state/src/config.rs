//! Client Configuration
//!
//! Every field has a default, so a partial JSON document is enough. The API
//! base can be baked in at build time with `GARDEN_API_BASE`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{GridLimits, DEFAULT_MAX_SIZE, MAX_GRID_SIDE};

const DEFAULT_API_BASE: &str = "http://localhost:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid client configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("retry.max_attempts must be at least 1")]
    NoAttempts,
    #[error("grid limits must be between 1 and {max}, got {0}x{1}", max = MAX_GRID_SIDE)]
    Limits(usize, usize),
}

/// Bounded retry before a failed request rolls back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first; 1 disables retry
    pub max_attempts: u32,
    pub backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            backoff_ms: 250,
        }
    }
}

impl RetryPolicy {
    /// Delay before attempt `attempt + 1`, doubling each time
    pub fn delay_ms(&self, attempt: u32) -> u64 {
        let exponent = attempt.saturating_sub(1).min(16);
        self.backoff_ms.saturating_mul(1u64 << exponent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base: String,
    pub max_size_x: usize,
    pub max_size_y: usize,
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: option_env!("GARDEN_API_BASE").unwrap_or(DEFAULT_API_BASE).to_string(),
            max_size_x: DEFAULT_MAX_SIZE,
            max_size_y: DEFAULT_MAX_SIZE,
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.retry.max_attempts == 0 {
            return Err(ConfigError::NoAttempts);
        }
        let side_ok = |side: usize| (1..=MAX_GRID_SIDE).contains(&side);
        if !side_ok(config.max_size_x) || !side_ok(config.max_size_y) {
            return Err(ConfigError::Limits(config.max_size_x, config.max_size_y));
        }
        Ok(config)
    }

    pub fn limits(&self) -> GridLimits {
        GridLimits {
            max_size_x: self.max_size_x,
            max_size_y: self.max_size_y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ClientConfig::from_json(r#"{"max_size_x": 12, "retry": {"max_attempts": 3}}"#).unwrap();
        assert_eq!(config.max_size_x, 12);
        assert_eq!(config.max_size_y, DEFAULT_MAX_SIZE);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.backoff_ms, 250);
        assert_eq!(config.limits().max_size_x, 12);
    }

    #[test]
    fn test_rejects_bad_documents() {
        assert!(matches!(ClientConfig::from_json("{"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            ClientConfig::from_json(r#"{"retry": {"max_attempts": 0}}"#),
            Err(ConfigError::NoAttempts)
        ));
        assert!(matches!(
            ClientConfig::from_json(r#"{"max_size_x": 5000}"#),
            Err(ConfigError::Limits(5000, DEFAULT_MAX_SIZE))
        ));
    }

    #[test]
    fn test_backoff_doubles() {
        let retry = RetryPolicy { max_attempts: 4, backoff_ms: 100 };
        assert_eq!(retry.delay_ms(1), 100);
        assert_eq!(retry.delay_ms(2), 200);
        assert_eq!(retry.delay_ms(3), 400);
    }
}
