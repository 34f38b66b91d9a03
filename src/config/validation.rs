//! Configuration validation.
//!
//! Semantic checks that run after parsing and before any subsystem starts.
//! Size-spec syntax errors are caught earlier, in the codec.

use thiserror::Error;

use crate::config::schema::RelayConfig;

/// Errors from semantic configuration validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A zero-byte buffer cannot hold data; the size spec was degenerate.
    #[error("buffer capacity must be non-zero")]
    ZeroCapacity,

    /// The capacity cannot be addressed on this platform.
    #[error("buffer capacity {0} exceeds addressable memory")]
    CapacityTooLarge(u64),
}

impl RelayConfig {
    /// Validate the configuration. Runs before the buffer is created, so a
    /// degenerate capacity never reaches it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if usize::try_from(self.capacity).is_err() {
            return Err(ConfigError::CapacityTooLarge(self.capacity));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(RelayConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_capacity_rejected() {
        let config = RelayConfig {
            capacity: 0,
            ..RelayConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroCapacity));
    }
}
