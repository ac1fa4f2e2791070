//! # Pool Configuration
//!
//! Tuning values, loaded once at startup.
//!
//! ```toml
//! max_groups = 0          # 0 = one group per scheduler worker
//! group_bytes = 65536     # target footprint of one group
//! initial_capacity = 4096
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ParticleError, ParticleResult};
use crate::group::IDEAL_GROUP_BYTES;

/// Configuration for a [`ParticlePool`](crate::ParticlePool).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
    /// Ceiling on groups per bulk operation. Zero uses the scheduler's
    /// worker count.
    pub max_groups: u32,
    /// Target byte footprint of one group.
    pub group_bytes: usize,
    /// Capacity the pool is resized to on creation.
    pub initial_capacity: u32,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_groups: 0,
            group_bytes: IDEAL_GROUP_BYTES,
            initial_capacity: 0,
        }
    }
}

impl PoolConfig {
    /// Parses a configuration from TOML. Missing keys take default values.
    ///
    /// # Errors
    ///
    /// Returns [`ParticleError::ConfigParse`] on malformed TOML or unknown
    /// keys, and [`ParticleError::InvalidConfig`] if a value is out of range.
    pub fn from_toml_str(source: &str) -> ParticleResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| ParticleError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ParticleError::InvalidConfig`] if `group_bytes` is zero.
    pub fn validate(&self) -> ParticleResult<()> {
        if self.group_bytes == 0 {
            return Err(ParticleError::InvalidConfig(
                "group_bytes must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PoolConfig::default();
        assert_eq!(config.max_groups, 0);
        assert_eq!(config.group_bytes, 64 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = PoolConfig::from_toml_str("max_groups = 6\ninitial_capacity = 128\n").unwrap();
        assert_eq!(config.max_groups, 6);
        assert_eq!(config.initial_capacity, 128);
        assert_eq!(config.group_bytes, IDEAL_GROUP_BYTES);
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let err = PoolConfig::from_toml_str("max_grups = 6").unwrap_err();
        assert!(matches!(err, ParticleError::ConfigParse(_)));
    }

    #[test]
    fn test_zero_group_bytes_invalid() {
        let err = PoolConfig::from_toml_str("group_bytes = 0").unwrap_err();
        assert_eq!(
            err,
            ParticleError::InvalidConfig("group_bytes must be greater than zero".into())
        );
    }
}
