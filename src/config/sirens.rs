//! Siren configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Siren lifetime and registry bounds
#[derive(Debug, Clone, Deserialize)]
pub struct SirenConfig {
    /// How long a siren sounds before expiring on its own
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u64,

    /// Most sirens held at once; the oldest is stopped to make room
    #[serde(default = "default_max_active")]
    pub max_active: usize,
}

impl SirenConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.duration_secs == 0 {
            return Err(ValidationError::InvalidSirenDuration);
        }
        if self.max_active == 0 {
            return Err(ValidationError::InvalidSirenCapacity);
        }
        Ok(())
    }
}

impl Default for SirenConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_duration_secs(),
            max_active: default_max_active(),
        }
    }
}

fn default_duration_secs() -> u64 {
    30
}

fn default_max_active() -> usize {
    256
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_standard_siren() {
        let config = SirenConfig::default();
        assert_eq!(config.duration(), Duration::from_secs(30));
        assert_eq!(config.max_active, 256);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_duration_is_rejected() {
        let config = SirenConfig {
            duration_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidSirenDuration));
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let config = SirenConfig {
            max_active: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidSirenCapacity));
    }
}
