use serde::{Deserialize, Serialize};

use crate::error::ReportError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Reports older than `now - retention_secs` may be evicted. `None` keeps everything.
    pub retention_secs: Option<f64>,
    /// Capacity reserved for each new entity stream.
    pub initial_capacity: usize,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            retention_secs: None,
            initial_capacity: 16,
        }
    }
}

impl RepositoryConfig {
    /// Reject a retention window that is negative or not finite.
    pub fn validate(&self) -> Result<(), ReportError> {
        match self.retention_secs {
            Some(secs) if !secs.is_finite() || secs < 0.0 => Err(ReportError::InvalidConfig {
                field: "retention_secs".to_string(),
                reason: format!("expected a finite, non-negative number of seconds, got {secs}"),
            }),
            _ => Ok(()),
        }
    }

    /// The retention window if it is usable. An invalid window keeps everything.
    pub fn retention_window(&self) -> Option<f64> {
        self.retention_secs.filter(|secs| secs.is_finite() && *secs >= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_retention(secs: f64) -> RepositoryConfig {
        RepositoryConfig {
            retention_secs: Some(secs),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = RepositoryConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.retention_window(), None);
        assert_eq!(with_retention(0.0).retention_window(), Some(0.0));
        assert_eq!(with_retention(60.0).validate(), Ok(()));
    }

    #[test]
    fn test_bad_retention_is_rejected() {
        for secs in [-1.0, f64::NAN, f64::INFINITY] {
            let config = with_retention(secs);
            assert!(matches!(
                config.validate(),
                Err(ReportError::InvalidConfig { ref field, .. }) if field == "retention_secs"
            ));
            assert_eq!(config.retention_window(), None);
        }
    }
}
