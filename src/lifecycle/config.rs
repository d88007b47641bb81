//! System configuration.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `TRACKING_MAILBOX_CAPACITY` | request buffer per actor | `32` |
//! | `TRACKING_TIME_SCALE` | stage delays as a percentage of the standard table | `100` |
//!
//! Log filtering is configured separately through `RUST_LOG`.

use crate::model::StageSchedule;
use thiserror::Error;

pub const MAILBOX_CAPACITY_VAR: &str = "TRACKING_MAILBOX_CAPACITY";
pub const TIME_SCALE_VAR: &str = "TRACKING_TIME_SCALE";

const DEFAULT_MAILBOX_CAPACITY: usize = 32;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemConfig {
    pub mailbox_capacity: usize,
    pub schedule: StageSchedule,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
            schedule: StageSchedule::standard(),
        }
    }
}

fn positive(var: &'static str, value: &str) -> Result<u32, ConfigError> {
    match value.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        }),
    }
}

impl SystemConfig {
    /// Reads the process environment. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`SystemConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(MAILBOX_CAPACITY_VAR) {
            config.mailbox_capacity = positive(MAILBOX_CAPACITY_VAR, &value)? as usize;
        }
        if let Some(value) = lookup(TIME_SCALE_VAR) {
            let percent = positive(TIME_SCALE_VAR, &value)?;
            config.schedule = config.schedule.scaled(percent);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = SystemConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, SystemConfig::default());
        assert_eq!(config.mailbox_capacity, 32);
        assert_eq!(config.schedule, StageSchedule::standard());
    }

    #[test]
    fn time_scale_shrinks_the_schedule() {
        let config =
            SystemConfig::from_lookup(lookup(&[(TIME_SCALE_VAR, "10"), (MAILBOX_CAPACITY_VAR, " 8 ")]))
                .unwrap();
        assert_eq!(config.mailbox_capacity, 8);
        assert_eq!(config.schedule.last().delay, Duration::from_millis(1_000));
    }

    #[test]
    fn rejects_zero_and_garbage() {
        assert_eq!(
            SystemConfig::from_lookup(lookup(&[(MAILBOX_CAPACITY_VAR, "0")])),
            Err(ConfigError::InvalidNumber {
                var: MAILBOX_CAPACITY_VAR,
                value: "0".to_string()
            })
        );
        assert!(SystemConfig::from_lookup(lookup(&[(TIME_SCALE_VAR, "fast")])).is_err());
        assert!(SystemConfig::from_lookup(lookup(&[(TIME_SCALE_VAR, "-5")])).is_err());
    }
}
