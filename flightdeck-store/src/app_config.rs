use chrono::TimeDelta;
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Timing rules of the airline. All durations are milliseconds; anchors are
/// measured backwards from a flight's actual departure time.
#[derive(Debug, Deserialize, Clone)]
pub struct AirlineConfig {
    pub audio_alerts_interval_ms: u64,
    pub display_update_interval_ms: u64,
    pub registration_opening_time_ms: u64,
    pub registration_closing_time_ms: u64,
    pub boarding_opening_time_ms: u64,
    pub boarding_closing_time_ms: u64,
    pub ticket_sale_end_time_ms: u64,
    #[serde(default = "default_command_queue_capacity")]
    pub command_queue_capacity: usize,
    #[serde(default = "default_queue_capacity")]
    pub notification_queue_capacity: usize,
    #[serde(default = "default_queue_capacity")]
    pub email_queue_capacity: usize,
}

fn default_command_queue_capacity() -> usize { 1_000_000 }

fn default_queue_capacity() -> usize { 1024 }

const MINUTE_MS: u64 = 60 * 1000;

impl Default for AirlineConfig {
    fn default() -> Self {
        Self {
            audio_alerts_interval_ms: 1000,
            display_update_interval_ms: 1000,
            registration_opening_time_ms: 120 * MINUTE_MS,
            registration_closing_time_ms: 40 * MINUTE_MS,
            boarding_opening_time_ms: 40 * MINUTE_MS,
            boarding_closing_time_ms: 20 * MINUTE_MS,
            ticket_sale_end_time_ms: 30 * MINUTE_MS,
            command_queue_capacity: default_command_queue_capacity(),
            notification_queue_capacity: default_queue_capacity(),
            email_queue_capacity: default_queue_capacity(),
        }
    }
}

fn delta(ms: u64) -> TimeDelta {
    TimeDelta::milliseconds(i64::try_from(ms).unwrap_or(i64::MAX))
}

impl AirlineConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides are optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `FLIGHTDECK__TICKET_SALE_END_TIME_MS=60000`
            .add_source(config::Environment::with_prefix("FLIGHTDECK").separator("__"))
            .build()?;

        let config: Self = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the runtime cannot work with: zero timer periods and
    /// zero-sized queues.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.audio_alerts_interval_ms == 0 {
            return Err(config::ConfigError::Message(
                "audio_alerts_interval_ms must be positive".to_string(),
            ));
        }
        if self.display_update_interval_ms == 0 {
            return Err(config::ConfigError::Message(
                "display_update_interval_ms must be positive".to_string(),
            ));
        }
        if self.command_queue_capacity == 0
            || self.notification_queue_capacity == 0
            || self.email_queue_capacity == 0
        {
            return Err(config::ConfigError::Message(
                "queue capacities must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn audio_alerts_interval(&self) -> Duration {
        Duration::from_millis(self.audio_alerts_interval_ms)
    }

    pub fn display_update_interval(&self) -> Duration {
        Duration::from_millis(self.display_update_interval_ms)
    }

    pub fn registration_opening_time(&self) -> TimeDelta {
        delta(self.registration_opening_time_ms)
    }

    pub fn registration_closing_time(&self) -> TimeDelta {
        delta(self.registration_closing_time_ms)
    }

    pub fn boarding_opening_time(&self) -> TimeDelta {
        delta(self.boarding_opening_time_ms)
    }

    pub fn boarding_closing_time(&self) -> TimeDelta {
        delta(self.boarding_closing_time_ms)
    }

    pub fn ticket_sale_end_time(&self) -> TimeDelta {
        delta(self.ticket_sale_end_time_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AirlineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.command_queue_capacity, 1_000_000);
        assert_eq!(config.ticket_sale_end_time(), TimeDelta::minutes(30));
        assert_eq!(config.audio_alerts_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = AirlineConfig {
            display_update_interval_ms: 0,
            ..AirlineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_applies_queue_defaults() {
        let source = r#"
            audio_alerts_interval_ms = 200
            display_update_interval_ms = 100
            registration_opening_time_ms = 4500
            registration_closing_time_ms = 1000
            boarding_opening_time_ms = 2000
            boarding_closing_time_ms = 1000
            ticket_sale_end_time_ms = 1000
        "#;
        let config: AirlineConfig = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.registration_opening_time(), TimeDelta::milliseconds(4500));
        assert_eq!(config.email_queue_capacity, 1024);
        assert_eq!(config.notification_queue_capacity, 1024);
    }
}
