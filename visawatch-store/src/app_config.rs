use serde::Deserialize;
use std::env;
use std::time::Duration;
use visawatch_core::extension::{DEFAULT_EXTENSION_DAYS, MAX_EXTENSION_DAYS, MIN_EXTENSION_DAYS};
use visawatch_core::{AlertThreshold, ClockRules, CoreResult, DayCount, ExtensionStatusPolicy};

/// Built-in defaults, overridable by files and environment
const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub clock: ClockConfig,
    pub business_rules: BusinessRules,
    pub events: EventsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClockConfig {
    pub interval_seconds: u64,
    pub step_days: f64,
    pub floor_days: i64,
    #[serde(default)]
    pub thresholds: Vec<AlertThreshold>,
}

impl ClockConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    pub fn rules(&self) -> CoreResult<ClockRules> {
        ClockRules::new(
            DayCount::from_days_f64(self.step_days),
            DayCount::from_days(self.floor_days),
            self.thresholds.clone(),
        )
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    #[serde(default)]
    pub extension_status_policy: ExtensionStatusPolicy,
    #[serde(default = "default_extension_days")]
    pub default_extension_days: u32,
    #[serde(default = "default_visa_days")]
    pub new_passenger_visa_days: u32,
    pub reminder_message: String,
}

fn default_extension_days() -> u32 { DEFAULT_EXTENSION_DAYS }
fn default_visa_days() -> u32 { 90 }

#[derive(Debug, Deserialize, Clone)]
pub struct EventsConfig {
    pub channel_capacity: usize,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `VISAWATCH__CLOCK__INTERVAL_SECONDS=1`
            .add_source(config::Environment::with_prefix("VISAWATCH").separator("__"))
            .build()?;

        let config: Self = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Built-in defaults only, no files or environment
    pub fn defaults() -> Result<Self, config::ConfigError> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.clock.interval_seconds == 0 {
            return Err(config::ConfigError::Message(
                "clock.interval_seconds must be at least 1".to_string(),
            ));
        }
        self.clock
            .rules()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let days = self.business_rules.default_extension_days;
        if !(MIN_EXTENSION_DAYS..=MAX_EXTENSION_DAYS).contains(&days) {
            return Err(config::ConfigError::Message(format!(
                "business_rules.default_extension_days must be between {} and {}",
                MIN_EXTENSION_DAYS, MAX_EXTENSION_DAYS
            )));
        }
        if self.events.channel_capacity == 0 {
            return Err(config::ConfigError::Message(
                "events.channel_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use visawatch_core::AlertKind;

    #[test]
    fn test_defaults_match_dashboard_behaviour() {
        let config = Config::defaults().unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.clock.interval(), Duration::from_secs(5));
        assert_eq!(config.business_rules.extension_status_policy, ExtensionStatusPolicy::Derive);
        assert_eq!(config.business_rules.default_extension_days, 30);
        assert_eq!(config.business_rules.new_passenger_visa_days, 90);

        let rules = config.clock.rules().unwrap();
        assert_eq!(rules, ClockRules::default());
        assert_eq!(rules.thresholds[1], AlertThreshold::new(7, AlertKind::Danger));
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let mut config = Config::defaults().unwrap();
        config.clock.interval_seconds = 0;
        assert!(config.validate().is_err());
    }
}
