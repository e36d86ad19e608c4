use std::str::FromStr;

use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub calendar: CalendarConfig,
    pub schedule: ScheduleConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// The calendar whose events are candidate-offerable availability.
    pub primary_url: String,
    /// Calendars holding existing commitments, subtracted from availability.
    pub plan_urls: Vec<String>,
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// IANA timezone name used for local-day bucketing and topic hours.
    pub timezone: String,
    pub weeks: i64,
}

impl ScheduleConfig {
    /// ## Summary
    /// Resolves the configured timezone name against the tz database.
    ///
    /// ## Errors
    /// Returns an error if the name is not a known IANA timezone.
    pub fn tz(&self) -> CoreResult<chrono_tz::Tz> {
        chrono_tz::Tz::from_str(&self.timezone).map_err(|_| {
            CoreError::InvalidConfiguration(format!("unknown timezone {:?}", self.timezone))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and `config.toml` into a `Settings`.
    /// Environment variables take precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("calendar.plan_urls", Vec::<String>::new())?
            .set_default("calendar.display_name", "Availability")?
            .set_default("schedule.timezone", "UTC")?
            .set_default("schedule.weeks", crate::constants::DEFAULT_HORIZON_WEEKS)?
            .set_default("logging.level", "info")?
            .add_source(
                config::Environment::default()
                    .convert_case(config::Case::Snake)
                    .separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
