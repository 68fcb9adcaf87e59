use std::path::PathBuf;

use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

const TIME_FORMAT: &str = "%H:%M";

/// Runtime settings for the ledger and its scheduled reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// IANA timezone in which report triggers and "today" are evaluated.
    #[serde(default = "Config::default_timezone")]
    pub timezone: String,
    #[serde(default = "Config::default_end_of_day_time")]
    pub end_of_day_time: String,
    #[serde(default = "Config::default_start_of_month_time")]
    pub start_of_month_time: String,
    /// Where scheduled reports are delivered.
    #[serde(default = "Config::default_destination")]
    pub destination: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_suffix: Option<String>,
    #[serde(default = "Config::default_top_expenses")]
    pub top_expenses: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom ledger file. Defaults to `<data dir>/tally/ledger.json`.
    pub ledger_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: Self::default_timezone(),
            end_of_day_time: Self::default_end_of_day_time(),
            start_of_month_time: Self::default_start_of_month_time(),
            destination: Self::default_destination(),
            currency_suffix: None,
            top_expenses: Self::default_top_expenses(),
            ledger_path: None,
        }
    }
}

impl Config {
    pub fn default_timezone() -> String {
        "Asia/Tashkent".into()
    }

    pub fn default_end_of_day_time() -> String {
        "22:00".into()
    }

    pub fn default_start_of_month_time() -> String {
        "00:00".into()
    }

    pub fn default_destination() -> String {
        "owner".into()
    }

    pub fn default_top_expenses() -> usize {
        5
    }

    pub fn parsed_timezone(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .trim()
            .parse::<Tz>()
            .map_err(|_| ConfigError::InvalidTimezone(self.timezone.clone()))
    }

    pub fn parsed_end_of_day(&self) -> Result<NaiveTime, ConfigError> {
        parse_time(&self.end_of_day_time)
    }

    pub fn parsed_start_of_month(&self) -> Result<NaiveTime, ConfigError> {
        parse_time(&self.start_of_month_time)
    }

    /// Checks every field that has to parse before the runtime can start.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.parsed_timezone()?;
        self.parsed_end_of_day()?;
        self.parsed_start_of_month()?;
        if self.top_expenses == 0 {
            return Err(ConfigError::InvalidTopExpenses(self.top_expenses));
        }
        Ok(())
    }

    pub fn resolve_ledger_path(&self) -> PathBuf {
        if let Some(path) = &self.ledger_path {
            return path.clone();
        }

        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("tally").join("ledger.json")
    }
}

fn parse_time(raw: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT)
        .map_err(|_| ConfigError::InvalidTime(raw.to_string()))
}
