use crate::utils::pagination::{DEFAULT_SESSION_TIMEOUT, MAX_SESSION_TIMEOUT};
use crate::utils::source::PetSource;
use log::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppConfigError {
    #[error("expected the {0} environment variable, but it is not set")]
    Missing(&'static str),
    #[error("{name} has an invalid value `{value}`")]
    Invalid { name: &'static str, value: String },
}

/// Runtime configuration read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub token: String,
    pub pet_source: PetSource,
    pub settings_path: PathBuf,
    pub log_file: Option<String>,
    pub log_level: LevelFilter,
    pub page_timeout: Duration,
    pub watch_source: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = get("DISCORD_TOKEN").ok_or(AppConfigError::Missing("DISCORD_TOKEN"))?;
        let pet_source =
            PetSource::from_location(&get("PET_DATA_SOURCE").unwrap_or_else(|| "pets.txt".into()));
        let settings_path =
            PathBuf::from(get("BOT_CONFIG_PATH").unwrap_or_else(|| "bot_config.json".into()));
        let log_file = match lookup("LOG_FILE") {
            Some(v) if v.trim().is_empty() => None,
            Some(v) => Some(v),
            None => Some("bot.log".to_string()),
        };

        let log_level = match get("LOG_LEVEL") {
            Some(value) => value
                .parse::<LevelFilter>()
                .map_err(|_| AppConfigError::Invalid {
                    name: "LOG_LEVEL",
                    value,
                })?,
            None => LevelFilter::Info,
        };

        let page_timeout = match get("PAGE_TIMEOUT_SECS") {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 && Duration::from_secs(secs) <= MAX_SESSION_TIMEOUT => {
                    Duration::from_secs(secs)
                }
                _ => {
                    return Err(AppConfigError::Invalid {
                        name: "PAGE_TIMEOUT_SECS",
                        value,
                    });
                }
            },
            None => DEFAULT_SESSION_TIMEOUT,
        };

        let watch_source = match get("PET_DATA_WATCH") {
            Some(value) => match value.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(AppConfigError::Invalid {
                        name: "PET_DATA_WATCH",
                        value,
                    });
                }
            },
            None => false,
        };

        Ok(Self {
            token,
            pet_source,
            settings_path,
            log_file,
            log_level,
            page_timeout,
            watch_source,
        })
    }
}
