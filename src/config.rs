use std::env;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

const DEFAULT_COMMAND_BUFFER: NonZeroUsize = NonZeroUsize::new(16).unwrap();

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Where the ledger document lives.
    pub store_path: PathBuf,
    /// Optional csv order feed; the built-in sample orders when unset.
    pub orders_path: Option<PathBuf>,
    pub log_level: String,
    /// Capacity of the channel between the command reader and the ledger.
    pub command_buffer: NonZeroUsize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            store_path: env::var_os("DRIVER_LEDGER_STORE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("driver-ledger.json")),
            orders_path: env::var_os("DRIVER_LEDGER_ORDERS")
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".to_string()),
            command_buffer: parse_or_default("COMMAND_BUFFER", DEFAULT_COMMAND_BUFFER)?,
        })
    }
}

fn parse_or_default<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, env::var(key).ok(), default)
}

fn parse_value<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => raw.trim().parse::<T>().map_err(|err| ConfigError::Invalid {
            key,
            reason: err.to_string(),
        }),
        None => Ok(default),
    }
}
