use std::env;
use std::str::FromStr;

use crate::error::ConfigError;

/// Names of the backing collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collections {
    pub checkposts: String,
    pub daily_logs: String,
    pub cases: String,
    pub seized_items: String,
}

impl Default for Collections {
    fn default() -> Self {
        Self {
            checkposts: "checkposts".to_string(),
            daily_logs: "daily_logs".to_string(),
            cases: "cases".to_string(),
            seized_items: "seized_items".to_string(),
        }
    }
}

/// Store and service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub collections: Collections,
    /// Maximum checkposts fetched by a record load (default: 100)
    pub list_limit: usize,
    /// Daily logs requested per page when reading a checkpost's logs (default: 1,000)
    pub log_limit: usize,
    /// Maximum concurrent per-checkpost fetches (default: 8)
    pub fetch_concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            collections: Collections::default(),
            list_limit: 100,
            log_limit: 1_000,
            fetch_concurrency: 8,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CHECKPOST_COLLECTION_CHECKPOSTS` - Checkpost collection (default: "checkposts")
    /// - `CHECKPOST_COLLECTION_DAILY_LOGS` - Daily log collection (default: "daily_logs")
    /// - `CHECKPOST_COLLECTION_CASES` - Case collection (default: "cases")
    /// - `CHECKPOST_COLLECTION_SEIZED_ITEMS` - Seized item catalog (default: "seized_items")
    /// - `CHECKPOST_LIST_LIMIT` - Checkposts per load (default: 100)
    /// - `CHECKPOST_LOG_LIMIT` - Daily logs per checkpost query (default: 1,000)
    /// - `CHECKPOST_FETCH_CONCURRENCY` - Concurrent per-checkpost fetches (default: 8)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, which returns the raw value of a
    /// variable if it is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |name: &'static str, default: String| lookup(name).unwrap_or(default);

        let config = Self {
            collections: Collections {
                checkposts: text(
                    "CHECKPOST_COLLECTION_CHECKPOSTS",
                    defaults.collections.checkposts,
                ),
                daily_logs: text(
                    "CHECKPOST_COLLECTION_DAILY_LOGS",
                    defaults.collections.daily_logs,
                ),
                cases: text("CHECKPOST_COLLECTION_CASES", defaults.collections.cases),
                seized_items: text(
                    "CHECKPOST_COLLECTION_SEIZED_ITEMS",
                    defaults.collections.seized_items,
                ),
            },
            list_limit: parse_var(&lookup, "CHECKPOST_LIST_LIMIT", defaults.list_limit)?,
            log_limit: parse_var(&lookup, "CHECKPOST_LOG_LIMIT", defaults.log_limit)?,
            fetch_concurrency: parse_var(
                &lookup,
                "CHECKPOST_FETCH_CONCURRENCY",
                defaults.fetch_concurrency,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that every identifier is set and every limit is positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let names = [
            ("CHECKPOST_COLLECTION_CHECKPOSTS", &self.collections.checkposts),
            ("CHECKPOST_COLLECTION_DAILY_LOGS", &self.collections.daily_logs),
            ("CHECKPOST_COLLECTION_CASES", &self.collections.cases),
            (
                "CHECKPOST_COLLECTION_SEIZED_ITEMS",
                &self.collections.seized_items,
            ),
        ];
        if let Some(&(name, _)) = names.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ConfigError::Empty { name });
        }

        let limits = [
            ("CHECKPOST_LIST_LIMIT", self.list_limit),
            ("CHECKPOST_LOG_LIMIT", self.log_limit),
            ("CHECKPOST_FETCH_CONCURRENCY", self.fetch_concurrency),
        ];
        if let Some(&(name, _)) = limits.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Zero { name });
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            value: raw.clone(),
        }),
    }
}
