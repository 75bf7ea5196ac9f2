//! Connection settings for the documents API.

use std::env;
use std::time::Duration;

use crate::error::{ClientError, Result};

/// Settings for [`AppwriteClient`](crate::AppwriteClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root, including the version segment.
    pub endpoint: String,
    pub project_id: String,
    /// Server key; omitted for session-authenticated access.
    pub api_key: Option<String>,
    pub database_id: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            endpoint: "https://cloud.appwrite.io/v1".to_string(),
            project_id: project_id.into(),
            api_key: None,
            database_id: "main".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `APPWRITE_ENDPOINT` - API root (default: "https://cloud.appwrite.io/v1")
    /// - `APPWRITE_PROJECT_ID` - Project id (required)
    /// - `APPWRITE_API_KEY` - Server key (optional)
    /// - `APPWRITE_DATABASE_ID` - Database id (default: "main")
    /// - `APPWRITE_TIMEOUT_SECONDS` - Request timeout (default: 30)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, which returns the raw value of a
    /// variable if it is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let project_id = lookup("APPWRITE_PROJECT_ID")
            .ok_or_else(|| ClientError::Config("APPWRITE_PROJECT_ID must be set".to_string()))?;
        let mut config = Self::new(project_id);

        if let Some(endpoint) = lookup("APPWRITE_ENDPOINT") {
            config.endpoint = endpoint;
        }
        config.api_key = lookup("APPWRITE_API_KEY").filter(|key| !key.trim().is_empty());
        if let Some(database_id) = lookup("APPWRITE_DATABASE_ID") {
            config.database_id = database_id;
        }
        if let Some(raw) = lookup("APPWRITE_TIMEOUT_SECONDS") {
            let seconds: u64 = raw.trim().parse().map_err(|_| {
                ClientError::Config(format!("Invalid value for APPWRITE_TIMEOUT_SECONDS: {raw}"))
            })?;
            config.timeout = Duration::from_secs(seconds);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_database_id(mut self, database_id: impl Into<String>) -> Self {
        self.database_id = database_id.into();
        self
    }

    /// Rejects blank identifiers and a zero timeout.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("APPWRITE_ENDPOINT", &self.endpoint),
            ("APPWRITE_PROJECT_ID", &self.project_id),
            ("APPWRITE_DATABASE_ID", &self.database_id),
        ];
        if let Some(&(name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ClientError::Config(format!("{name} cannot be empty")));
        }
        if self.timeout.is_zero() {
            return Err(ClientError::Config(
                "APPWRITE_TIMEOUT_SECONDS must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
