//! User service configuration.

use std::env;

use common::{AppResult, DatabaseConfig, TimezoneConfig};
use domain::AppTimezone;

/// User service configuration.
#[derive(Debug, Clone, Default)]
pub struct UserServiceConfig {
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Zone used to stamp `created_at` on new users
    pub timezone: TimezoneConfig,
}

impl UserServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// `USER_SERVICE_DATABASE_URL` takes precedence over `DATABASE_URL`.
    pub fn from_env() -> Self {
        let mut database = DatabaseConfig::from_env();
        if let Ok(url) = env::var("USER_SERVICE_DATABASE_URL") {
            database.url = url;
        }

        Self {
            database,
            timezone: TimezoneConfig::from_env(),
        }
    }

    /// Resolve the configured time zone, failing on unknown names.
    pub fn app_timezone(&self) -> AppResult<AppTimezone> {
        Ok(self.timezone.resolve()?)
    }
}
