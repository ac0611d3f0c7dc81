//! User Service Library
//!
//! Persistence and use cases for user accounts: the SeaORM mapping of the
//! `users` table, a repository over it and the service that registers,
//! updates, re-passwords and exports users.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use common::AppResult;
use tracing::info;

use crate::config::UserServiceConfig;
use crate::infra::Database;
use crate::repository::UserStore;
use crate::service::UserManager;

/// Connect to the database and assemble the user service.
///
/// Fails early if `APP_TIMEZONE` names an unknown zone.
pub async fn connect(config: &UserServiceConfig) -> AppResult<(Database, UserManager)> {
    let timezone = config.app_timezone()?;
    let db = Database::connect(&config.database).await?;

    let user_repo = Arc::new(UserStore::new(db.get_connection(), timezone));
    let user_service = UserManager::new(user_repo, timezone);

    info!(timezone = %timezone, "User service ready");
    Ok((db, user_service))
}
