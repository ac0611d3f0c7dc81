//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, SqlErr,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity, Model};
use common::{AppError, AppResult};
use domain::{AppTimezone, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a new user and return it with its assigned ID
    async fn insert(&self, user: User) -> AppResult<User>;

    /// Write every column of an existing user
    async fn update(&self, user: User) -> AppResult<User>;

    /// Delete user by ID
    async fn delete(&self, id: i32) -> AppResult<()>;

    /// List all users ordered by ID
    async fn list(&self) -> AppResult<Vec<User>>;
}

/// SeaORM implementation of [`UserRepository`]
pub struct UserStore {
    db: DatabaseConnection,
    timezone: AppTimezone,
}

impl UserStore {
    /// Create new repository instance. Timestamps read back are expressed
    /// in `timezone`, since the database may hand them back at UTC.
    pub fn new(db: DatabaseConnection, timezone: AppTimezone) -> Self {
        Self { db, timezone }
    }

    /// Rows with a role outside the enumeration are corrupt data, not bad input.
    fn to_domain(&self, model: Model) -> AppResult<User> {
        let id = model.id;
        let mut user = User::try_from(model)
            .map_err(|e| AppError::internal(format!("Invalid user row {}: {}", id, e)))?;
        user.created_at = user.created_at.map(|ts| self.timezone.to_local(ts));
        Ok(user)
    }
}

/// Unique violations can only come from the email column.
fn map_write_error(err: DbErr) -> AppError {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
        return AppError::conflict("Email");
    }
    match err {
        DbErr::RecordNotUpdated => AppError::NotFound,
        other => AppError::from(other),
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(|m| self.to_domain(m)).transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        result.map(|m| self.to_domain(m)).transpose()
    }

    async fn insert(&self, user: User) -> AppResult<User> {
        if user.id.is_some() {
            return Err(AppError::validation("User is already persisted"));
        }

        let active_model = ActiveModel::from(&user);
        let model = active_model.insert(&self.db).await.map_err(map_write_error)?;
        self.to_domain(model)
    }

    async fn update(&self, user: User) -> AppResult<User> {
        if user.id.is_none() {
            return Err(AppError::validation("User has not been persisted"));
        }

        let active_model = ActiveModel::from(&user);
        let model = active_model.update(&self.db).await.map_err(map_write_error)?;
        self.to_domain(model)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        models.into_iter().map(|m| self.to_domain(m)).collect()
    }
}
