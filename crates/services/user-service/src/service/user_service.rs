//! User service - Handles user account use cases.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use common::{AppError, AppResult, OptionExt};
use domain::{AppTimezone, NewUser, UpdateUser, User, UserExport};

use crate::repository::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a user; a supplied password is hashed before anything is stored
    async fn register(&self, input: NewUser) -> AppResult<User>;

    /// Get user by ID
    async fn get_user(&self, id: i32) -> AppResult<User>;

    /// Get user by email
    async fn get_user_by_email(&self, email: &str) -> AppResult<User>;

    /// List all users
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Assign the given fields and persist
    async fn update_user(&self, id: i32, changes: UpdateUser) -> AppResult<User>;

    /// Replace the user's password hash
    async fn reset_password(&self, id: i32, new_password: &str) -> AppResult<()>;

    /// Check a plaintext password against the stored hash
    async fn check_password(&self, email: &str, password: &str) -> AppResult<bool>;

    /// Delete user
    async fn delete_user(&self, id: i32) -> AppResult<()>;

    /// Exported view of a user
    async fn export_user(&self, id: i32) -> AppResult<UserExport>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
    timezone: AppTimezone,
}

impl UserManager {
    /// Create new user service; `timezone` stamps `created_at` on new users
    pub fn new(repo: Arc<dyn UserRepository>, timezone: AppTimezone) -> Self {
        Self { repo, timezone }
    }

    async fn ensure_email_free(&self, email: &str, owner: Option<i32>) -> AppResult<()> {
        if let Some(existing) = self.repo.find_by_email(email).await? {
            if existing.id != owner {
                warn!(email = %email, "Email already registered");
                return Err(AppError::conflict("Email"));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn register(&self, input: NewUser) -> AppResult<User> {
        self.ensure_email_free(&input.email, None).await?;

        let user = User::new(input, &self.timezone)?;
        let user = self.repo.insert(user).await?;

        info!(user_id = ?user.id, email = %user.email, role = %user.role, "User registered");
        Ok(user)
    }

    async fn get_user(&self, id: i32) -> AppResult<User> {
        debug!(user_id = id, "Fetching user");
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<User> {
        debug!(email = %email, "Fetching user by email");
        self.repo.find_by_email(email).await?.ok_or_not_found()
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repo.list().await
    }

    async fn update_user(&self, id: i32, changes: UpdateUser) -> AppResult<User> {
        let mut user = self.get_user(id).await?;

        if let Some(email) = changes.email.as_deref() {
            if email != user.email {
                self.ensure_email_free(email, user.id).await?;
            }
        }

        user.apply_update(changes)?;
        let user = self.repo.update(user).await?;

        info!(user_id = id, "User updated");
        Ok(user)
    }

    async fn reset_password(&self, id: i32, new_password: &str) -> AppResult<()> {
        let mut user = self.get_user(id).await?;
        user.set_password(new_password)?;
        self.repo.update(user).await?;

        info!(user_id = id, "Password reset");
        Ok(())
    }

    async fn check_password(&self, email: &str, password: &str) -> AppResult<bool> {
        let user = self.get_user_by_email(email).await?;
        Ok(user.check_password(password)?)
    }

    async fn delete_user(&self, id: i32) -> AppResult<()> {
        self.repo.delete(id).await?;
        info!(user_id = id, "User deleted");
        Ok(())
    }

    async fn export_user(&self, id: i32) -> AppResult<UserExport> {
        Ok(self.get_user(id).await?.to_export())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;
    use domain::{Password, UserRole};
    use mockall::predicate::eq;

    fn stored_user(id: i32, email: &str) -> User {
        User {
            id: Some(id),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: email.to_string(),
            contact_number: None,
            password_hash: None,
            created_at: Some(AppTimezone::default().now()),
            position: None,
            role: UserRole::User,
            department_id: None,
        }
    }

    fn new_user(email: &str, password: Option<&str>) -> NewUser {
        NewUser {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            password: password.map(str::to_string),
            ..Default::default()
        }
    }

    fn service(repo: MockUserRepository) -> UserManager {
        UserManager::new(Arc::new(repo), AppTimezone::default())
    }

    #[tokio::test]
    async fn test_register_hashes_password_and_defaults_role() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .withf(|email| email == "ada@example.com")
            .returning(|_| Ok(None));
        repo.expect_insert()
            .withf(|user| {
                user.id.is_none()
                    && user.role == UserRole::User
                    && user
                        .password_hash
                        .as_ref()
                        .is_some_and(|h| h.as_str() != "analytical-engine")
            })
            .returning(|mut user| {
                user.id = Some(1);
                Ok(user)
            });

        let user = service(repo)
            .register(new_user("ada@example.com", Some("analytical-engine")))
            .await
            .unwrap();

        assert_eq!(user.id, Some(1));
        assert!(user.check_password("analytical-engine").unwrap());
        assert!(user.created_at.is_some());
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(stored_user(9, email))));
        repo.expect_insert().never();

        let result = service(repo)
            .register(new_user("taken@example.com", None))
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_invalid_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_insert().never();

        let result = service(repo).register(new_user("nope", None)).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().with(eq(42)).returning(|_| Ok(None));

        let result = service(repo).get_user(42).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_user_rejects_email_owned_by_other() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(stored_user(id, "me@example.com"))));
        repo.expect_find_by_email()
            .withf(|email| email == "other@example.com")
            .returning(|email| Ok(Some(stored_user(2, email))));
        repo.expect_update().never();

        let changes = UpdateUser {
            email: Some("other@example.com".to_string()),
            ..Default::default()
        };
        let result = service(repo).update_user(1, changes).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_user_assigns_fields() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(stored_user(id, "me@example.com"))));
        repo.expect_update().returning(Ok);

        let changes = UpdateUser {
            position: Some(Some("Engineer".to_string())),
            role: Some(UserRole::Employee),
            ..Default::default()
        };
        let user = service(repo).update_user(1, changes).await.unwrap();

        assert_eq!(user.position.as_deref(), Some("Engineer"));
        assert_eq!(user.role, UserRole::Employee);
        assert_eq!(user.email, "me@example.com");
    }

    #[tokio::test]
    async fn test_reset_password_persists_new_hash() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(stored_user(id, "me@example.com"))));
        repo.expect_update()
            .withf(|user| {
                user.check_password("brand-new-secret").unwrap_or(false)
                    && !user.check_password("wrong").unwrap_or(true)
            })
            .times(1)
            .returning(Ok);

        let result = service(repo).reset_password(1, "brand-new-secret").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_check_password() {
        let hash = Password::new("letmein-please").unwrap().as_str().to_string();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(move |email| {
            let mut user = stored_user(3, email);
            user.password_hash = Some(Password::from_hash(hash.clone()));
            Ok(Some(user))
        });

        let service = service(repo);
        assert!(service
            .check_password("me@example.com", "letmein-please")
            .await
            .unwrap());
        assert!(!service
            .check_password("me@example.com", "letmein")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_export_user_omits_hash() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|id| {
            let mut user = stored_user(id, "me@example.com");
            user.password_hash = Some(Password::from_hash("$argon2id$fake".to_string()));
            Ok(Some(user))
        });

        let export = service(repo).export_user(5).await.unwrap();
        let json = serde_json::to_string(&export).unwrap();

        assert_eq!(export.id, Some(5));
        assert_eq!(export.role, "user");
        assert!(!json.contains("argon2"));
    }

    #[tokio::test]
    async fn test_delete_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete().returning(|_| Err(AppError::NotFound));

        let result = service(repo).delete_user(8).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }
}
