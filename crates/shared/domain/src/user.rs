//! User domain entity and related types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::constants::{ROLE_ADMIN, ROLE_EMPLOYEE, ROLE_USER};
use crate::error::{DomainError, DomainResult};
use crate::password::Password;
use crate::timezone::AppTimezone;

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Employee,
    Admin,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::User, UserRole::Employee, UserRole::Admin];

    /// Stored string value of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => ROLE_USER,
            UserRole::Employee => ROLE_EMPLOYEE,
            UserRole::Admin => ROLE_ADMIN,
        }
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_USER => Ok(UserRole::User),
            ROLE_EMPLOYEE => Ok(UserRole::Employee),
            ROLE_ADMIN => Ok(UserRole::Admin),
            other => Err(DomainError::validation(format!("Unknown role: {}", other))),
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity.
///
/// There is no plaintext password field: a password given at
/// construction or through [`User::set_password`] only ever lands here as
/// its Argon2 hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Database identifier, `None` until the record is inserted
    pub id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub contact_number: Option<String>,
    pub password_hash: Option<Password>,
    pub created_at: Option<DateTime<FixedOffset>>,
    pub position: Option<String>,
    pub role: UserRole,
    /// Owning department (`departments.id`), if any
    pub department_id: Option<i32>,
}

impl User {
    /// Build a new, not yet persisted user.
    ///
    /// `created_at` is stamped with the current time in `tz`, the role
    /// defaults to [`UserRole::User`], and a non-empty password is hashed
    /// before the user is returned.
    ///
    /// # Errors
    /// Returns a validation error when a field breaks its column constraint,
    /// or a password error if hashing fails.
    pub fn new(input: NewUser, tz: &AppTimezone) -> DomainResult<Self> {
        input.validate()?;

        let NewUser {
            first_name,
            last_name,
            email,
            contact_number,
            position,
            role,
            department_id,
            password,
        } = input;

        let mut user = Self {
            id: None,
            first_name,
            last_name,
            email,
            contact_number,
            password_hash: None,
            created_at: Some(tz.now()),
            position,
            role: role.unwrap_or_default(),
            department_id,
        };

        if let Some(plain) = password.filter(|p| !p.is_empty()) {
            user.set_password(&plain)?;
        }

        Ok(user)
    }

    /// Replace the stored hash with a fresh hash of `plain_text`.
    pub fn set_password(&mut self, plain_text: &str) -> DomainResult<()> {
        self.password_hash = Some(Password::new(plain_text)?);
        Ok(())
    }

    /// Check `plain_text` against the stored hash.
    ///
    /// A user without a password never matches.
    ///
    /// # Errors
    /// Returns a password error if the stored hash is malformed.
    pub fn check_password(&self, plain_text: &str) -> DomainResult<bool> {
        match &self.password_hash {
            Some(hash) => hash.verify(plain_text),
            None => Ok(false),
        }
    }

    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    /// First and last name joined by a single space
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Apply explicit field assignments.
    ///
    /// Fields left as `None` are untouched; `Some(None)` clears an optional
    /// field. The whole update is validated before anything is assigned.
    pub fn apply_update(&mut self, changes: UpdateUser) -> DomainResult<()> {
        changes.validate()?;
        changes.check_clearable_lengths()?;

        if let Some(first_name) = changes.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            self.last_name = last_name;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(contact_number) = changes.contact_number {
            self.contact_number = contact_number;
        }
        if let Some(position) = changes.position {
            self.position = position;
        }
        if let Some(role) = changes.role {
            self.role = role;
        }
        if let Some(department_id) = changes.department_id {
            self.department_id = department_id;
        }

        Ok(())
    }

    /// Public view of this user. Never carries the password hash.
    pub fn to_export(&self) -> UserExport {
        UserExport::from(self)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<User {}>", self.email)
    }
}

/// User creation data transfer object
#[derive(Clone, Default, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50))]
    pub last_name: String,
    #[validate(email, length(max = 120))]
    pub email: String,
    #[validate(length(max = 20))]
    pub contact_number: Option<String>,
    #[validate(length(max = 100))]
    pub position: Option<String>,
    /// Defaults to [`UserRole::User`]
    #[serde(default)]
    pub role: Option<UserRole>,
    pub department_id: Option<i32>,
    /// Plaintext password, hashed and dropped by [`User::new`]
    pub password: Option<String>,
}

// Keep the plaintext password out of logs
impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("contact_number", &self.contact_number)
            .field("position", &self.position)
            .field("role", &self.role)
            .field("department_id", &self.department_id)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// User update data transfer object.
///
/// For the nullable columns, `None` keeps the current value, `Some(None)`
/// clears it and `Some(Some(v))` assigns `v`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 50))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub last_name: Option<String>,
    #[validate(email, length(max = 120))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "explicit")]
    pub contact_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit")]
    pub position: Option<Option<String>>,
    pub role: Option<UserRole>,
    #[serde(default, deserialize_with = "explicit")]
    pub department_id: Option<Option<i32>>,
}

impl UpdateUser {
    fn check_clearable_lengths(&self) -> DomainResult<()> {
        let fields = [
            ("contact_number", &self.contact_number, 20),
            ("position", &self.position, 100),
        ];
        let problems: Vec<String> = fields
            .into_iter()
            .filter_map(|(field, value, max)| match value {
                Some(Some(v)) if v.chars().count() > max => Some(format!("{}: length", field)),
                _ => None,
            })
            .collect();

        if problems.is_empty() {
            Ok(())
        } else {
            Err(DomainError::validation(problems.join("; ")))
        }
    }
}

/// A field present as `null` becomes `Some(None)`; an absent field stays
/// `None` through `#[serde(default)]`.
fn explicit<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Exported user data (safe to hand to clients)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserExport {
    pub id: Option<i32>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub position: Option<String>,
    /// Role string value (`user`, `employee` or `admin`)
    pub role: String,
    /// ISO-8601 creation timestamp
    pub created_at: Option<String>,
}

impl From<&User> for UserExport {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            position: user.position.clone(),
            role: user.role.to_string(),
            created_at: user.created_at.map(|ts| ts.to_rfc3339()),
        }
    }
}

impl From<User> for UserExport {
    fn from(user: User) -> Self {
        UserExport::from(&user)
    }
}
