//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{NotSet, Set};

use domain::{DomainError, Password, User};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub contact_number: Option<String>,
    /// Argon2 PHC string (NULL = no password set)
    pub password_hash: Option<String>,
    pub created_at: Option<DateTimeWithTimeZone>,
    pub position: Option<String>,
    /// Role string value (`user`, `employee`, `admin`)
    pub role: String,
    /// Foreign key to `departments.id`
    pub department_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity.
///
/// Fails if the stored role is not one of the known values.
impl TryFrom<Model> for User {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(User {
            id: Some(model.id),
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            contact_number: model.contact_number,
            password_hash: model.password_hash.map(Password::from_hash),
            created_at: model.created_at,
            position: model.position,
            role: model.role.parse()?,
            department_id: model.department_id,
        })
    }
}

/// Convert domain entity to an active model with every column set.
/// An unsaved user leaves `id` unset so the database assigns it.
impl From<&User> for ActiveModel {
    fn from(user: &User) -> Self {
        ActiveModel {
            id: match user.id {
                Some(id) => Set(id),
                None => NotSet,
            },
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            email: Set(user.email.clone()),
            contact_number: Set(user.contact_number.clone()),
            password_hash: Set(user.password_hash.as_ref().map(|p| p.as_str().to_string())),
            created_at: Set(user.created_at),
            position: Set(user.position.clone()),
            role: Set(user.role.to_string()),
            department_id: Set(user.department_id),
        }
    }
}
