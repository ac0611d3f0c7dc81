//! Domain layer - the user account model.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the `User` entity, its role enumeration, password hashing and the
//! application time zone used to stamp new records.

pub mod constants;
pub mod error;
pub mod password;
pub mod timezone;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use password::Password;
pub use timezone::AppTimezone;
pub use user::{NewUser, UpdateUser, User, UserExport, UserRole};
