//! Domain-level constants.
//!
//! These constants define business rules and column limits for user accounts.

// =============================================================================
// User Roles
// =============================================================================

/// Default role assigned to new users
pub const ROLE_USER: &str = "user";

/// Staff member of a company
pub const ROLE_EMPLOYEE: &str = "employee";

/// Administrator role with elevated privileges
pub const ROLE_ADMIN: &str = "admin";

// =============================================================================
// Storage limits
// =============================================================================

/// Width of the `password_hash` column. Argon2 PHC strings with default
/// parameters are well under this.
pub const MAX_PASSWORD_HASH_LENGTH: usize = 128;

// =============================================================================
// Time zone
// =============================================================================

/// Environment variable holding the IANA zone used for default timestamps
pub const APP_TIMEZONE_ENV: &str = "APP_TIMEZONE";

/// Zone used when `APP_TIMEZONE` is unset
pub const DEFAULT_TIMEZONE: &str = "UTC";
