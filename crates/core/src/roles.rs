//! User role names.
//!
//! Must stay in sync with the `ck_users_role` constraint on `users`.

/// Full access to every admin endpoint.
pub const ROLE_ADMIN: &str = "admin";

/// Default role for self-registered customers.
pub const ROLE_USER: &str = "user";
