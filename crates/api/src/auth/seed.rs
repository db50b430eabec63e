//! Startup creation of the first admin account.

use protolab_core::error::CoreError;
use protolab_core::roles::ROLE_ADMIN;
use protolab_db::models::user::CreateUser;
use protolab_db::repositories::UserRepo;
use protolab_db::DbPool;

use super::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::AdminSeed;
use crate::error::{AppError, AppResult};

/// Create the seeded admin unless the email is already registered.
///
/// Returns `true` if an account was created. An existing account is left
/// untouched, whatever its role or password.
pub async fn ensure_admin(pool: &DbPool, seed: &AdminSeed) -> AppResult<bool> {
    if UserRepo::find_by_email(pool, &seed.email).await?.is_some() {
        tracing::debug!(email = %seed.email, "Seed admin already exists");
        return Ok(false);
    }

    validate_password_strength(&seed.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(format!("ADMIN_PASSWORD: {msg}"))))?;

    let password_hash = hash_password(&seed.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: "Administrator".to_string(),
            email: seed.email.clone(),
            password_hash,
            role: ROLE_ADMIN.to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, email = %user.email, "Seeded admin account");
    Ok(true)
}
