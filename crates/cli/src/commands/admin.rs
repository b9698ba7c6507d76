//! Admin user management commands.

use shopmax_core::UserRole;
use shopmax_server::services::AuthService;
use shopmax_server::services::auth::RegisterInput;

use super::CommandError;

/// Create a user with the `ADMIN` role.
///
/// # Errors
///
/// Returns `CommandError::Invalid` when the email or password is rejected,
/// or when a user with the email already exists.
pub async fn create_user(
    email: &str,
    name: &str,
    password: &str,
    address: &str,
) -> Result<(), CommandError> {
    let pool = super::connect().await?;

    let user = AuthService::new(&pool)
        .register_with_role(
            RegisterInput {
                email,
                name,
                password,
                address,
            },
            UserRole::Admin,
        )
        .await
        .map_err(|e| CommandError::Invalid(e.to_string()))?;

    tracing::info!(user_id = %user.id, email = %user.email, "admin user created");
    Ok(())
}
