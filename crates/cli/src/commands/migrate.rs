//! Database migration command.
//!
//! Runs the server's sqlx migrations, then ensures the tower-sessions table
//! exists. The server never migrates on startup; this command is the only
//! migration path.

use tower_sessions_sqlx_store::PostgresStore;

use super::CommandError;

/// Run all database migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration
/// fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Creating session table...");
    PostgresStore::new(pool.clone()).migrate().await?;

    tracing::info!("Migrations complete");
    Ok(())
}
