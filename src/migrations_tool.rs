use sqlx::postgres::PgPool;
use tracing::info;

use polybites::application::error::AppError;
use polybites::config::DatabaseSettings;
use polybites::infra::db::PostgresRepositories;

#[derive(Debug, sqlx::FromRow)]
struct AppliedMigration {
    version: i64,
    description: String,
    success: bool,
}

/// Apply embedded migrations and log the resulting migration history.
pub async fn apply(database: &DatabaseSettings) -> Result<(), AppError> {
    let database_url = database.url.as_deref().ok_or_else(|| {
        AppError::validation(
            "database url is required (provide --database-url or set POLYBITES__DATABASE__URL)",
        )
    })?;

    let pool = PostgresRepositories::connect(database_url, 1)
        .await
        .map_err(|e| AppError::unexpected(e.to_string()))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|e| AppError::unexpected(format!("failed to apply migrations: {e}")))?;

    for migration in applied_migrations(&pool).await? {
        info!(
            target = "polybites::migrate",
            version = migration.version,
            description = %migration.description,
            success = migration.success,
            "Migration applied"
        );
    }

    pool.close().await;
    Ok(())
}

async fn applied_migrations(pool: &PgPool) -> Result<Vec<AppliedMigration>, AppError> {
    sqlx::query_as::<_, AppliedMigration>(
        "SELECT version, description, success FROM _sqlx_migrations ORDER BY version",
    )
    .fetch_all(pool)
    .await
    .map_err(|e| AppError::unexpected(e.to_string()))
}
