/// Connection pool and schema
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    config::DatabaseSettings,
    error::{Result, ServerError},
};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE INDEX IF NOT EXISTS idx_users_created_at ON users (created_at DESC)",
];

/// Open the shared pool. Fails if the database cannot be reached.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.connection_url())
        .await?;

    tracing::info!(
        max_connections = settings.max_connections,
        "Connected to PostgreSQL"
    );
    Ok(pool)
}

/// Create the `users` table and its index if they do not exist yet.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| ServerError::Migration(e.to_string()))?;
    }

    tracing::info!("Database schema is up to date");
    Ok(())
}
