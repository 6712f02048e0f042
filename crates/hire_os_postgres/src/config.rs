//! Connection configuration from environment variables:
//!   HIRE_OS_DATABASE_URL        — Postgres connection string (required)
//!   HIRE_OS_DB_MAX_CONNECTIONS  — pool size (default: 10)

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub async fn connect_from_env() -> anyhow::Result<PgPool> {
    let database_url =
        std::env::var("HIRE_OS_DATABASE_URL").context("HIRE_OS_DATABASE_URL must be set")?;
    let max_connections: u32 = std::env::var("HIRE_OS_DB_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await
        .context("failed to connect to document store")?;
    tracing::info!("connected to document store");
    Ok(pool)
}

/// Create the documents table if missing. This layer never inserts documents
/// (upstream collaborators own the write path), but deployments need the
/// shape and the containment index in place.
pub async fn ensure_schema(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query("CREATE SCHEMA IF NOT EXISTS hire_os")
        .execute(pool)
        .await?;
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS hire_os.documents (
            seq         bigserial PRIMARY KEY,
            collection  text NOT NULL,
            doc         jsonb NOT NULL,
            created_at  timestamptz NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS documents_doc_idx
        ON hire_os.documents USING gin (doc jsonb_path_ops)
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}
