//! Startup-time database preparation: pool, table, Superuser row.
//!
//! Each step fails with its own kind so `app::run` can tell an unreachable
//! database apart from a broken schema or a failed Superuser seed.
use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::info;

use crate::error::{AppError, ErrorKind};
use crate::services::auth::{password, role::Role};

pub async fn connect(database_url: &str) -> Result<PgPool, AppError> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .map_err(|e| AppError::wrap(ErrorKind::Connection, e, "failed to connect to database"))
}

pub async fn ensure_schema(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS accounts (
            acc_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            first_name TEXT NOT NULL DEFAULT '',
            last_name TEXT NOT NULL DEFAULT '',
            email TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL,
            rights TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| AppError::wrap(ErrorKind::Schema, e, "failed to create accounts table"))?;

    Ok(())
}

/// Insert the Superuser account unless an account with `email` exists.
pub async fn ensure_superuser(pool: &PgPool, email: &str, password: &str) -> Result<(), AppError> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (SELECT 1 FROM accounts WHERE email = $1)
        "#,
    )
    .bind(email)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        AppError::wrap(
            ErrorKind::AdminBootstrap,
            e,
            "error checking if superuser account exists",
        )
    })?;

    if exists {
        return Ok(());
    }

    let password_hash = password::hash(password).map_err(|e| {
        AppError::wrap(ErrorKind::AdminBootstrap, e, "failed to hash superuser password")
    })?;

    sqlx::query(
        r#"
        INSERT INTO accounts (first_name, last_name, email, password, rights)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind("SuperUser")
    .bind("")
    .bind(email)
    .bind(password_hash)
    .bind(Role::Superuser.as_str())
    .execute(pool)
    .await
    .map_err(|e| {
        AppError::wrap(ErrorKind::AdminBootstrap, e, "error creating superuser account")
    })?;

    info!(email = %email, "superuser account created");
    Ok(())
}
