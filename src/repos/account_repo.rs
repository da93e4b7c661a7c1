/*
 * Responsibility
 * - accounts テーブル向け SQLx 操作 (AccountStore の Postgres 実装)
 * - Superuser 行は get/list/update/delete の対象外
 * - DB エラーは RepoError に変換して返す
 */
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::repos::error::RepoResult;
use crate::repos::store::{AccountDraft, AccountRow, AccountStore};
use crate::services::auth::role::Role;

#[derive(Clone, Debug)]
pub struct PgAccountRepo {
    pool: PgPool,
}

impl PgAccountRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn protected() -> &'static str {
    Role::Superuser.as_str()
}

#[async_trait]
impl AccountStore for PgAccountRepo {
    async fn role_by_subject(&self, email: &str) -> RepoResult<Option<String>> {
        let rights = sqlx::query_scalar::<_, String>(
            r#"
            SELECT rights
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rights)
    }

    async fn password_hash_by_subject(&self, email: &str) -> RepoResult<Option<String>> {
        let hash = sqlx::query_scalar::<_, String>(
            r#"
            SELECT password
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(hash)
    }

    async fn get(&self, acc_id: Uuid) -> RepoResult<Option<AccountRow>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT acc_id, first_name, last_name, email, rights
            FROM accounts
            WHERE acc_id = $1 AND rights <> $2
            "#,
        )
        .bind(acc_id)
        .bind(protected())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list(&self) -> RepoResult<Vec<AccountRow>> {
        let rows = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT acc_id, first_name, last_name, email, rights
            FROM accounts
            WHERE rights <> $1
            ORDER BY email
            "#,
        )
        .bind(protected())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn create(&self, draft: &AccountDraft) -> RepoResult<AccountRow> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (first_name, last_name, email, password, rights)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING acc_id, first_name, last_name, email, rights
            "#,
        )
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(&draft.email)
        .bind(&draft.password_hash)
        .bind(draft.rights.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, acc_id: Uuid, draft: &AccountDraft) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET
                first_name = $1,
                last_name = $2,
                email = $3,
                password = $4,
                rights = $5
            WHERE acc_id = $6 AND rights <> $7
            "#,
        )
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(&draft.email)
        .bind(&draft.password_hash)
        .bind(draft.rights.as_str())
        .bind(acc_id)
        .bind(protected())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, acc_id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM accounts
            WHERE acc_id = $1 AND rights <> $2
            "#,
        )
        .bind(acc_id)
        .bind(protected())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
