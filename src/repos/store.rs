//! Persistence interface consumed by handlers and the authorization check.
use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use crate::repos::error::RepoResult;
use crate::services::auth::role::Role;

/// Account as read back from storage. The password hash never leaves the
/// repository through this type.
#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub acc_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub rights: String,
}

/// Full set of writable columns for create/update.
#[derive(Debug, Clone)]
pub struct AccountDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub rights: Role,
}

/// Account CRUD plus the two lookups the auth layer needs.
///
/// `get` / `list` / `update` / `delete` never see Superuser accounts:
/// those rows are invisible to the account-management API.
///
/// Implementations must be cheap to share (`Arc<dyn AccountStore>`).
#[async_trait]
pub trait AccountStore: Send + Sync + 'static {
    // Current rights text for the account owning `email`, if any.
    async fn role_by_subject(&self, email: &str) -> RepoResult<Option<String>>;

    // Stored PHC password hash for `email`, if any.
    async fn password_hash_by_subject(&self, email: &str) -> RepoResult<Option<String>>;

    async fn get(&self, acc_id: Uuid) -> RepoResult<Option<AccountRow>>;

    async fn list(&self) -> RepoResult<Vec<AccountRow>>;

    async fn create(&self, draft: &AccountDraft) -> RepoResult<AccountRow>;

    // Returns false when no (non-Superuser) row matched.
    async fn update(&self, acc_id: Uuid, draft: &AccountDraft) -> RepoResult<bool>;

    // Returns false when no (non-Superuser) row matched.
    async fn delete(&self, acc_id: Uuid) -> RepoResult<bool>;
}
