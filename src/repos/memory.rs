//! In-memory `AccountStore` used by router-level tests.
//!
//! Mirrors the Postgres repository's visibility rules: Superuser rows are
//! reachable through the subject lookups only.
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};
use crate::repos::store::{AccountDraft, AccountRow, AccountStore};
use crate::services::auth::role::Role;

#[derive(Debug, Clone)]
struct StoredAccount {
    row: AccountRow,
    password_hash: String,
}

impl StoredAccount {
    fn visible(&self) -> bool {
        self.row.rights != Role::Superuser.as_str()
    }
}

#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<Vec<StoredAccount>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed helper; bypasses the email uniqueness check.
    pub async fn insert(&self, draft: AccountDraft) -> AccountRow {
        let row = row_from(Uuid::new_v4(), &draft);
        self.accounts.write().await.push(StoredAccount {
            row: row.clone(),
            password_hash: draft.password_hash,
        });
        row
    }
}

fn row_from(acc_id: Uuid, draft: &AccountDraft) -> AccountRow {
    AccountRow {
        acc_id,
        first_name: draft.first_name.clone(),
        last_name: draft.last_name.clone(),
        email: draft.email.clone(),
        rights: draft.rights.as_str().to_string(),
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn role_by_subject(&self, email: &str) -> RepoResult<Option<String>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .iter()
            .find(|a| a.row.email == email)
            .map(|a| a.row.rights.clone()))
    }

    async fn password_hash_by_subject(&self, email: &str) -> RepoResult<Option<String>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .iter()
            .find(|a| a.row.email == email)
            .map(|a| a.password_hash.clone()))
    }

    async fn get(&self, acc_id: Uuid) -> RepoResult<Option<AccountRow>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .iter()
            .find(|a| a.row.acc_id == acc_id && a.visible())
            .map(|a| a.row.clone()))
    }

    async fn list(&self) -> RepoResult<Vec<AccountRow>> {
        let accounts = self.accounts.read().await;
        let mut rows: Vec<AccountRow> = accounts
            .iter()
            .filter(|a| a.visible())
            .map(|a| a.row.clone())
            .collect();
        rows.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(rows)
    }

    async fn create(&self, draft: &AccountDraft) -> RepoResult<AccountRow> {
        let mut accounts = self.accounts.write().await;
        if accounts.iter().any(|a| a.row.email == draft.email) {
            return Err(RepoError::Conflict);
        }
        let row = row_from(Uuid::new_v4(), draft);
        accounts.push(StoredAccount {
            row: row.clone(),
            password_hash: draft.password_hash.clone(),
        });
        Ok(row)
    }

    async fn update(&self, acc_id: Uuid, draft: &AccountDraft) -> RepoResult<bool> {
        let mut accounts = self.accounts.write().await;
        if accounts
            .iter()
            .any(|a| a.row.email == draft.email && a.row.acc_id != acc_id)
        {
            return Err(RepoError::Conflict);
        }
        match accounts
            .iter_mut()
            .find(|a| a.row.acc_id == acc_id && a.visible())
        {
            Some(account) => {
                account.row = row_from(acc_id, draft);
                account.password_hash = draft.password_hash.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, acc_id: Uuid) -> RepoResult<bool> {
        let mut accounts = self.accounts.write().await;
        let before = accounts.len();
        accounts.retain(|a| !(a.row.acc_id == acc_id && a.visible()));
        Ok(accounts.len() < before)
    }
}
