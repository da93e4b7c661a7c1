/*
 * Responsibility
 * - Accounts の request/response DTO
 * - validate() で形式チェック (email/password 必須, rights は既知の Role)
 * - password は request のみ。response には出さない
 */
use serde::{Deserialize, Serialize};

use crate::repos::AccountRow;
use crate::services::auth::Role;

#[derive(Debug, Deserialize)]
pub struct AccountRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub rights: String,
}

impl AccountRequest {
    /// Returns the parsed role on success.
    pub fn validate(&self) -> Result<Role, &'static str> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err("email is required");
        }
        if !email.contains('@') {
            return Err("email is invalid");
        }
        if self.password.is_empty() {
            return Err("password is required");
        }
        if email.len() > 320 || self.first_name.len() > 256 || self.last_name.len() > 256 {
            return Err("field too long");
        }

        self.rights.parse().map_err(|_| "rights must be a known role")
    }
}

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub acc_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub rights: String,
}

impl From<AccountRow> for AccountResponse {
    fn from(row: AccountRow) -> Self {
        Self {
            acc_id: row.acc_id.to_string(),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            rights: row.rights,
        }
    }
}
