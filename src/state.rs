/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - accounts: 永続化 (AccountStore), tokens: TokenCodec, gate: AccessGate
 * - Clone 前提で持つ (内部は Arc なので cheap)
 * - 起動後は read-only
 */
use std::sync::Arc;

use crate::middleware::auth::AccessGate;
use crate::repos::AccountStore;
use crate::services::auth::TokenCodec;

#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountStore>,
    pub tokens: Arc<TokenCodec>,
    pub gate: Arc<AccessGate>,
}

impl AppState {
    pub fn new(accounts: Arc<dyn AccountStore>, tokens: TokenCodec, gate: AccessGate) -> Self {
        Self {
            accounts,
            tokens: Arc::new(tokens),
            gate: Arc::new(gate),
        }
    }
}
