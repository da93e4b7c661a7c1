/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - access gate はここではなく app.rs で外側の Router に掛ける
 *   (nest 後のフルパスで exempt 判定するため)
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use crate::api::v1::handlers::{
    accounts::{create_account, delete_account, get_account, list_accounts, update_account},
    health::health,
    token::issue_token,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/auth/token", post(issue_token))
        .route("/accounts", get(list_accounts).post(create_account))
        .route(
            "/accounts/{acc_id}",
            get(get_account).put(update_account).delete(delete_account),
        )
}
