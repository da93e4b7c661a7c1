/*
 * Responsibility
 * - POST /auth/token (exempt path)
 * - email/password を検証 → 保存済み hash と照合 → TokenCodec で発行
 * - email 不在と password 不一致は同じ 401 を返す
 */
use axum::{Json, body::Bytes, extract::State};

use crate::{
    api::v1::dto::token::{SignInRequest, TokenResponse},
    error::{AppError, ErrorKind},
    services::auth::password,
    state::AppState,
};

const INVALID_CREDENTIALS: &str = "invalid email or password";

pub async fn issue_token(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TokenResponse>, AppError> {
    let req: SignInRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::serialization(e, "failed to decode sign-in request"))?;
    req.validate().map_err(AppError::validation)?;

    let email = req.email.trim();

    let stored = state
        .accounts
        .password_hash_by_subject(email)
        .await
        .map_err(|e| AppError::from_repo(e, "couldn't retrieve account credentials"))?
        .ok_or_else(|| AppError::authorization(INVALID_CREDENTIALS))?;

    let matches = password::verify(&req.password, &stored).map_err(|e| {
        AppError::wrap(ErrorKind::Persistence, e, "stored credentials are unreadable")
    })?;
    if !matches {
        return Err(AppError::authorization(INVALID_CREDENTIALS));
    }

    let token = state.tokens.issue(email)?;
    tracing::info!(subject = %email, "token issued");

    Ok(Json(TokenResponse { token }))
}
