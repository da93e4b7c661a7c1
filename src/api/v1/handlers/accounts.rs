/*
 * Responsibility
 * - /accounts 系 CRUD handler (Superuser のみ)
 * - 順序: Identity (extractor) → authorize → body decode / validation → repo
 *   body より先に権限を見るので、権限のない呼び出しは常に 401
 * - Superuser 行は repo 側で見えない (404 扱い)
 * - 付与できる rights は呼び出し元より下の tier のみ
 */
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::accounts::{AccountRequest, AccountResponse},
        extractors::Authenticated,
    },
    error::{AppError, ErrorKind},
    repos::AccountDraft,
    services::auth::{Role, authorize, password},
    state::AppState,
};

const REQUIRED_TIER: Role = Role::Superuser;

const NOT_FOUND: &str = "account not found";

pub async fn list_accounts(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
) -> Result<Json<Vec<AccountResponse>>, AppError> {
    authorize(state.accounts.as_ref(), &identity, REQUIRED_TIER).await?;

    let rows = state
        .accounts
        .list()
        .await
        .map_err(|e| AppError::from_repo(e, "couldn't retrieve accounts"))?;

    Ok(Json(rows.into_iter().map(AccountResponse::from).collect()))
}

pub async fn get_account(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(acc_id): Path<String>,
) -> Result<Json<AccountResponse>, AppError> {
    authorize(state.accounts.as_ref(), &identity, REQUIRED_TIER).await?;
    let acc_id = parse_id(&acc_id)?;

    let row = state
        .accounts
        .get(acc_id)
        .await
        .map_err(|e| AppError::from_repo(e, "couldn't retrieve account"))?
        .ok_or_else(|| AppError::not_found(NOT_FOUND))?;

    Ok(Json(row.into()))
}

pub async fn create_account(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    body: Bytes,
) -> Result<Json<AccountResponse>, AppError> {
    let caller = authorize(state.accounts.as_ref(), &identity, REQUIRED_TIER).await?;
    let draft = draft_from(&body, caller)?;

    let row = state
        .accounts
        .create(&draft)
        .await
        .map_err(|e| AppError::from_repo(e, "couldn't create account"))?;

    tracing::info!(acc_id = %row.acc_id, by = %identity.subject, "account created");
    Ok(Json(row.into()))
}

pub async fn update_account(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(acc_id): Path<String>,
    body: Bytes,
) -> Result<Json<&'static str>, AppError> {
    let caller = authorize(state.accounts.as_ref(), &identity, REQUIRED_TIER).await?;
    let acc_id = parse_id(&acc_id)?;
    let draft = draft_from(&body, caller)?;

    let updated = state
        .accounts
        .update(acc_id, &draft)
        .await
        .map_err(|e| AppError::from_repo(e, "couldn't update account"))?;
    if !updated {
        return Err(AppError::not_found(NOT_FOUND));
    }

    tracing::info!(acc_id = %acc_id, by = %identity.subject, "account updated");
    Ok(Json("Account updated successfully"))
}

pub async fn delete_account(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(acc_id): Path<String>,
) -> Result<Json<&'static str>, AppError> {
    authorize(state.accounts.as_ref(), &identity, REQUIRED_TIER).await?;
    let acc_id = parse_id(&acc_id)?;

    let deleted = state
        .accounts
        .delete(acc_id)
        .await
        .map_err(|e| AppError::from_repo(e, "couldn't delete account"))?;
    if !deleted {
        return Err(AppError::not_found(NOT_FOUND));
    }

    tracing::info!(acc_id = %acc_id, by = %identity.subject, "account deleted");
    Ok(Json("Account deleted successfully"))
}

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::validation("invalid account id"))
}

/// Decode + validate a create/update body and hash its password.
fn draft_from(body: &[u8], caller: Role) -> Result<AccountDraft, AppError> {
    let req: AccountRequest = serde_json::from_slice(body)
        .map_err(|e| AppError::serialization(e, "failed to decode account request"))?;
    let rights = req.validate().map_err(AppError::validation)?;
    if !caller.outranks(rights) {
        return Err(AppError::validation("rights must rank below the caller"));
    }

    let password_hash = password::hash(&req.password)
        .map_err(|e| AppError::wrap(ErrorKind::Persistence, e, "failed to hash password"))?;

    Ok(AccountDraft {
        first_name: req.first_name.trim().to_string(),
        last_name: req.last_name.trim().to_string(),
        email: req.email.trim().to_string(),
        password_hash,
        rights,
    })
}
