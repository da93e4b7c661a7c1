use tracing::{debug, warn};

use crate::error::{AppError, ErrorKind};
use crate::repos::store::AccountStore;
use crate::services::auth::{identity::Identity, role::Role};

/// Per-operation role check.
///
/// - The role is read from storage on every call, never from the token, so a
///   changed or revoked role applies to the next request.
/// - Exact match: only `required` itself is granted, and the stored rights
///   text must be the canonical role name.
/// - Fails closed: missing account, unreadable role text and lookup errors
///   are all authorization failures.
///
/// Only returns the failure; the response is written by `AppError`.
pub async fn authorize(
    accounts: &dyn AccountStore,
    identity: &Identity,
    required: Role,
) -> Result<Role, AppError> {
    let rights = accounts
        .role_by_subject(&identity.subject)
        .await
        .map_err(|e| {
            AppError::wrap(ErrorKind::Authorization, e, "couldn't find role for account")
        })?
        .ok_or_else(|| AppError::authorization("couldn't find role for account"))?;

    // Stored text must match exactly; "SUPERUSER" is not Superuser.
    let role = Role::from_stored(&rights).map_err(|e| {
        warn!(subject = %identity.subject, error = %e, "account carries an unknown role");
        AppError::wrap(ErrorKind::Authorization, e, "Permission denied")
    })?;

    if role != required {
        debug!(subject = %identity.subject, role = %role, required = %required, "role check denied");
        return Err(AppError::authorization("Permission denied"));
    }

    Ok(role)
}
