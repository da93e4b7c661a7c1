/*
 * Responsibility
 * - Closed failure taxonomy (ErrorKind) shared by every layer
 * - AppError = kind + message + optional wrapped cause
 * - IntoResponse: the only place a failure becomes an HTTP status/body
 *
 * Only Validation / NotFound / Authorization echo their message.
 * Everything else is flattened to a generic 500 so SQL text or
 * library internals never reach the client.
 */
use std::{error::Error as StdError, fmt};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::repos::error::RepoError;
use crate::services::auth::token::TokenError;

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Connection,
    Schema,
    AdminBootstrap,
    Persistence,
    Validation,
    NotFound,
    Authorization,
    TokenGeneration,
    Serialization,
}

impl ErrorKind {
    /// Kind -> status. Checked in a fixed order; kinds never overlap.
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Authorization => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the failure message is safe to send back verbatim.
    pub fn exposes_message(self) -> bool {
        !self.status().is_server_error()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Connection => "connection_failure",
            ErrorKind::Schema => "schema_failure",
            ErrorKind::AdminBootstrap => "admin_bootstrap_failure",
            ErrorKind::Persistence => "persistence_failure",
            ErrorKind::Validation => "validation_failure",
            ErrorKind::NotFound => "not_found_failure",
            ErrorKind::Authorization => "authorization_failure",
            ErrorKind::TokenGeneration => "token_generation_failure",
            ErrorKind::Serialization => "serialization_failure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
    source: Option<BoxError>,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn wrap(kind: ErrorKind, source: impl Into<BoxError>, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authorization, message)
    }

    pub fn serialization(source: impl Into<BoxError>, message: impl Into<String>) -> Self {
        Self::wrap(ErrorKind::Serialization, source, message)
    }

    /// Repository failures carry the caller's context; a unique-key
    /// violation is the client's fault, everything else is ours.
    pub fn from_repo(e: RepoError, context: &str) -> Self {
        match e {
            RepoError::Conflict => {
                Self::wrap(ErrorKind::Validation, e, "account with this email already exists")
            }
            other => Self::wrap(ErrorKind::Persistence, other, context),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(cause) => write!(f, "{}: {}", self.message, cause),
            None => f.write_str(&self.message),
        }
    }
}

impl StdError for AppError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.kind.status();

        let error = if self.kind.exposes_message() {
            tracing::warn!(kind = %self.kind, error = %self, "request failed");
            self.message
        } else {
            tracing::error!(kind = %self.kind, error = %self, "internal server error");
            INTERNAL_MESSAGE.to_string()
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Signing(_) => {
                AppError::wrap(ErrorKind::TokenGeneration, e, "failed to generate token")
            }
            // Verification failures; the access gate answers these itself,
            // this arm only matters if a handler verifies a token directly.
            _ => AppError::wrap(ErrorKind::Authorization, e, "invalid token"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn only_three_kinds_escape_the_500_bucket() {
        let all = [
            ErrorKind::Connection,
            ErrorKind::Schema,
            ErrorKind::AdminBootstrap,
            ErrorKind::Persistence,
            ErrorKind::Validation,
            ErrorKind::NotFound,
            ErrorKind::Authorization,
            ErrorKind::TokenGeneration,
            ErrorKind::Serialization,
        ];
        for kind in all {
            let expected = match kind {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Authorization => StatusCode::UNAUTHORIZED,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            assert_eq!(kind.status(), expected, "{kind}");
        }
    }

    #[tokio::test]
    async fn client_errors_echo_the_message() {
        let (status, body) = body_of(AppError::validation("email or password is missing")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "email or password is missing");

        let (status, body) = body_of(AppError::not_found("account not found")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "account not found");

        let (status, body) = body_of(AppError::authorization("Permission denied")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Permission denied");
    }

    #[tokio::test]
    async fn internal_errors_hide_the_message_and_cause() {
        let cause = std::io::Error::other("relation \"accounts\" does not exist");
        let err = AppError::wrap(ErrorKind::Persistence, cause, "couldn't retrieve accounts");

        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "error": "Internal server error" }));
    }

    #[test]
    fn wrapped_cause_is_reachable_through_source() {
        let cause = std::io::Error::other("boom");
        let err = AppError::serialization(cause, "failed to decode JSON body");

        assert_eq!(err.kind(), ErrorKind::Serialization);
        assert_eq!(err.message(), "failed to decode JSON body");
        assert_eq!(err.source().map(|e| e.to_string()).as_deref(), Some("boom"));
        assert_eq!(err.to_string(), "failed to decode JSON body: boom");
    }

    #[test]
    fn repo_conflict_is_a_validation_failure() {
        let err = AppError::from_repo(RepoError::Conflict, "failed to create account");
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = AppError::from_repo(
            RepoError::Db(sqlx::Error::RowNotFound),
            "failed to create account",
        );
        assert_eq!(err.kind(), ErrorKind::Persistence);
        assert_eq!(err.message(), "failed to create account");
    }
}
