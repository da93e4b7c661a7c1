//! Access gate: token verification in front of every non-exempt route.
//!
//! - 除外パス (ExemptionSet) は検証せずそのまま通す
//! - それ以外は設定されたヘッダから token を読み、検証して Identity を extensions に入れる
//! - 失敗時は理由に関わらず固定の `403 Permission denied` (plain text) を返す
//!   理由は warn ログにだけ残す
//!
//! The gate is applied to the outer router (after `/api/v1` is nested) so the
//! exemption check sees the full request path.

use std::{fmt, sync::Arc};

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderName, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use crate::services::auth::{
    identity::Identity,
    token::{TokenError, VerifiedToken},
};
use crate::state::AppState;

const DENIED_BODY: &str = "Permission denied";
const BEARER_SCHEME: &str = "Bearer";

/// Immutable list of request paths that bypass the gate. Exact match.
#[derive(Debug, Clone)]
pub struct ExemptionSet(Arc<[String]>);

impl ExemptionSet {
    pub fn new(paths: impl IntoIterator<Item = String>) -> Self {
        Self(paths.into_iter().collect())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.iter().any(|p| p == path)
    }
}

#[derive(Debug)]
pub enum DenyReason {
    MissingCredential,
    InvalidToken(TokenError),
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::MissingCredential => f.write_str("credential header missing or empty"),
            DenyReason::InvalidToken(e) => write!(f, "token rejected: {}", e),
        }
    }
}

#[derive(Debug)]
pub enum GateDecision {
    Exempt,
    Deny(DenyReason),
    Admit(Identity),
}

#[derive(Debug, Clone)]
pub struct AccessGate {
    header: HeaderName,
    exemptions: ExemptionSet,
}

impl AccessGate {
    pub fn new(header: HeaderName, exemptions: ExemptionSet) -> Self {
        Self { header, exemptions }
    }

    /// Decide what to do with one request. `verify` is only called for
    /// non-exempt paths that actually carry a credential.
    pub fn decide<F>(&self, path: &str, headers: &HeaderMap, verify: F) -> GateDecision
    where
        F: FnOnce(&str) -> Result<VerifiedToken, TokenError>,
    {
        if self.exemptions.contains(path) {
            return GateDecision::Exempt;
        }

        let Some(token) = self.credential(headers) else {
            return GateDecision::Deny(DenyReason::MissingCredential);
        };

        match verify(token) {
            Ok(verified) => GateDecision::Admit(verified.into()),
            Err(e) => GateDecision::Deny(DenyReason::InvalidToken(e)),
        }
    }

    fn credential<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        let raw = headers.get(&self.header)?.to_str().ok()?.trim();
        // "Bearer" alone (trailing space already trimmed) carries no token
        let token = match raw.strip_prefix(BEARER_SCHEME) {
            Some(rest) if rest.is_empty() || rest.starts_with(' ') => rest.trim(),
            _ => raw,
        };
        (!token.is_empty()).then_some(token)
    }
}

/// Put the gate in front of every route of `router`.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // from_fn は State を受け取れないので from_fn_with_state で渡す
    router.layer(middleware::from_fn_with_state(state, access_gate))
}

async fn access_gate(State(state): State<AppState>, mut req: Request<Body>, next: Next) -> Response {
    let decision = state
        .gate
        .decide(req.uri().path(), req.headers(), |token| {
            state.tokens.verify(token)
        });

    match decision {
        GateDecision::Exempt => next.run(req).await,
        GateDecision::Admit(identity) => {
            tracing::debug!(
                subject = %identity.subject,
                expires_at = %identity.expires_at,
                "access granted"
            );
            // middleware → extractor への受け渡し
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        GateDecision::Deny(reason) => {
            tracing::warn!(
                method = %req.method(),
                path = %req.uri().path(),
                reason = %reason,
                "access denied"
            );
            denied()
        }
    }
}

fn denied() -> Response {
    (StatusCode::FORBIDDEN, DENIED_BODY).into_response()
}
