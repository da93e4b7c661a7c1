/*
 * Responsibility
 * - 認証済み主体 (Identity) の型
 * - access gate が検証して request extensions に格納し、handler は extractor 経由で受け取る
 *
 * Notes
 * - role は載せない (毎リクエスト DB から引き直す)
 */
use chrono::{DateTime, Utc};

use crate::services::auth::token::VerifiedToken;

/// The authenticated caller for the lifetime of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub expires_at: DateTime<Utc>,
}

impl Identity {
    pub fn new(subject: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            subject: subject.into(),
            expires_at,
        }
    }
}

impl From<VerifiedToken> for Identity {
    fn from(v: VerifiedToken) -> Self {
        Self::new(v.subject, v.expires_at)
    }
}
