/*
 * Responsibility
 * - POST /auth/token の request/response DTO
 */
use serde::{Deserialize, Serialize};

/// Missing fields deserialize as empty so the handler can answer 400
/// instead of failing in the JSON decoder.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl SignInRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err("email or password is missing");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
