/*
 * Responsibility
 * - 環境変数からの設定読み込み (DATABASE_URL, AUTH_*, CORS, Superuser seed)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - 起動後は不変 (AppState 側は Arc で共有)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::HeaderName;

use crate::services::auth::token::{DEFAULT_TOKEN_TTL_SECONDS, MAX_TOKEN_TTL_SECONDS};

const DEFAULT_EXEMPT_PATHS: &str = "/api/v1/auth/token,/api/v1/health";
const DEFAULT_SUPERUSER_EMAIL: &str = "superuser@example.com";
const DEV_SUPERUSER_PASSWORD: &str = "admin123";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Access-gate and token settings.
#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub header: HeaderName,
    pub exempt_paths: Vec<String>,
    pub token_ttl_seconds: u64,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the signing secret
        f.debug_struct("AuthConfig")
            .field("header", &self.header)
            .field("exempt_paths", &self.exempt_paths)
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .finish()
    }
}

#[derive(Clone)]
pub struct SuperuserConfig {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SuperuserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuperuserConfig")
            .field("email", &self.email)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub auth: AuthConfig,
    pub superuser: SuperuserConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key -> value source (env in production, a map in tests).
    pub fn from_lookup<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match var("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url = var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let app_env = AppEnv::parse(var("APP_ENV"));

        let cors_allowed_origins = split_list(&var("CORS_ALLOWED_ORIGINS").unwrap_or_default());

        let secret = var("AUTH_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("AUTH_SECRET"))?;

        let header = match var("AUTH_HEADER") {
            Some(raw) => HeaderName::from_bytes(raw.trim().as_bytes())
                .map_err(|_| ConfigError::Invalid("AUTH_HEADER"))?,
            None => axum::http::header::AUTHORIZATION,
        };

        let exempt_paths =
            split_list(&var("AUTH_EXEMPT_PATHS").unwrap_or_else(|| DEFAULT_EXEMPT_PATHS.into()));

        let token_ttl_seconds = match var("TOKEN_TTL_SECONDS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|v| (1..=MAX_TOKEN_TTL_SECONDS).contains(v))
                .ok_or(ConfigError::Invalid("TOKEN_TTL_SECONDS"))?,
            None => DEFAULT_TOKEN_TTL_SECONDS,
        };

        let superuser_email =
            var("SUPERUSER_EMAIL").unwrap_or_else(|| DEFAULT_SUPERUSER_EMAIL.to_string());

        // The well-known dev password must never seed a production database.
        let superuser_password = match var("SUPERUSER_PASSWORD") {
            Some(p) if !p.is_empty() => p,
            _ if app_env.is_production() => {
                return Err(ConfigError::Missing("SUPERUSER_PASSWORD"));
            }
            _ => DEV_SUPERUSER_PASSWORD.to_string(),
        };

        Ok(Self {
            addr,
            database_url,
            app_env,
            cors_allowed_origins,
            auth: AuthConfig {
                secret,
                header,
                exempt_paths,
                token_ttl_seconds,
            },
            superuser: SuperuserConfig {
                email: superuser_email,
                password: superuser_password,
            },
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    const BASE: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://localhost/accounts"),
        ("AUTH_SECRET", "s3cret"),
    ];

    #[test]
    fn defaults() {
        let config = load(&BASE).unwrap();
        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.auth.header, axum::http::header::AUTHORIZATION);
        assert_eq!(
            config.auth.exempt_paths,
            vec!["/api/v1/auth/token".to_string(), "/api/v1/health".to_string()]
        );
        assert_eq!(config.auth.token_ttl_seconds, 24 * 60 * 60);
        assert_eq!(config.superuser.email, "superuser@example.com");
        assert_eq!(config.superuser.password, "admin123");
    }

    #[test]
    fn secret_is_required_and_non_empty() {
        assert_eq!(
            load(&[("DATABASE_URL", "postgres://x")]).unwrap_err(),
            ConfigError::Missing("AUTH_SECRET")
        );
        assert_eq!(
            load(&[("DATABASE_URL", "postgres://x"), ("AUTH_SECRET", "  ")]).unwrap_err(),
            ConfigError::Missing("AUTH_SECRET")
        );
    }

    #[test]
    fn custom_header_and_exemptions() {
        let mut pairs = BASE.to_vec();
        pairs.push(("AUTH_HEADER", "X-Access-Token"));
        pairs.push(("AUTH_EXEMPT_PATHS", " /login , ,/status "));
        let config = load(&pairs).unwrap();

        assert_eq!(config.auth.header.as_str(), "x-access-token");
        assert_eq!(config.auth.exempt_paths, vec!["/login", "/status"]);
    }

    #[test]
    fn rejects_unusable_values() {
        let mut pairs = BASE.to_vec();
        pairs.push(("AUTH_HEADER", "not a header"));
        assert_eq!(load(&pairs).unwrap_err(), ConfigError::Invalid("AUTH_HEADER"));

        let mut pairs = BASE.to_vec();
        pairs.push(("TOKEN_TTL_SECONDS", "0"));
        assert_eq!(
            load(&pairs).unwrap_err(),
            ConfigError::Invalid("TOKEN_TTL_SECONDS")
        );

        let mut pairs = BASE.to_vec();
        pairs.push(("PORT", "http"));
        assert_eq!(load(&pairs).unwrap_err(), ConfigError::Invalid("PORT"));
    }

    #[test]
    fn production_needs_an_explicit_superuser_password() {
        let mut pairs = BASE.to_vec();
        pairs.push(("APP_ENV", "prod"));
        assert_eq!(
            load(&pairs).unwrap_err(),
            ConfigError::Missing("SUPERUSER_PASSWORD")
        );

        pairs.push(("SUPERUSER_PASSWORD", "correct horse"));
        let config = load(&pairs).unwrap();
        assert!(config.app_env.is_production());
        assert_eq!(config.superuser.password, "correct horse");
    }

    #[test]
    fn debug_hides_secrets() {
        let mut pairs = BASE.to_vec();
        pairs.push(("SUPERUSER_PASSWORD", "hunter2"));
        let rendered = format!("{:?}", load(&pairs).unwrap());
        assert!(!rendered.contains("s3cret"));
        assert!(!rendered.contains("hunter2"));
    }
}
