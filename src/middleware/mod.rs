/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth::gate::apply(...), cors::apply(...), http::apply(...) など
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
