/*!
 * Request extractors
 *
 * - Authenticated: access gate が extensions に入れた Identity を handler に渡す
 */
mod identity;

pub use identity::Authenticated;
