pub mod account_repo;
pub mod bootstrap;
pub mod error;
#[cfg(test)]
pub mod memory;
pub mod store;

pub use account_repo::PgAccountRepo;
pub use store::{AccountDraft, AccountRow, AccountStore};
