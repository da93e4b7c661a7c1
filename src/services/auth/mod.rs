pub mod authorize;
pub mod identity;
pub mod password;
pub mod role;
pub mod token;

pub use authorize::authorize;
pub use identity::Identity;
pub use role::Role;
pub use token::{TokenCodec, TokenError};
