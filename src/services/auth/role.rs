//! Account privilege tiers.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Privilege tiers, highest authority first.
///
/// - `Superuser` (Tier0) - account management
/// - `Admin` (Tier1)
/// - `Moderator` (Tier2)
/// - `Reader` (Tier3)
///
/// Stored on the account row as its `as_str()` text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Superuser,
    Admin,
    Moderator,
    Reader,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 4] = [Role::Superuser, Role::Admin, Role::Moderator, Role::Reader];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Superuser => "Superuser",
            Role::Admin => "Admin",
            Role::Moderator => "Moderator",
            Role::Reader => "Reader",
        }
    }

    /// 0 = highest authority.
    pub fn tier(self) -> u8 {
        match self {
            Role::Superuser => 0,
            Role::Admin => 1,
            Role::Moderator => 2,
            Role::Reader => 3,
        }
    }

    pub fn outranks(self, other: Role) -> bool {
        self.tier() < other.tier()
    }

    /// Exact match against the canonical `as_str()` text. Used for rights
    /// read back from storage; `FromStr` is the lenient form for request input.
    pub fn from_stored(text: &str) -> Result<Self, UnknownRole> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == text)
            .ok_or_else(|| UnknownRole(text.to_string()))
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_ordered_from_superuser_down() {
        assert!(Role::Superuser.outranks(Role::Admin));
        assert!(Role::Admin.outranks(Role::Moderator));
        assert!(Role::Moderator.outranks(Role::Reader));
        assert!(!Role::Reader.outranks(Role::Reader));
        assert!(!Role::Reader.outranks(Role::Superuser));
    }

    #[test]
    fn parses_stored_text() {
        assert_eq!("Superuser".parse::<Role>(), Ok(Role::Superuser));
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(" READER ".parse::<Role>(), Ok(Role::Reader));
        assert_eq!(
            "Owner".parse::<Role>(),
            Err(UnknownRole("Owner".to_string()))
        );
    }

    #[test]
    fn stored_text_must_be_canonical() {
        assert_eq!(Role::from_stored("Superuser"), Ok(Role::Superuser));
        assert_eq!(Role::from_stored("Reader"), Ok(Role::Reader));
        for text in [" superuser ", "SUPERUSER", "superuser", "Superuser "] {
            assert_eq!(
                Role::from_stored(text),
                Err(UnknownRole(text.to_string())),
                "{text:?}"
            );
        }
    }

    #[test]
    fn text_round_trips() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>(), Ok(role));
        }
    }
}
