//! User domain types.

use serde::{Deserialize, Serialize};

/// Permission level carried in the gateway's role header.
///
/// Wire format: `u8` (0 = Normal, 1 = Staff, 2 = Admin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Normal = 0,
    Staff = 1,
    Admin = 2,
}

impl UserRole {
    /// Convert from the `u8` wire value. Unknown values map to `None`.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Normal),
            1 => Some(Self::Staff),
            2 => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Admins may edit or delete any recipe and create user profiles.
    pub fn is_admin(self) -> bool {
        self >= Self::Admin
    }
}

/// Validate a username: 1–150 chars of letters, digits and `@.+-_`.
pub fn validate_username(username: &str) -> bool {
    if username.is_empty() || username.chars().count() > 150 {
        return false;
    }
    username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}
