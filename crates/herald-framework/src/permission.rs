//! Permission levels.

use std::fmt;

/// The access class a command declares.
///
/// Levels are written as integers in command declarations (`1`, `2`, `3`).
/// Any other value is kept as [`Malformed`](Self::Malformed) so the defect is
/// visible at authorization time instead of silently falling through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionLevel {
    /// Level 1: everyone.
    Public,
    /// Level 2: managers, the owner, and privileged users.
    Elevated,
    /// Level 3: the owner and privileged users.
    OwnerOnly,
    /// Any value outside 1..=3, as declared.
    Malformed(i64),
}

impl PermissionLevel {
    /// Returns the declared numeric value.
    pub fn value(&self) -> i64 {
        match self {
            Self::Public => 1,
            Self::Elevated => 2,
            Self::OwnerOnly => 3,
            Self::Malformed(v) => *v,
        }
    }

    /// Returns `true` for [`Malformed`](Self::Malformed).
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}

impl From<i64> for PermissionLevel {
    fn from(value: i64) -> Self {
        match value {
            1 => Self::Public,
            2 => Self::Elevated,
            3 => Self::OwnerOnly,
            other => Self::Malformed(other),
        }
    }
}

impl From<i32> for PermissionLevel {
    fn from(value: i32) -> Self {
        Self::from(i64::from(value))
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Elevated => write!(f, "elevated"),
            Self::OwnerOnly => write!(f, "owner-only"),
            Self::Malformed(v) => write!(f, "malformed({v})"),
        }
    }
}
