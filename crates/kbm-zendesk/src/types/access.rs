//! Guide access-control types.

use serde::Deserialize;

/// Permission group (who may edit articles).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PermissionGroup {
    /// Permission group ID.
    pub id: u64,
    /// Display name.
    pub name: String,
}

/// User segment (who may view articles).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserSegment {
    /// User segment ID.
    pub id: u64,
    /// Display name.
    pub name: String,
}
