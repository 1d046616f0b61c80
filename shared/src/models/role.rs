//! Role Model

use super::permission::{Permission, PermissionId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Role ID type
pub type RoleId = i64;

/// Role entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    #[serde(rename = "role_id")]
    pub id: RoleId,
    pub role_name: String,
    pub role_code: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Permissions currently granted to this role
    #[serde(default)]
    pub permissions: Vec<Permission>,
    /// When true every employee implicitly holds this role,
    /// without an explicit assignment row
    #[serde(default)]
    pub applying_to_all: bool,
}

impl Role {
    /// Ids of the persisted permissions granted to this role
    pub fn permission_ids(&self) -> HashSet<PermissionId> {
        self.permissions.iter().filter_map(|p| p.id).collect()
    }
}

/// Create role payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleCreate {
    pub role_name: String,
    pub role_code: String,
    pub description: Option<String>,
}

/// Update role payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applying_to_all: Option<bool>,
}
