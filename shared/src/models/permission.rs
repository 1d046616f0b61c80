//! Permission Model

use crate::rbac::PermissionCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Permission ID type
pub type PermissionId = i64;

/// What a permission protects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    Page,
    Section,
    Action,
}

/// What a permission allows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    View,
    Operate,
}

/// Permission entity
///
/// `id` is `None` only for virtual placeholders synthesized on the client
/// from the navigation menu; every record returned by the backend carries
/// a server-assigned id. A virtual permission is never sent back to the
/// server as an update target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    #[serde(rename = "permission_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<PermissionId>,
    #[serde(rename = "permission_name")]
    pub name: String,
    #[serde(rename = "permission_code")]
    pub code: PermissionCode,
    pub resource_type: ResourceType,
    pub action_type: ActionType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl Permission {
    /// Whether this record exists on the server
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// Create permission payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionCreate {
    #[serde(rename = "permission_name")]
    pub name: String,
    #[serde(rename = "permission_code")]
    pub code: PermissionCode,
    pub resource_type: ResourceType,
    pub action_type: ActionType,
    pub description: Option<String>,
}

/// Update permission payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermissionUpdate {
    #[serde(rename = "permission_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "permission_code", skip_serializing_if = "Option::is_none")]
    pub code: Option<PermissionCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
