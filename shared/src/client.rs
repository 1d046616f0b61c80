//! Client-related types shared between server and client
//!
//! Common request/response types used in API communication between the
//! admin backend and the marquee-client crate.

use crate::models::{EmployeeId, PermissionId};
use serde::{Deserialize, Serialize};

// Re-export ApiResponse from response module
pub use crate::response::ApiResponse;

// =============================================================================
// Role assignment DTOs
// =============================================================================

/// Full-replace payload for a role's permission set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplacePermissionsRequest {
    pub permission_ids: Vec<PermissionId>,
}

/// Batch employee assignment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignEmployeesRequest {
    pub employee_ids: Vec<EmployeeId>,
}

// =============================================================================
// Employee search DTOs
// =============================================================================

/// Employee search query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeSearchQuery {
    pub keyword: String,
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

// =============================================================================
// Current user DTOs
// =============================================================================

/// The logged-in user's identity and effective permission codes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub id: EmployeeId,
    pub username: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}
