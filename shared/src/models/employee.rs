//! Employee Model
//!
//! The subset of the HR employee record the role-assignment screen needs.

use serde::{Deserialize, Serialize};

/// Employee ID type
pub type EmployeeId = i64;

/// Employee entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "employee_id")]
    pub id: EmployeeId,
    pub username: String,
    #[serde(rename = "employee_name")]
    pub display_name: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}
