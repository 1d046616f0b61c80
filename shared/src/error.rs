//! Unified error codes for the Marquee platform
//!
//! Error codes shared between the backend and its clients, organized
//! by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 8xxx: Employee/role errors
//! - 9xxx: System errors

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 values for efficient serialization and
/// cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 8xxx: Employee/Role ====================
    /// Employee not found
    EmployeeNotFound = 8001,
    /// Role not found
    RoleNotFound = 8002,
    /// Role is still assigned to employees
    RoleInUse = 8003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
}

impl ErrorCode {
    /// Default message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::NotAuthenticated => "Not authenticated",
            Self::TokenExpired => "Token has expired",
            Self::TokenInvalid => "Token is invalid",
            Self::PermissionDenied => "Permission denied",
            Self::AdminRequired => "Admin role required",
            Self::EmployeeNotFound => "Employee not found",
            Self::RoleNotFound => "Role not found",
            Self::RoleInUse => "Role is still assigned to employees",
            Self::InternalError => "Internal server error",
        }
    }

    /// String form used in API response envelopes (e.g. `E2001`)
    pub fn api_code(&self) -> String {
        format!("E{:04}", *self as u16)
    }

    /// Parse the envelope string form back into a code
    pub fn from_api_code(code: &str) -> Option<Self> {
        let digits = code.strip_prefix('E')?;
        let value: u16 = digits.parse().ok()?;
        Self::try_from(value).ok()
    }

    /// Whether this code denotes a missing permission
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::AdminRequired)
    }

    /// HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,
            Self::ValidationFailed | Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::EmployeeNotFound | Self::RoleNotFound => StatusCode::NOT_FOUND,
            Self::AlreadyExists | Self::RoleInUse => StatusCode::CONFLICT,
            Self::NotAuthenticated | Self::TokenExpired | Self::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }
            Self::PermissionDenied | Self::AdminRequired => StatusCode::FORBIDDEN,
            Self::Unknown | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> u16 {
        code as u16
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Success),
            1 => Ok(Self::Unknown),
            2 => Ok(Self::ValidationFailed),
            3 => Ok(Self::NotFound),
            4 => Ok(Self::AlreadyExists),
            5 => Ok(Self::InvalidRequest),
            1001 => Ok(Self::NotAuthenticated),
            1003 => Ok(Self::TokenExpired),
            1004 => Ok(Self::TokenInvalid),
            2001 => Ok(Self::PermissionDenied),
            2003 => Ok(Self::AdminRequired),
            8001 => Ok(Self::EmployeeNotFound),
            8002 => Ok(Self::RoleNotFound),
            8003 => Ok(Self::RoleInUse),
            9001 => Ok(Self::InternalError),
            other => Err(format!("unknown error code: {}", other)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), *self as u16)
    }
}
