//! Marquee Client - HTTP client for the admin backend
//!
//! Provides the typed admin API (roles, permissions, employee
//! assignments) and the role-editor reconciliation logic on top of it.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod rbac;

pub use api::{AdminApi, RestAdminApi};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use rbac::{PermissionDraft, RoleEditor, SaveError, SaveReport, SaveStep, SubItemKind};

// Re-export shared types for convenience
pub use shared::client::{CurrentUserResponse, EmployeeSearchQuery};
pub use shared::models::{Employee, Permission, Role};
pub use shared::rbac::{MenuCatalog, MenuEntry, PermissionCode};
