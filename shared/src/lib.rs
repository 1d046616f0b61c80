//! Shared types for the Marquee platform
//!
//! Common types used across multiple crates: domain models, the
//! permission-code grammar, the navigation-driven permission tree,
//! API response structures and error codes.

pub mod client;
pub mod error;
pub mod models;
pub mod rbac;
pub mod response;

// Re-exports
pub use serde::{Deserialize, Serialize};

// RBAC re-exports (for convenient access)
pub use rbac::{MenuCatalog, MenuEntry, PermissionCode, PermissionTree, build_permission_tree};
