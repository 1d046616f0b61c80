//! RBAC domain logic
//!
//! The permission-code grammar, the navigation catalog and the tree
//! builder that merges both into the structure the admin screen edits.

pub mod code;
pub mod menu;
pub mod tree;

// Re-exports
pub use code::{PermissionCode, UNKNOWN_PARENT};
pub use menu::{MenuCatalog, MenuEntry, MenuError, page_id};
pub use tree::{NodeKind, PermissionNode, PermissionTree, build_permission_tree};
