//! RBAC editing workflows
//!
//! The role editor (pending-edit reconciliation and the ordered save
//! pipeline), permission drafts for the sub-item dialog, and the
//! stale-fetch guard.

pub mod draft;
pub mod editor;
pub mod fetch;

// Re-exports
pub use draft::{PermissionDraft, SubItemKind};
pub use editor::{RoleEditor, SaveError, SaveReport, SaveStep};
pub use fetch::{FetchGuard, FetchToken};
