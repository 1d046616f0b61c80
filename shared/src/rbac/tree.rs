//! Permission tree builder
//!
//! Merges the flat permission list returned by the backend with the
//! navigation catalog into a forest of page nodes. Pages present in the
//! menu but absent from the backend become *virtual* nodes (no id yet);
//! section/action permissions whose parent page cannot be found are
//! collected as orphans.
//!
//! The tree is derived state: rebuilt from scratch on every fetch,
//! never patched in place.

use super::code::PermissionCode;
use super::menu::MenuCatalog;
use crate::models::{ActionType, Permission, ResourceType};
use std::collections::HashMap;

/// Description stamped on permissions synthesized from the menu
const VIRTUAL_DESCRIPTION: &str = "auto-generated from navigation menu";

/// Node kind within the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Page,
    Section,
    Action,
}

/// A page, section or action in the permission tree
#[derive(Debug, Clone)]
pub struct PermissionNode {
    pub kind: NodeKind,
    /// Decoded id segment of the permission code
    pub id: String,
    /// The backing record; synthetic (id = `None`) for virtual pages
    pub permission: Permission,
    /// Section/action children, in server return order
    pub children: Vec<PermissionNode>,
    /// Owning page id, for section/action nodes
    pub parent_id: Option<String>,
    /// True when the page exists only in the menu, not on the backend
    pub is_virtual: bool,
    /// Menu display name, when a catalog entry matches
    pub nav_name: Option<String>,
}

/// Result of a tree build
#[derive(Debug, Clone, Default)]
pub struct PermissionTree {
    /// Page nodes: real pages in permission order, then virtual pages
    /// in catalog order
    pub pages: Vec<PermissionNode>,
    /// Section/action permissions with no resolvable parent page
    pub orphans: Vec<Permission>,
}

impl PermissionTree {
    /// Look up a page node by page id
    pub fn page(&self, page_id: &str) -> Option<&PermissionNode> {
        self.pages.iter().find(|n| n.id == page_id)
    }
}

/// Build the permission tree for one (permissions, menu) snapshot.
///
/// Pure and deterministic: identical inputs yield a structurally
/// identical tree.
pub fn build_permission_tree(
    permissions: &[Permission],
    catalog: &MenuCatalog,
) -> PermissionTree {
    let mut pages: Vec<PermissionNode> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    // Real pages first, in server return order
    for permission in permissions {
        if let PermissionCode::Page { id } = &permission.code {
            if index.contains_key(id) {
                continue;
            }
            index.insert(id.clone(), pages.len());
            pages.push(PermissionNode {
                kind: NodeKind::Page,
                id: id.clone(),
                permission: permission.clone(),
                children: Vec::new(),
                parent_id: None,
                is_virtual: false,
                nav_name: catalog.entry_for_page(id).map(|e| e.name.clone()),
            });
        }
    }

    // Menu entries without a real page become virtual nodes
    for entry in catalog.iter() {
        let page_id = entry.page_id();
        if index.contains_key(&page_id) {
            continue;
        }
        index.insert(page_id.clone(), pages.len());
        pages.push(PermissionNode {
            kind: NodeKind::Page,
            id: page_id.clone(),
            permission: Permission {
                id: None,
                name: entry.name.clone(),
                code: PermissionCode::page(page_id.clone()),
                resource_type: ResourceType::Page,
                action_type: ActionType::View,
                description: Some(VIRTUAL_DESCRIPTION.to_string()),
                is_active: true,
                created_at: None,
                modified_at: None,
            },
            children: Vec::new(),
            parent_id: None,
            is_virtual: true,
            nav_name: Some(entry.name.clone()),
        });
    }

    // Nest section/action permissions under their pages
    let mut orphans: Vec<Permission> = Vec::new();
    for permission in permissions {
        let (kind, parent_id, id) = match &permission.code {
            PermissionCode::Page { .. } => continue,
            PermissionCode::Section { parent_id, id } => (NodeKind::Section, parent_id, id),
            PermissionCode::Action { parent_id, id } => (NodeKind::Action, parent_id, id),
            PermissionCode::Unknown { .. } => {
                orphans.push(permission.clone());
                continue;
            }
        };

        match index.get(parent_id.as_str()) {
            Some(&slot) => pages[slot].children.push(PermissionNode {
                kind,
                id: id.clone(),
                permission: permission.clone(),
                children: Vec::new(),
                parent_id: Some(parent_id.clone()),
                is_virtual: false,
                nav_name: None,
            }),
            None => orphans.push(permission.clone()),
        }
    }

    if !orphans.is_empty() {
        tracing::debug!(count = orphans.len(), "permission tree has orphaned entries");
    }

    PermissionTree { pages, orphans }
}
