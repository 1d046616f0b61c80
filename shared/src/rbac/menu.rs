//! Navigation menu catalog
//!
//! The application's navigable pages, declared once at startup and
//! injected wherever the permission tree is built. Page permissions
//! correlate with menu entries through the derived page id.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use std::collections::HashMap;

/// A navigable page: route path plus display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub path: String,
    pub name: String,
}

impl MenuEntry {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }

    /// The page id this entry correlates with
    pub fn page_id(&self) -> String {
        page_id(&self.path)
    }
}

/// Derive a page id from a route path: drop the leading `/`, then
/// flatten the remaining separators to `_`.
///
/// `/hr/employees` becomes `hr_employees`.
pub fn page_id(path: &str) -> String {
    path.strip_prefix('/').unwrap_or(path).replace('/', "_")
}

/// Catalog construction error
#[derive(Debug, Error)]
pub enum MenuError {
    /// Two distinct paths collapsed to the same page id; the menu must be
    /// fixed rather than silently merging the pages
    #[error("menu paths {first:?} and {second:?} both derive page id {id:?}")]
    DuplicatePageId {
        id: String,
        first: String,
        second: String,
    },
}

/// The full set of navigable pages, validated at construction
#[derive(Debug, Clone, Default)]
pub struct MenuCatalog {
    entries: Vec<MenuEntry>,
}

impl MenuCatalog {
    /// Build a catalog, rejecting page-id collisions
    pub fn new(entries: Vec<MenuEntry>) -> Result<Self, MenuError> {
        let mut seen: HashMap<String, &str> = HashMap::new();
        for entry in &entries {
            let id = entry.page_id();
            if let Some(first) = seen.get(id.as_str()) {
                return Err(MenuError::DuplicatePageId {
                    id,
                    first: (*first).to_string(),
                    second: entry.path.clone(),
                });
            }
            seen.insert(id, &entry.path);
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &MenuEntry> {
        self.entries.iter()
    }

    /// Look up the entry whose derived page id matches
    pub fn entry_for_page(&self, page_id_value: &str) -> Option<&MenuEntry> {
        self.entries.iter().find(|e| e.page_id() == page_id_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_page_id_from_path() {
        assert_eq!(page_id("/hr/employees"), "hr_employees");
        assert_eq!(page_id("/dashboard"), "dashboard");
        assert_eq!(page_id("/projects/kickoff/new"), "projects_kickoff_new");
        // only one leading slash is dropped
        assert_eq!(page_id("dashboard"), "dashboard");
    }

    #[test]
    fn rejects_colliding_paths() {
        let err = MenuCatalog::new(vec![
            MenuEntry::new("/hr/employees", "Employee List"),
            MenuEntry::new("/hr_employees", "Shadow"),
        ])
        .unwrap_err();
        let MenuError::DuplicatePageId { id, first, second } = err;
        assert_eq!(id, "hr_employees");
        assert_eq!(first, "/hr/employees");
        assert_eq!(second, "/hr_employees");
    }

    #[test]
    fn accepts_distinct_paths() {
        let catalog = MenuCatalog::new(vec![
            MenuEntry::new("/hr/employees", "Employee List"),
            MenuEntry::new("/hr/departments", "Departments"),
        ])
        .unwrap();
        assert_eq!(catalog.entries().len(), 2);
        assert_eq!(
            catalog.entry_for_page("hr_departments").map(|e| e.name.as_str()),
            Some("Departments")
        );
    }
}
