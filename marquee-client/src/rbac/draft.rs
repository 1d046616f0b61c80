//! Section/action permission drafts
//!
//! The sub-item dialog creates a Section or Action permission under a
//! fixed parent page. The full code is synthesized from the parent page
//! id and a user-entered suffix; validation happens before any network
//! call so a bad draft never reaches the backend.

use crate::error::{ClientError, ClientResult};
use shared::models::{ActionType, PermissionCreate, ResourceType};
use shared::rbac::PermissionCode;

/// Which kind of sub-item the draft creates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubItemKind {
    Section,
    Action,
}

/// A not-yet-submitted section or action permission
#[derive(Debug, Clone)]
pub struct PermissionDraft {
    pub kind: SubItemKind,
    /// Fixed to the page the dialog was opened from; not user-editable
    pub parent_page_id: String,
    /// User-entered id suffix, combined with the parent into the code
    pub suffix: String,
    pub name: String,
    pub description: Option<String>,
}

impl PermissionDraft {
    pub fn new(
        kind: SubItemKind,
        parent_page_id: impl Into<String>,
        suffix: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            parent_page_id: parent_page_id.into(),
            suffix: suffix.into(),
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validate and convert into a create payload
    pub fn into_create(self) -> ClientResult<PermissionCreate> {
        if self.name.trim().is_empty() {
            return Err(ClientError::Validation(
                "permission name must not be empty".to_string(),
            ));
        }
        if self.suffix.trim().is_empty() {
            return Err(ClientError::Validation(
                "permission code must not be empty".to_string(),
            ));
        }

        let (code, resource_type, action_type) = match self.kind {
            SubItemKind::Section => (
                PermissionCode::section(&self.parent_page_id, &self.suffix),
                ResourceType::Section,
                ActionType::View,
            ),
            SubItemKind::Action => (
                PermissionCode::action(&self.parent_page_id, &self.suffix),
                ResourceType::Action,
                ActionType::Operate,
            ),
        };

        Ok(PermissionCreate {
            name: self.name,
            code,
            resource_type,
            action_type,
            description: self.description,
        })
    }
}
