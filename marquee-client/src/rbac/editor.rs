//! Role editor
//!
//! Holds one role's pending edits (checked permissions, not-yet-created
//! virtual pages, employee assignments, the applying-to-all flag) against
//! the last-fetched baselines, and reconciles them with the backend on
//! save. Selecting a role resets all pending state; baselines advance
//! only after a successful save.

use crate::api::AdminApi;
use crate::error::{ClientError, ClientResult};
use crate::rbac::fetch::FetchGuard;
use shared::models::{
    ActionType, Employee, EmployeeId, Permission, PermissionCreate, PermissionId, ResourceType,
    Role, RoleId, RoleUpdate,
};
use shared::rbac::{MenuCatalog, PermissionCode, PermissionTree, build_permission_tree};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use thiserror::Error;

/// One step of the save pipeline, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStep {
    UpdateRoleFlag,
    CreatePagePermissions,
    ReplaceRolePermissions,
    AssignEmployees,
    UnassignEmployees,
    RefreshOwnPermissions,
    Reload,
}

impl fmt::Display for SaveStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UpdateRoleFlag => "role flag update",
            Self::CreatePagePermissions => "page permission creation",
            Self::ReplaceRolePermissions => "role permission replace",
            Self::AssignEmployees => "employee assignment",
            Self::UnassignEmployees => "employee unassignment",
            Self::RefreshOwnPermissions => "own permission refresh",
            Self::Reload => "reload",
        };
        f.write_str(name)
    }
}

/// What a successful save did
#[derive(Debug, Clone, Default)]
pub struct SaveReport {
    /// Steps that actually executed (no-change steps are skipped)
    pub completed: Vec<SaveStep>,
    /// Ids of page permissions created from virtual selections
    pub created_permission_ids: Vec<PermissionId>,
}

/// Save failure
///
/// There is no rollback: steps listed in `completed` have already been
/// applied on the backend and stay applied. The caller decides whether
/// to re-invoke the save.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("no role selected")]
    NoRoleSelected,
    #[error("save aborted at {step}: {source}")]
    Step {
        step: SaveStep,
        completed: Vec<SaveStep>,
        #[source]
        source: ClientError,
    },
}

/// Pending edit state for the selected role
#[derive(Debug, Clone)]
struct RoleSelection {
    role_id: RoleId,
    baseline_permission_ids: HashSet<PermissionId>,
    pending_permission_ids: HashSet<PermissionId>,
    /// Virtual pages checked by the user; ordered so save requests are
    /// issued deterministically
    selected_virtual_pages: BTreeSet<String>,
    initial_assigned: Vec<Employee>,
    assigned: Vec<Employee>,
    baseline_applying_to_all: bool,
    applying_to_all: bool,
}

impl RoleSelection {
    fn seed(role: &Role, employees: Vec<Employee>) -> Self {
        Self {
            role_id: role.id,
            baseline_permission_ids: role.permission_ids(),
            pending_permission_ids: role.permission_ids(),
            selected_virtual_pages: BTreeSet::new(),
            initial_assigned: employees.clone(),
            assigned: employees,
            baseline_applying_to_all: role.applying_to_all,
            applying_to_all: role.applying_to_all,
        }
    }
}

/// Editor for role permissions and employee assignments
pub struct RoleEditor {
    catalog: MenuCatalog,
    roles: Vec<Role>,
    permissions: Vec<Permission>,
    tree: PermissionTree,
    fetch_guard: FetchGuard,
    selection: Option<RoleSelection>,
}

impl RoleEditor {
    /// Create an editor over the given navigation catalog
    pub fn new(catalog: MenuCatalog) -> Self {
        let tree = build_permission_tree(&[], &catalog);
        Self {
            catalog,
            roles: Vec::new(),
            permissions: Vec::new(),
            tree,
            fetch_guard: FetchGuard::new(),
            selection: None,
        }
    }

    /// Fetch roles and permissions and rebuild the tree
    pub async fn load(&mut self, api: &dyn AdminApi) -> ClientResult<()> {
        self.roles = api.list_roles().await?;
        self.refresh_permissions(api).await?;
        Ok(())
    }

    /// Re-fetch permissions and rebuild the tree.
    ///
    /// Returns `false` when the fetch was superseded by a newer one and
    /// its result was discarded.
    pub async fn refresh_permissions(&mut self, api: &dyn AdminApi) -> ClientResult<bool> {
        let token = self.fetch_guard.begin();
        let permissions = api.list_permissions().await?;
        if !self.fetch_guard.is_current(token) {
            tracing::debug!("discarding stale permissions fetch");
            return Ok(false);
        }
        self.permissions = permissions;
        self.tree = build_permission_tree(&self.permissions, &self.catalog);
        Ok(true)
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn tree(&self) -> &PermissionTree {
        &self.tree
    }

    pub fn catalog(&self) -> &MenuCatalog {
        &self.catalog
    }

    /// The currently selected role, if any
    pub fn selected_role(&self) -> Option<&Role> {
        let sel = self.selection.as_ref()?;
        self.roles.iter().find(|r| r.id == sel.role_id)
    }

    /// Select a role: pending state is reset to the role's baselines and
    /// its assigned employees are fetched
    pub async fn select_role(&mut self, api: &dyn AdminApi, role_id: RoleId) -> ClientResult<()> {
        let role = self
            .roles
            .iter()
            .find(|r| r.id == role_id)
            .ok_or_else(|| ClientError::NotFound(format!("role {}", role_id)))?
            .clone();

        let employees = api.list_role_employees(role_id).await?;
        tracing::debug!(
            role_id,
            role_name = %role.role_name,
            employees = employees.len(),
            "role selected, pending state reset"
        );
        self.selection = Some(RoleSelection::seed(&role, employees));
        Ok(())
    }

    /// Drop the selection and all pending edits
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    fn selection_mut(&mut self) -> ClientResult<&mut RoleSelection> {
        self.selection
            .as_mut()
            .ok_or_else(|| ClientError::Validation("no role selected".to_string()))
    }

    /// Toggle a real permission's checkbox
    pub fn toggle_permission(&mut self, id: PermissionId) -> ClientResult<()> {
        let sel = self.selection_mut()?;
        if !sel.pending_permission_ids.remove(&id) {
            sel.pending_permission_ids.insert(id);
        }
        Ok(())
    }

    /// Toggle a virtual page's checkbox.
    ///
    /// Virtual pages have no permission id yet, so the pending id set is
    /// untouched; the page is materialized on save.
    pub fn toggle_virtual_page(&mut self, page_id: &str) -> ClientResult<()> {
        match self.tree.page(page_id) {
            Some(node) if node.is_virtual => {}
            Some(_) => {
                return Err(ClientError::Validation(format!(
                    "page {} already has a real permission",
                    page_id
                )));
            }
            None => {
                return Err(ClientError::Validation(format!(
                    "unknown page {}",
                    page_id
                )));
            }
        }
        let sel = self.selection_mut()?;
        if !sel.selected_virtual_pages.remove(page_id) {
            sel.selected_virtual_pages.insert(page_id.to_string());
        }
        Ok(())
    }

    /// Add an employee to the pending assignment list (deduplicated by id)
    pub fn add_employee(&mut self, employee: Employee) -> ClientResult<()> {
        let sel = self.selection_mut()?;
        if sel.assigned.iter().all(|e| e.id != employee.id) {
            sel.assigned.push(employee);
        }
        Ok(())
    }

    /// Remove an employee from the pending assignment list
    pub fn remove_employee(&mut self, employee_id: EmployeeId) -> ClientResult<()> {
        let sel = self.selection_mut()?;
        sel.assigned.retain(|e| e.id != employee_id);
        Ok(())
    }

    pub fn set_applying_to_all(&mut self, value: bool) -> ClientResult<()> {
        self.selection_mut()?.applying_to_all = value;
        Ok(())
    }

    pub fn pending_permission_ids(&self) -> Option<&HashSet<PermissionId>> {
        self.selection.as_ref().map(|s| &s.pending_permission_ids)
    }

    pub fn selected_virtual_pages(&self) -> Option<&BTreeSet<String>> {
        self.selection.as_ref().map(|s| &s.selected_virtual_pages)
    }

    pub fn assigned_employees(&self) -> Option<&[Employee]> {
        self.selection.as_ref().map(|s| s.assigned.as_slice())
    }

    pub fn applying_to_all(&self) -> Option<bool> {
        self.selection.as_ref().map(|s| s.applying_to_all)
    }

    /// Whether any pending edit differs from its baseline.
    ///
    /// Advisory only: nothing locks the role against edits from another
    /// session.
    pub fn has_unsaved_changes(&self) -> bool {
        let Some(sel) = &self.selection else {
            return false;
        };
        if sel.applying_to_all != sel.baseline_applying_to_all {
            return true;
        }
        if !sel.selected_virtual_pages.is_empty() {
            return true;
        }
        if sel.pending_permission_ids != sel.baseline_permission_ids {
            return true;
        }
        let current: HashSet<EmployeeId> = sel.assigned.iter().map(|e| e.id).collect();
        let initial: HashSet<EmployeeId> = sel.initial_assigned.iter().map(|e| e.id).collect();
        current != initial
    }

    /// Employee ids to assign and unassign, relative to the baseline
    pub fn employee_diff(&self) -> (Vec<EmployeeId>, Vec<EmployeeId>) {
        let Some(sel) = &self.selection else {
            return (Vec::new(), Vec::new());
        };
        let initial: HashSet<EmployeeId> = sel.initial_assigned.iter().map(|e| e.id).collect();
        let current: HashSet<EmployeeId> = sel.assigned.iter().map(|e| e.id).collect();
        let to_add = sel
            .assigned
            .iter()
            .map(|e| e.id)
            .filter(|id| !initial.contains(id))
            .collect();
        let to_remove = sel
            .initial_assigned
            .iter()
            .map(|e| e.id)
            .filter(|id| !current.contains(id))
            .collect();
        (to_add, to_remove)
    }

    /// Apply all pending edits to the backend.
    ///
    /// Steps run strictly in order; a failure aborts the remainder and
    /// leaves earlier, already-applied steps in place (see [`SaveError`]).
    /// On success all baselines are re-seeded from freshly fetched data.
    pub async fn save(&mut self, api: &dyn AdminApi) -> Result<SaveReport, SaveError> {
        let sel = self.selection.as_ref().ok_or(SaveError::NoRoleSelected)?;
        let role_id = sel.role_id;
        let flag_changed = sel.applying_to_all != sel.baseline_applying_to_all;
        let applying_to_all = sel.applying_to_all;
        let virtual_pages: Vec<String> = sel.selected_virtual_pages.iter().cloned().collect();
        let pending_ids = sel.pending_permission_ids.clone();
        let (to_add, to_remove) = self.employee_diff();

        let mut completed: Vec<SaveStep> = Vec::new();

        // 1. role flag
        if flag_changed {
            let patch = RoleUpdate {
                applying_to_all: Some(applying_to_all),
                ..RoleUpdate::default()
            };
            api.update_role(role_id, patch)
                .await
                .map_err(|source| step_error(SaveStep::UpdateRoleFlag, &completed, source))?;
            tracing::info!(role_id, applying_to_all, "role flag updated");
            completed.push(SaveStep::UpdateRoleFlag);
        }

        // 2. materialize virtual pages
        let mut created_ids: Vec<PermissionId> = Vec::new();
        if !virtual_pages.is_empty() {
            for page_id in &virtual_pages {
                let name = self
                    .catalog
                    .entry_for_page(page_id)
                    .map(|e| e.name.clone())
                    .ok_or_else(|| {
                        step_error(
                            SaveStep::CreatePagePermissions,
                            &completed,
                            ClientError::Validation(format!("page {} is not in the menu", page_id)),
                        )
                    })?;
                let payload = PermissionCreate {
                    name,
                    code: PermissionCode::page(page_id.clone()),
                    resource_type: ResourceType::Page,
                    action_type: ActionType::View,
                    description: None,
                };
                let created = api.create_permission(payload).await.map_err(|source| {
                    step_error(SaveStep::CreatePagePermissions, &completed, source)
                })?;
                let id = created.id.ok_or_else(|| {
                    step_error(
                        SaveStep::CreatePagePermissions,
                        &completed,
                        ClientError::InvalidResponse(
                            "created permission is missing an id".to_string(),
                        ),
                    )
                })?;
                created_ids.push(id);
            }
            tracing::info!(role_id, created = created_ids.len(), "page permissions created");
            completed.push(SaveStep::CreatePagePermissions);
        }

        // 3. full replace of the role's permission set
        let mut final_ids: Vec<PermissionId> =
            pending_ids.iter().copied().chain(created_ids.iter().copied()).collect();
        final_ids.sort_unstable();
        final_ids.dedup();
        api.replace_role_permissions(role_id, final_ids.clone())
            .await
            .map_err(|source| step_error(SaveStep::ReplaceRolePermissions, &completed, source))?;
        tracing::info!(role_id, permissions = final_ids.len(), "role permissions replaced");
        completed.push(SaveStep::ReplaceRolePermissions);

        // 4. employee assignment diff
        if !to_add.is_empty() {
            api.assign_employees(role_id, to_add.clone())
                .await
                .map_err(|source| step_error(SaveStep::AssignEmployees, &completed, source))?;
            tracing::info!(role_id, assigned = to_add.len(), "employees assigned");
            completed.push(SaveStep::AssignEmployees);
        }
        if !to_remove.is_empty() {
            for employee_id in &to_remove {
                api.unassign_employee(*employee_id, role_id)
                    .await
                    .map_err(|source| step_error(SaveStep::UnassignEmployees, &completed, source))?;
            }
            tracing::info!(role_id, unassigned = to_remove.len(), "employees unassigned");
            completed.push(SaveStep::UnassignEmployees);
        }

        // 5. the editing user may have changed their own role
        api.refresh_my_permissions()
            .await
            .map_err(|source| step_error(SaveStep::RefreshOwnPermissions, &completed, source))?;
        completed.push(SaveStep::RefreshOwnPermissions);

        // 6. re-seed every baseline from fresh server state
        self.reload_after_save(api, role_id)
            .await
            .map_err(|source| step_error(SaveStep::Reload, &completed, source))?;
        completed.push(SaveStep::Reload);

        Ok(SaveReport {
            completed,
            created_permission_ids: created_ids,
        })
    }

    async fn reload_after_save(&mut self, api: &dyn AdminApi, role_id: RoleId) -> ClientResult<()> {
        self.roles = api.list_roles().await?;
        self.refresh_permissions(api).await?;

        match self.roles.iter().find(|r| r.id == role_id).cloned() {
            Some(role) => {
                let employees = api.list_role_employees(role_id).await?;
                self.selection = Some(RoleSelection::seed(&role, employees));
            }
            None => {
                // role disappeared under us; nothing left to edit
                tracing::warn!(role_id, "selected role vanished during save reload");
                self.selection = None;
            }
        }
        Ok(())
    }
}

fn step_error(step: SaveStep, completed: &[SaveStep], source: ClientError) -> SaveError {
    tracing::warn!(step = %step, error = %source, "role save aborted");
    SaveError::Step {
        step,
        completed: completed.to_vec(),
        source,
    }
}
