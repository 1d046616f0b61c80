// Role editor reconciliation tests against a recording fake backend.

use async_trait::async_trait;
use marquee_client::api::AdminApi;
use marquee_client::error::{ClientError, ClientResult};
use marquee_client::rbac::{RoleEditor, SaveError, SaveStep};
use shared::client::{CurrentUserResponse, EmployeeSearchQuery};
use shared::models::{
    ActionType, Employee, EmployeeId, Permission, PermissionCreate, PermissionId,
    PermissionUpdate, ResourceType, Role, RoleCreate, RoleId, RoleUpdate,
};
use shared::rbac::{MenuCatalog, MenuEntry, PermissionCode};
use shared::response::{PaginatedResponse, Pagination};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
struct FakeState {
    roles: Vec<Role>,
    permissions: Vec<Permission>,
    role_employees: HashMap<RoleId, Vec<Employee>>,
    next_permission_id: PermissionId,
    calls: Vec<String>,
    fail_on: HashSet<&'static str>,
}

struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    fn new(roles: Vec<Role>, permissions: Vec<Permission>) -> Self {
        let next_permission_id = permissions.iter().filter_map(|p| p.id).max().unwrap_or(0) + 1;
        Self {
            state: Mutex::new(FakeState {
                roles,
                permissions,
                next_permission_id,
                ..FakeState::default()
            }),
        }
    }

    fn with_employees(self, role_id: RoleId, employees: Vec<Employee>) -> Self {
        self.state
            .lock()
            .unwrap()
            .role_employees
            .insert(role_id, employees);
        self
    }

    fn fail_on(&self, op: &'static str) {
        self.state.lock().unwrap().fail_on.insert(op);
    }

    fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn check(&self, state: &mut FakeState, op: &'static str) -> ClientResult<()> {
        if state.fail_on.contains(op) {
            state.calls.push(format!("{}:FAILED", op));
            return Err(ClientError::Internal(format!("injected {} failure", op)));
        }
        Ok(())
    }
}

fn employee(id: EmployeeId) -> Employee {
    Employee {
        id,
        username: format!("user{}", id),
        display_name: format!("User {}", id),
        department: Some("Events".to_string()),
        is_active: true,
    }
}

fn permission(id: PermissionId, code: &str) -> Permission {
    Permission {
        id: Some(id),
        name: format!("perm {}", id),
        code: PermissionCode::parse(code),
        resource_type: ResourceType::Page,
        action_type: ActionType::View,
        description: None,
        is_active: true,
        created_at: None,
        modified_at: None,
    }
}

fn role(id: RoleId, permissions: Vec<Permission>) -> Role {
    Role {
        id,
        role_name: format!("role {}", id),
        role_code: format!("role_{}", id),
        description: None,
        permissions,
        applying_to_all: false,
    }
}

#[async_trait]
impl AdminApi for FakeApi {
    async fn list_roles(&self) -> ClientResult<Vec<Role>> {
        let mut state = self.state.lock().unwrap();
        self.check(&mut state, "list_roles")?;
        state.calls.push("list_roles".to_string());
        Ok(state.roles.clone())
    }

    async fn create_role(&self, _payload: RoleCreate) -> ClientResult<Role> {
        unimplemented!("not exercised by the editor")
    }

    async fn update_role(&self, id: RoleId, patch: RoleUpdate) -> ClientResult<Role> {
        let mut state = self.state.lock().unwrap();
        self.check(&mut state, "update_role")?;
        state
            .calls
            .push(format!("update_role:{}:{:?}", id, patch.applying_to_all));
        let role = state
            .roles
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("role {}", id)))?;
        if let Some(flag) = patch.applying_to_all {
            role.applying_to_all = flag;
        }
        Ok(role.clone())
    }

    async fn delete_role(&self, _id: RoleId) -> ClientResult<()> {
        unimplemented!("not exercised by the editor")
    }

    async fn list_permissions(&self) -> ClientResult<Vec<Permission>> {
        let mut state = self.state.lock().unwrap();
        self.check(&mut state, "list_permissions")?;
        state.calls.push("list_permissions".to_string());
        Ok(state.permissions.clone())
    }

    async fn create_permission(&self, payload: PermissionCreate) -> ClientResult<Permission> {
        let mut state = self.state.lock().unwrap();
        self.check(&mut state, "create_permission")?;
        state
            .calls
            .push(format!("create_permission:{}", payload.code));
        let id = state.next_permission_id;
        state.next_permission_id += 1;
        let created = Permission {
            id: Some(id),
            name: payload.name,
            code: payload.code,
            resource_type: payload.resource_type,
            action_type: payload.action_type,
            description: payload.description,
            is_active: true,
            created_at: None,
            modified_at: None,
        };
        state.permissions.push(created.clone());
        Ok(created)
    }

    async fn update_permission(
        &self,
        _id: PermissionId,
        _patch: PermissionUpdate,
    ) -> ClientResult<Permission> {
        unimplemented!("not exercised by the editor")
    }

    async fn delete_permission(&self, _id: PermissionId) -> ClientResult<()> {
        unimplemented!("not exercised by the editor")
    }

    async fn replace_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: Vec<PermissionId>,
    ) -> ClientResult<()> {
        let mut state = self.state.lock().unwrap();
        self.check(&mut state, "replace_role_permissions")?;
        state
            .calls
            .push(format!("replace_role_permissions:{}:{:?}", role_id, permission_ids));
        let granted: Vec<Permission> = state
            .permissions
            .iter()
            .filter(|p| p.id.is_some_and(|id| permission_ids.contains(&id)))
            .cloned()
            .collect();
        let role = state
            .roles
            .iter_mut()
            .find(|r| r.id == role_id)
            .ok_or_else(|| ClientError::NotFound(format!("role {}", role_id)))?;
        role.permissions = granted;
        Ok(())
    }

    async fn list_role_employees(&self, role_id: RoleId) -> ClientResult<Vec<Employee>> {
        let mut state = self.state.lock().unwrap();
        self.check(&mut state, "list_role_employees")?;
        state.calls.push(format!("list_role_employees:{}", role_id));
        Ok(state.role_employees.get(&role_id).cloned().unwrap_or_default())
    }

    async fn assign_employees(
        &self,
        role_id: RoleId,
        employee_ids: Vec<EmployeeId>,
    ) -> ClientResult<()> {
        let mut state = self.state.lock().unwrap();
        self.check(&mut state, "assign_employees")?;
        state
            .calls
            .push(format!("assign_employees:{}:{:?}", role_id, employee_ids));
        let list = state.role_employees.entry(role_id).or_default();
        for id in employee_ids {
            if list.iter().all(|e| e.id != id) {
                list.push(employee(id));
            }
        }
        Ok(())
    }

    async fn unassign_employee(
        &self,
        employee_id: EmployeeId,
        role_id: RoleId,
    ) -> ClientResult<()> {
        let mut state = self.state.lock().unwrap();
        self.check(&mut state, "unassign_employee")?;
        state
            .calls
            .push(format!("unassign_employee:{}:{}", employee_id, role_id));
        if let Some(list) = state.role_employees.get_mut(&role_id) {
            list.retain(|e| e.id != employee_id);
        }
        Ok(())
    }

    async fn search_employees(
        &self,
        query: &EmployeeSearchQuery,
    ) -> ClientResult<PaginatedResponse<Employee>> {
        let mut state = self.state.lock().unwrap();
        self.check(&mut state, "search_employees")?;
        state.calls.push(format!("search_employees:{}", query.keyword));
        Ok(PaginatedResponse {
            items: Vec::new(),
            pagination: Pagination::new(1, 20, 0),
        })
    }

    async fn refresh_my_permissions(&self) -> ClientResult<CurrentUserResponse> {
        let mut state = self.state.lock().unwrap();
        self.check(&mut state, "refresh_my_permissions")?;
        state.calls.push("refresh_my_permissions".to_string());
        Ok(CurrentUserResponse {
            id: 99,
            username: "admin".to_string(),
            permissions: Vec::new(),
        })
    }
}

fn catalog() -> MenuCatalog {
    MenuCatalog::new(vec![MenuEntry::new("/hr/employees", "Employee List")]).unwrap()
}

#[tokio::test]
async fn checking_a_virtual_page_creates_it_on_save() {
    let api = FakeApi::new(vec![role(1, vec![])], vec![]);
    let mut editor = RoleEditor::new(catalog());

    editor.load(&api).await.unwrap();
    let node = editor.tree().page("hr_employees").unwrap();
    assert!(node.is_virtual);

    editor.select_role(&api, 1).await.unwrap();
    assert!(!editor.has_unsaved_changes());

    editor.toggle_virtual_page("hr_employees").unwrap();
    assert!(editor.has_unsaved_changes());

    let report = editor.save(&api).await.unwrap();
    assert_eq!(report.created_permission_ids.len(), 1);
    let created_id = report.created_permission_ids[0];

    let calls = api.calls();
    assert!(calls.contains(&"create_permission:page:hr_employees".to_string()));
    assert!(
        calls.contains(&format!("replace_role_permissions:1:[{}]", created_id)),
        "replace must include the newly created id: {:?}",
        calls
    );

    // after the reload the page is real and the selection is clean
    let node = editor.tree().page("hr_employees").unwrap();
    assert!(!node.is_virtual);
    assert_eq!(node.permission.id, Some(created_id));
    assert!(!editor.has_unsaved_changes());
}

#[tokio::test]
async fn save_steps_run_in_order() {
    let perms = vec![permission(10, "page:hr_employees")];
    let api = FakeApi::new(vec![role(1, vec![])], perms)
        .with_employees(1, vec![employee(1), employee(2), employee(3)]);
    let mut editor = RoleEditor::new(catalog());

    editor.load(&api).await.unwrap();
    editor.select_role(&api, 1).await.unwrap();

    editor.set_applying_to_all(true).unwrap();
    editor.toggle_permission(10).unwrap();
    editor.remove_employee(1).unwrap();
    editor.add_employee(employee(4)).unwrap();

    let report = editor.save(&api).await.unwrap();
    assert_eq!(
        report.completed,
        vec![
            SaveStep::UpdateRoleFlag,
            SaveStep::ReplaceRolePermissions,
            SaveStep::AssignEmployees,
            SaveStep::UnassignEmployees,
            SaveStep::RefreshOwnPermissions,
            SaveStep::Reload,
        ]
    );

    let calls = api.calls();
    let pos = |needle: &str| {
        calls
            .iter()
            .position(|c| c.starts_with(needle))
            .unwrap_or_else(|| panic!("missing call {}: {:?}", needle, calls))
    };
    let flag = pos("update_role:1");
    let replace = pos("replace_role_permissions:1");
    let assign = pos("assign_employees:1:[4]");
    let unassign = pos("unassign_employee:1:1");
    let refresh = pos("refresh_my_permissions");
    assert!(flag < replace && replace < assign && assign < unassign && unassign < refresh);
}

#[tokio::test]
async fn failed_step_aborts_without_rolling_back() {
    let api = FakeApi::new(vec![role(1, vec![])], vec![]);
    api.fail_on("replace_role_permissions");
    let mut editor = RoleEditor::new(catalog());

    editor.load(&api).await.unwrap();
    editor.select_role(&api, 1).await.unwrap();
    editor.toggle_virtual_page("hr_employees").unwrap();
    editor.add_employee(employee(5)).unwrap();

    let err = editor.save(&api).await.unwrap_err();
    let SaveError::Step {
        step, completed, ..
    } = err
    else {
        panic!("expected a step failure");
    };
    assert_eq!(step, SaveStep::ReplaceRolePermissions);
    assert_eq!(completed, vec![SaveStep::CreatePagePermissions]);

    // the created page permission stays applied; nothing after the failed
    // step ran
    let calls = api.calls();
    assert!(calls.contains(&"create_permission:page:hr_employees".to_string()));
    assert!(!calls.iter().any(|c| c.starts_with("assign_employees")));
    assert!(!calls.iter().any(|c| c == "refresh_my_permissions"));

    // pending state is untouched, so the user can retry
    assert!(editor.has_unsaved_changes());
}

#[tokio::test]
async fn selecting_a_role_seeds_baselines() {
    let perms = vec![permission(10, "page:hr_employees")];
    let mut granted = role(1, vec![permission(10, "page:hr_employees")]);
    granted.applying_to_all = true;
    let api = FakeApi::new(vec![granted], perms).with_employees(1, vec![employee(1)]);
    let mut editor = RoleEditor::new(catalog());

    editor.load(&api).await.unwrap();
    editor.select_role(&api, 1).await.unwrap();

    assert_eq!(
        editor.pending_permission_ids().unwrap(),
        &HashSet::from([10])
    );
    assert_eq!(editor.applying_to_all(), Some(true));
    assert_eq!(editor.assigned_employees().unwrap().len(), 1);
    assert!(!editor.has_unsaved_changes());
}

#[tokio::test]
async fn reselecting_discards_pending_edits() {
    let api = FakeApi::new(vec![role(1, vec![]), role(2, vec![])], vec![]);
    let mut editor = RoleEditor::new(catalog());

    editor.load(&api).await.unwrap();
    editor.select_role(&api, 1).await.unwrap();
    editor.toggle_virtual_page("hr_employees").unwrap();
    assert!(editor.has_unsaved_changes());

    editor.select_role(&api, 2).await.unwrap();
    assert!(!editor.has_unsaved_changes());
    assert!(editor.selected_virtual_pages().unwrap().is_empty());
}

#[tokio::test]
async fn unchanged_flag_skips_the_role_update_call() {
    let perms = vec![permission(10, "page:hr_employees")];
    let api = FakeApi::new(vec![role(1, vec![])], perms);
    let mut editor = RoleEditor::new(catalog());

    editor.load(&api).await.unwrap();
    editor.select_role(&api, 1).await.unwrap();
    editor.toggle_permission(10).unwrap();

    editor.save(&api).await.unwrap();
    assert!(!api.calls().iter().any(|c| c.starts_with("update_role")));
}
