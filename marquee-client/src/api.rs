//! Typed admin API
//!
//! The logical operations the RBAC screen performs against the backend,
//! behind a trait so the reconciler can be driven by a fake in tests.

use crate::error::ClientResult;
use crate::http::HttpClient;
use async_trait::async_trait;
use shared::client::{
    AssignEmployeesRequest, CurrentUserResponse, EmployeeSearchQuery, ReplacePermissionsRequest,
};
use shared::models::{
    Employee, EmployeeId, Permission, PermissionCreate, PermissionId, PermissionUpdate, Role,
    RoleCreate, RoleId, RoleUpdate,
};
use shared::response::{ApiResponse, PaginatedResponse};

/// Operations of the role/permission administration API
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn list_roles(&self) -> ClientResult<Vec<Role>>;
    async fn create_role(&self, payload: RoleCreate) -> ClientResult<Role>;
    async fn update_role(&self, id: RoleId, patch: RoleUpdate) -> ClientResult<Role>;
    async fn delete_role(&self, id: RoleId) -> ClientResult<()>;

    async fn list_permissions(&self) -> ClientResult<Vec<Permission>>;
    async fn create_permission(&self, payload: PermissionCreate) -> ClientResult<Permission>;
    async fn update_permission(
        &self,
        id: PermissionId,
        patch: PermissionUpdate,
    ) -> ClientResult<Permission>;
    async fn delete_permission(&self, id: PermissionId) -> ClientResult<()>;

    /// Replace a role's permission set in full (not incremental)
    async fn replace_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: Vec<PermissionId>,
    ) -> ClientResult<()>;

    async fn list_role_employees(&self, role_id: RoleId) -> ClientResult<Vec<Employee>>;
    async fn assign_employees(
        &self,
        role_id: RoleId,
        employee_ids: Vec<EmployeeId>,
    ) -> ClientResult<()>;
    /// Unassign a single employee; role-scoped so other role memberships
    /// are untouched
    async fn unassign_employee(
        &self,
        employee_id: EmployeeId,
        role_id: RoleId,
    ) -> ClientResult<()>;
    async fn search_employees(
        &self,
        query: &EmployeeSearchQuery,
    ) -> ClientResult<PaginatedResponse<Employee>>;

    /// Reload the caller's own cached permission set
    async fn refresh_my_permissions(&self) -> ClientResult<CurrentUserResponse>;
}

/// REST implementation over [`HttpClient`]
#[derive(Debug, Clone)]
pub struct RestAdminApi {
    http: HttpClient,
}

impl RestAdminApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }
}

#[async_trait]
impl AdminApi for RestAdminApi {
    async fn list_roles(&self) -> ClientResult<Vec<Role>> {
        let resp: ApiResponse<Vec<Role>> = self.http.get("api/roles").await?;
        HttpClient::expect_data(resp, "roles")
    }

    async fn create_role(&self, payload: RoleCreate) -> ClientResult<Role> {
        let resp: ApiResponse<Role> = self.http.post("api/roles", &payload).await?;
        HttpClient::expect_data(resp, "role")
    }

    async fn update_role(&self, id: RoleId, patch: RoleUpdate) -> ClientResult<Role> {
        let resp: ApiResponse<Role> = self.http.put(&format!("api/roles/{}", id), &patch).await?;
        HttpClient::expect_data(resp, "role")
    }

    async fn delete_role(&self, id: RoleId) -> ClientResult<()> {
        let _resp: ApiResponse<bool> = self.http.delete(&format!("api/roles/{}", id)).await?;
        Ok(())
    }

    async fn list_permissions(&self) -> ClientResult<Vec<Permission>> {
        let resp: ApiResponse<Vec<Permission>> = self.http.get("api/permissions").await?;
        HttpClient::expect_data(resp, "permissions")
    }

    async fn create_permission(&self, payload: PermissionCreate) -> ClientResult<Permission> {
        let resp: ApiResponse<Permission> = self.http.post("api/permissions", &payload).await?;
        HttpClient::expect_data(resp, "permission")
    }

    async fn update_permission(
        &self,
        id: PermissionId,
        patch: PermissionUpdate,
    ) -> ClientResult<Permission> {
        let resp: ApiResponse<Permission> = self
            .http
            .put(&format!("api/permissions/{}", id), &patch)
            .await?;
        HttpClient::expect_data(resp, "permission")
    }

    async fn delete_permission(&self, id: PermissionId) -> ClientResult<()> {
        let _resp: ApiResponse<bool> =
            self.http.delete(&format!("api/permissions/{}", id)).await?;
        Ok(())
    }

    async fn replace_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: Vec<PermissionId>,
    ) -> ClientResult<()> {
        let payload = ReplacePermissionsRequest { permission_ids };
        let _resp: ApiResponse<Role> = self
            .http
            .put(&format!("api/roles/{}/permissions", role_id), &payload)
            .await?;
        Ok(())
    }

    async fn list_role_employees(&self, role_id: RoleId) -> ClientResult<Vec<Employee>> {
        let resp: ApiResponse<Vec<Employee>> = self
            .http
            .get(&format!("api/roles/{}/employees", role_id))
            .await?;
        HttpClient::expect_data(resp, "employees")
    }

    async fn assign_employees(
        &self,
        role_id: RoleId,
        employee_ids: Vec<EmployeeId>,
    ) -> ClientResult<()> {
        let payload = AssignEmployeesRequest { employee_ids };
        let _resp: ApiResponse<bool> = self
            .http
            .post(&format!("api/roles/{}/employees", role_id), &payload)
            .await?;
        Ok(())
    }

    async fn unassign_employee(
        &self,
        employee_id: EmployeeId,
        role_id: RoleId,
    ) -> ClientResult<()> {
        let _resp: ApiResponse<bool> = self
            .http
            .delete(&format!("api/roles/{}/employees/{}", role_id, employee_id))
            .await?;
        Ok(())
    }

    async fn search_employees(
        &self,
        query: &EmployeeSearchQuery,
    ) -> ClientResult<PaginatedResponse<Employee>> {
        let resp: ApiResponse<PaginatedResponse<Employee>> = self
            .http
            .get(&format!(
                "api/employees/search?keyword={}&page={}",
                query.keyword, query.page
            ))
            .await?;
        HttpClient::expect_data(resp, "employee search results")
    }

    async fn refresh_my_permissions(&self) -> ClientResult<CurrentUserResponse> {
        let resp: ApiResponse<CurrentUserResponse> =
            self.http.post_empty("api/auth/me/permissions/refresh").await?;
        HttpClient::expect_data(resp, "current user")
    }
}
