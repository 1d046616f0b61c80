// REST client tests against a stub backend.

use marquee_client::api::{AdminApi, RestAdminApi};
use marquee_client::{ClientConfig, ClientError};
use serde_json::json;
use shared::client::EmployeeSearchQuery;
use shared::models::{PermissionCreate, ResourceType};
use shared::rbac::PermissionCode;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> RestAdminApi {
    let http = ClientConfig::new(server.uri())
        .with_token("test-token")
        .build_http_client();
    RestAdminApi::new(http)
}

fn envelope(data: serde_json::Value) -> serde_json::Value {
    json!({ "code": "E0000", "message": "Success", "data": data })
}

#[tokio::test]
async fn lists_roles_with_bearer_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/roles"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            {
                "role_id": 1,
                "role_name": "Ops Admin",
                "role_code": "ops_admin",
                "description": null,
                "applying_to_all": false,
                "permissions": [
                    {
                        "permission_id": 10,
                        "permission_name": "Employee List",
                        "permission_code": "page:hr_employees",
                        "resource_type": "PAGE",
                        "action_type": "VIEW",
                        "is_active": true
                    }
                ]
            }
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let roles = api_for(&server).list_roles().await.unwrap();
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].role_code, "ops_admin");
    // the wire string decodes into the code enum
    assert_eq!(
        roles[0].permissions[0].code,
        PermissionCode::page("hr_employees")
    );
}

#[tokio::test]
async fn forbidden_maps_to_a_distinct_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/roles"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "code": "E2001",
            "message": "Permission denied: roles:manage required"
        })))
        .mount(&server)
        .await;

    let err = api_for(&server).list_roles().await.unwrap_err();
    let ClientError::Forbidden(message) = err else {
        panic!("expected Forbidden, got {:?}", err);
    };
    assert!(message.contains("roles:manage"));
}

#[tokio::test]
async fn permission_error_envelope_on_ok_status_maps_to_forbidden() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/roles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "E2001",
            "message": "Permission denied"
        })))
        .mount(&server)
        .await;

    let err = api_for(&server).list_roles().await.unwrap_err();
    assert!(matches!(err, ClientError::Forbidden(_)));
}

#[tokio::test]
async fn unauthorized_maps_to_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/permissions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("expired"))
        .mount(&server)
        .await;

    let err = api_for(&server).list_permissions().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
}

#[tokio::test]
async fn creates_permission_with_encoded_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/permissions"))
        .and(body_partial_json(json!({
            "permission_code": "page:hr_employees",
            "resource_type": "PAGE",
            "action_type": "VIEW"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "permission_id": 42,
            "permission_name": "Employee List",
            "permission_code": "page:hr_employees",
            "resource_type": "PAGE",
            "action_type": "VIEW",
            "is_active": true
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let created = api_for(&server)
        .create_permission(PermissionCreate {
            name: "Employee List".to_string(),
            code: PermissionCode::page("hr_employees"),
            resource_type: ResourceType::Page,
            action_type: shared::models::ActionType::View,
            description: None,
        })
        .await
        .unwrap();
    assert_eq!(created.id, Some(42));
}

#[tokio::test]
async fn replace_sends_the_full_id_set() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/roles/7/permissions"))
        .and(body_partial_json(json!({ "permission_ids": [10, 42] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "role_id": 7,
            "role_name": "Ops Admin",
            "role_code": "ops_admin",
            "applying_to_all": false,
            "permissions": []
        }))))
        .expect(1)
        .mount(&server)
        .await;

    api_for(&server)
        .replace_role_permissions(7, vec![10, 42])
        .await
        .unwrap();
}

#[tokio::test]
async fn unassign_is_scoped_to_the_role() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/roles/7/employees/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!(true))))
        .expect(1)
        .mount(&server)
        .await;

    api_for(&server).unassign_employee(3, 7).await.unwrap();
}

#[tokio::test]
async fn searches_employees_with_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/employees/search"))
        .and(query_param("keyword", "ada"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "items": [
                {
                    "employee_id": 3,
                    "username": "ada",
                    "employee_name": "Ada L.",
                    "department": "Creative",
                    "is_active": true
                }
            ],
            "pagination": { "page": 2, "per_page": 20, "total": 21, "total_pages": 2 }
        }))))
        .mount(&server)
        .await;

    let result = api_for(&server)
        .search_employees(&EmployeeSearchQuery {
            keyword: "ada".to_string(),
            page: 2,
        })
        .await
        .unwrap();
    assert_eq!(result.items.len(), 1);
    assert_eq!(result.items[0].display_name, "Ada L.");
    assert_eq!(result.pagination.total, 21);
}
