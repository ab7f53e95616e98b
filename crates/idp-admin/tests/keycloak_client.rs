//! Keycloak admin client tests against a mock server.

use idp_admin::{
    AdminClient, AdminService, KeycloakAdminClient, ProviderError, RoleRepresentation,
    UserRepresentation,
};
use idp_core::{AdminConfig, ProviderConfig};
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN_PATH: &str = "/realms/app/protocol/openid-connect/token";

async fn server_with_token() -> MockServer {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("idp_admin=debug")
        .with_test_writer()
        .try_init();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok",
            "expires_in": 300,
            "refresh_expires_in": 0,
            "token_type": "Bearer",
            "not-before-policy": 0,
            "scope": "profile email"
        })))
        .mount(&server)
        .await;
    server
}

fn config(server: &MockServer) -> ProviderConfig {
    ProviderConfig::new(server.uri(), "app", "test-api", "secret")
}

fn client(server: &MockServer) -> KeycloakAdminClient {
    KeycloakAdminClient::new(&config(server)).unwrap()
}

fn user_json(id: &str, username: &str) -> serde_json::Value {
    json!({
        "id": id,
        "username": username,
        "email": format!("{username}@example.com"),
        "emailVerified": true,
        "firstName": "John",
        "lastName": "Doe",
        "enabled": true,
        "totp": false
    })
}

fn role_json(id: &str, name: &str) -> serde_json::Value {
    json!({"id": id, "name": name, "composite": false, "clientRole": false})
}

#[tokio::test]
async fn reads_user() {
    let server = server_with_token().await;
    Mock::given(method("GET"))
        .and(path("/admin/realms/app/users/u-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("u-1", "jdoe")))
        .mount(&server)
        .await;

    let user = client(&server).get_user("u-1").await.unwrap();
    assert_eq!(user.username.as_deref(), Some("jdoe"));
    assert_eq!(user.email_verified, Some(true));
}

#[tokio::test]
async fn rejected_credentials_fail_the_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "unauthorized_client",
            "error_description": "Invalid client secret"
        })))
        .mount(&server)
        .await;

    let err = client(&server).get_user("u-1").await.unwrap_err();
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn missing_user_is_not_found() {
    let server = server_with_token().await;
    Mock::given(method("GET"))
        .and(path("/admin/realms/app/users/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "User not found"})))
        .mount(&server)
        .await;

    let err = client(&server).get_user("missing").await.unwrap_err();
    assert!(matches!(
        err,
        ProviderError::NotFound {
            resource: "User",
            ..
        }
    ));
}

#[tokio::test]
async fn server_error_passes_through() {
    let server = server_with_token().await;
    Mock::given(method("DELETE"))
        .and(path("/admin/realms/app/users/u-1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client(&server).delete_user("u-1").await.unwrap_err();
    assert!(matches!(err, ProviderError::Api { status: 500, .. }));
}

#[tokio::test]
async fn create_user_returns_new_id() {
    let server = server_with_token().await;
    Mock::given(method("POST"))
        .and(path("/admin/realms/app/users"))
        .and(body_partial_json(json!({
            "username": "jdoe",
            "enabled": true,
            "requiredActions": ["UPDATE_PASSWORD"]
        })))
        .respond_with(ResponseTemplate::new(201).insert_header(
            "Location",
            format!("{}/admin/realms/app/users/new-id", server.uri()),
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/realms/app/users"))
        .and(query_param("username", "jdoe"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([user_json("new-id", "jdoe")])),
        )
        .mount(&server)
        .await;

    let payload = UserRepresentation {
        username: Some("jdoe".to_string()),
        enabled: Some(true),
        required_actions: vec!["UPDATE_PASSWORD".to_string()],
        ..Default::default()
    };
    let id = client(&server).create_user(&payload).await.unwrap();
    assert_eq!(id, "new-id");
}

#[tokio::test]
async fn role_members_are_paged() {
    let server = server_with_token().await;
    let full_page: Vec<_> = (0..100)
        .map(|i| user_json(&format!("u-{i}"), &format!("user{i}")))
        .collect();
    Mock::given(method("GET"))
        .and(path("/admin/realms/app/roles/app-user/users"))
        .and(query_param("first", "0"))
        .and(query_param("max", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(full_page))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/realms/app/roles/app-user/users"))
        .and(query_param("first", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([user_json("u-100", "last")])))
        .expect(1)
        .mount(&server)
        .await;

    let members = client(&server)
        .get_realm_role_members("app-user")
        .await
        .unwrap();
    assert_eq!(members.len(), 101);
    assert_eq!(members[100].username.as_deref(), Some("last"));
}

#[tokio::test]
async fn user_id_lookup_is_exact() {
    let server = server_with_token().await;
    Mock::given(method("GET"))
        .and(path("/admin/realms/app/users"))
        .and(query_param("username", "jdoe"))
        .and(query_param("exact", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([user_json("u-1", "jdoe")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/realms/app/users"))
        .and(query_param("username", "ghost"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client(&server);
    assert_eq!(
        client.get_user_id("jdoe").await.unwrap(),
        Some("u-1".to_string())
    );
    assert_eq!(client.get_user_id("ghost").await.unwrap(), None);
}

#[tokio::test]
async fn sets_temporary_password() {
    let server = server_with_token().await;
    Mock::given(method("PUT"))
        .and(path("/admin/realms/app/users/u-1/reset-password"))
        .and(body_partial_json(json!({
            "type": "password",
            "value": "pw",
            "temporary": true
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .set_user_password("u-1", "pw", true)
        .await
        .unwrap();
}

#[tokio::test]
async fn assigns_realm_roles() {
    let server = server_with_token().await;
    Mock::given(method("POST"))
        .and(path("/admin/realms/app/users/u-1/role-mappings/realm"))
        .and(body_partial_json(json!([{"id": "r-1", "name": "editor"}])))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut role = RoleRepresentation::new("editor");
    role.id = Some("r-1".to_string());
    client(&server)
        .assign_realm_roles("u-1", &[role])
        .await
        .unwrap();
}

#[tokio::test]
async fn service_get_user_over_http() {
    let server = server_with_token().await;
    Mock::given(method("GET"))
        .and(path("/admin/realms/app/users"))
        .and(query_param("username", "jdoe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([user_json("u-1", "jdoe")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/realms/app/users/u-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("u-1", "jdoe")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/realms/app/users/u-1/role-mappings/realm"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            role_json("r-1", "app-user"),
            role_json("r-2", "editor")
        ])))
        .mount(&server)
        .await;

    let service = AdminService::connect(&AdminConfig::new(config(&server), "app-user")).unwrap();
    let user = service.get_user("jdoe").await.unwrap();

    assert_eq!(user.id.as_deref(), Some("u-1"));
    assert_eq!(user.email, "jdoe@example.com");
    assert!(user.email_verified);
    assert_eq!(
        user.roles,
        vec!["app-user".to_string(), "editor".to_string()]
    );
}
