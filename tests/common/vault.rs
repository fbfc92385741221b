//! Canned Hashicorp Vault responses served by a mockito server

use mockito::{Matcher, Mock, Server};
use serde_json::{json, Value};

use super::ROLE_NAME;

/// Client token handed out by [`mock_login`]
pub const SESSION_TOKEN: &str = "hvs.session-token";

fn role_path(suffix: &str) -> String {
    format!("/v1/auth/approle/role/{ROLE_NAME}/{suffix}")
}

/// Matches the KV v2 data path of `path`. vaultrs appends an empty query (`?`) to reads.
fn kv2_data_path(engine: &str, path: &str) -> Matcher {
    Matcher::Regex(format!(r"^/v1/{engine}/data/{path}\??$"))
}

/// Envelope Vault wraps around every response
fn envelope(data: Value, auth: Value) -> String {
    json!({
        "request_id": "2d2a5f3c-6f1c-4a0e-9b0c-1f1e0c1b2a3d",
        "lease_id": "",
        "renewable": false,
        "lease_duration": 0,
        "data": data,
        "wrap_info": null,
        "warnings": null,
        "auth": auth,
    })
    .to_string()
}

/// Serve `role_id` on the role-id endpoint for requests carrying `token`
pub async fn mock_role_id(server: &mut Server, token: &str, role_id: &str, hits: usize) -> Mock {
    server
        .mock("GET", role_path("role-id").as_str())
        .match_header("x-vault-token", token)
        .with_header("content-type", "application/json")
        .with_body(json!({ "data": { "id": role_id } }).to_string())
        .expect(hits)
        .create_async()
        .await
}

/// Serve `secret_id` on the secret-id endpoint for requests carrying `token`
pub async fn mock_secret_id(
    server: &mut Server,
    token: &str,
    secret_id: &str,
    hits: usize,
) -> Mock {
    server
        .mock("POST", role_path("secret-id").as_str())
        .match_header("x-vault-token", token)
        .with_header("content-type", "application/json")
        .with_body(json!({ "data": { "id": secret_id } }).to_string())
        .expect(hits)
        .create_async()
        .await
}

/// Fail the control API call at `suffix` (`role-id` or `secret-id`) with `status`
pub async fn mock_control_failure(
    server: &mut Server,
    method: &str,
    suffix: &str,
    status: usize,
    hits: usize,
) -> Mock {
    server
        .mock(method, role_path(suffix).as_str())
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(json!({ "errors": ["permission denied"] }).to_string())
        .expect(hits)
        .create_async()
        .await
}

/// Accept an AppRole login with the given pair and hand out [`SESSION_TOKEN`]
pub async fn mock_login(server: &mut Server, role_id: &str, secret_id: &str, hits: usize) -> Mock {
    server
        .mock("POST", "/v1/auth/approle/login")
        .match_body(Matcher::PartialJson(
            json!({ "role_id": role_id, "secret_id": secret_id }),
        ))
        .with_header("content-type", "application/json")
        .with_body(envelope(
            Value::Null,
            json!({
                "client_token": SESSION_TOKEN,
                "accessor": "0e9e354a-520f-df04-6867-ee81cae3d42d",
                "policies": ["default", "web"],
                "token_policies": ["default", "web"],
                "metadata": { "role_name": ROLE_NAME },
                "lease_duration": 1200,
                "renewable": true,
                "entity_id": "913160eb-837f-ee8c-e6aa-9ded162b5b75",
                "token_type": "service",
                "orphan": true,
            }),
        ))
        .expect(hits)
        .create_async()
        .await
}

/// Answer the AppRole login without any auth section
pub async fn mock_login_without_auth(server: &mut Server, hits: usize) -> Mock {
    server
        .mock("POST", "/v1/auth/approle/login")
        .with_header("content-type", "application/json")
        .with_body(envelope(Value::Null, Value::Null))
        .expect(hits)
        .create_async()
        .await
}

/// Reject the AppRole login
pub async fn mock_login_denied(server: &mut Server, hits: usize) -> Mock {
    server
        .mock("POST", "/v1/auth/approle/login")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(json!({ "errors": ["invalid role or secret ID"] }).to_string())
        .expect(hits)
        .create_async()
        .await
}

/// Serve `data` as the latest version of `path` in the KV v2 engine `engine`,
/// only for requests authorized with [`SESSION_TOKEN`]
pub async fn mock_kv2_read(
    server: &mut Server,
    engine: &str,
    path: &str,
    data: Value,
    hits: usize,
) -> Mock {
    server
        .mock("GET", kv2_data_path(engine, path))
        .match_header("x-vault-token", SESSION_TOKEN)
        .with_header("content-type", "application/json")
        .with_body(envelope(
            json!({
                "data": data,
                "metadata": {
                    "created_time": "2018-03-22T02:24:06.945319214Z",
                    "custom_metadata": {},
                    "deletion_time": "",
                    "destroyed": false,
                    "version": 1,
                },
            }),
            Value::Null,
        ))
        .expect(hits)
        .create_async()
        .await
}

/// Report `path` as absent from the KV v2 engine `engine`
pub async fn mock_kv2_missing(server: &mut Server, engine: &str, path: &str, hits: usize) -> Mock {
    server
        .mock("GET", kv2_data_path(engine, path))
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(json!({ "errors": [] }).to_string())
        .expect(hits)
        .create_async()
        .await
}
