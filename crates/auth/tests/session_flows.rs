//! Auth flows end to end against a mock GraphQL endpoint.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use {
    convene_auth::{
        AuthProvider, AuthState, CredentialStore, JsonFileStore, KeyValueStore, MemoryStore, keys,
        routes,
    },
    convene_gateway::OperationGateway,
    mockito::{Matcher, Server},
    serde_json::json,
};

fn provider(server: &Server, storage: Arc<dyn KeyValueStore>) -> AuthProvider {
    let credentials = Arc::new(CredentialStore::init(storage).unwrap());
    let gateway =
        OperationGateway::http(&format!("{}/graphql/", server.url()), credentials.clone()).unwrap();
    AuthProvider::new(gateway, credentials)
}

fn body(root: &str, payload: serde_json::Value) -> String {
    json!({ "data": { root: payload } }).to_string()
}

#[tokio::test]
async fn login_persists_token_and_authorizes_next_call() {
    let mut server = Server::new_async().await;
    let login = server
        .mock("POST", "/graphql/")
        .match_header("authorization", Matcher::Missing)
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r"\{ auth\(".into()),
            Matcher::PartialJson(json!({ "variables": { "email": "a@b.com", "password": "x" } })),
        ]))
        .with_status(200)
        .with_body(body(
            "auth",
            json!({
                "success": true,
                "message": "Welcome",
                "token": "abc123",
                "user": { "id": 1, "email": "a@b.com", "isAdmin": true }
            }),
        ))
        .create_async()
        .await;
    let me = server
        .mock("POST", "/graphql/")
        .match_header("authorization", "Bearer abc123")
        .match_body(Matcher::Regex(r"query \{ me ".into()))
        .with_status(200)
        .with_body(body("me", json!({ "id": 1, "email": "a@b.com" })))
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(JsonFileStore::new(dir.path().join("session.json")));
    let auth = provider(&server, storage.clone());

    let outcome = auth.login("  a@b.com ", "x").await.unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.redirect_to, Some(routes::HOME));
    assert_eq!(auth.credentials().state(), AuthState::Authenticated);
    assert_eq!(storage.get(keys::TOKEN).unwrap().as_deref(), Some("abc123"));
    assert!(auth.credentials().identity().unwrap().is_admin());

    let user = auth.identity().await.unwrap();
    assert_eq!(user.id, 1);

    login.assert_async().await;
    me.assert_async().await;
}

#[tokio::test]
async fn rejected_login_persists_nothing() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/graphql/")
        .with_status(200)
        .with_body(body(
            "auth",
            json!({ "success": false, "message": "Invalid credentials" }),
        ))
        .create_async()
        .await;

    let storage = Arc::new(MemoryStore::new());
    let auth = provider(&server, storage.clone());

    let outcome = auth.login("a@b.com", "wrong").await.unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.message.as_deref(), Some("Invalid credentials"));
    assert_eq!(auth.credentials().state(), AuthState::Anonymous);
    assert!(storage.is_empty());
}

#[tokio::test]
async fn login_transport_failure_is_an_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/graphql/")
        .with_status(500)
        .create_async()
        .await;

    let storage = Arc::new(MemoryStore::new());
    let auth = provider(&server, storage.clone());
    let err = auth.login("a@b.com", "x").await.unwrap_err();
    assert!(err.is_transport());
    assert!(storage.is_empty());
}

#[tokio::test]
async fn logout_clears_every_key() {
    let server = Server::new_async().await;
    let storage = Arc::new(MemoryStore::new());
    for key in keys::ALL {
        storage.set(key, "1").unwrap();
    }
    let auth = provider(&server, storage.clone());
    assert!(auth.check().authenticated);

    let outcome = auth.logout().unwrap();
    assert_eq!(outcome.redirect_to, Some(routes::LOGIN));
    assert!(storage.is_empty());
    assert!(!auth.check().authenticated);
}

#[tokio::test]
async fn identity_failure_sets_need_auth_but_keeps_token() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/graphql/")
        .with_status(200)
        .with_body(json!({ "data": { "me": null }, "errors": [{ "message": "Signature has expired" }] }).to_string())
        .create_async()
        .await;

    let storage = Arc::new(MemoryStore::new());
    storage.set(keys::TOKEN, "stale").unwrap();
    let auth = provider(&server, storage.clone());

    assert!(auth.identity().await.is_err());
    assert!(auth.credentials().needs_reauth());
    assert_eq!(storage.get(keys::NEED_AUTH).unwrap().as_deref(), Some("1"));
    assert_eq!(storage.get(keys::TOKEN).unwrap().as_deref(), Some("stale"));
    assert!(auth.check().authenticated);
}

#[tokio::test]
async fn recovery_flow_carries_email_and_code_into_password_change() {
    let mut server = Server::new_async().await;
    let forgot = server
        .mock("POST", "/graphql/")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r"forgotPassword\(".into()),
            Matcher::PartialJson(json!({ "variables": { "email": "a@b.com" } })),
        ]))
        .with_status(200)
        .with_body(body("forgotPassword", json!({ "success": true, "message": "Code sent" })))
        .create_async()
        .await;
    let verify = server
        .mock("POST", "/graphql/")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r"verifyOtp\(".into()),
            Matcher::PartialJson(json!({ "variables": { "email": "a@b.com", "otp": "123456" } })),
        ]))
        .with_status(200)
        .with_body(body("verifyOtp", json!({ "success": true, "message": "Verified" })))
        .create_async()
        .await;
    let change = server
        .mock("POST", "/graphql/")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r"userChangePassword\(".into()),
            Matcher::PartialJson(json!({
                "variables": { "email": "a@b.com", "otp": "123456", "password": "n3w" }
            })),
        ]))
        .with_status(200)
        .with_body(body(
            "userChangePassword",
            json!({ "success": true, "message": "Password changed", "token": "fresh", "user": { "id": 1 } }),
        ))
        .create_async()
        .await;

    let storage = Arc::new(MemoryStore::new());
    let auth = provider(&server, storage.clone());

    let outcome = auth.forgot_password(" a@b.com").await.unwrap();
    assert_eq!(outcome.redirect_to, Some(routes::VERIFY_OTP));
    let outcome = auth.verify_otp("123456").await.unwrap();
    assert_eq!(outcome.redirect_to, Some(routes::CHANGE_PASSWORD));
    assert_eq!(storage.get(keys::RECOVER_EMAIL).unwrap().as_deref(), Some("a@b.com"));
    assert_eq!(storage.get(keys::RECOVER_OTP).unwrap().as_deref(), Some("123456"));

    let outcome = auth.update_password("n3w").await.unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.redirect_to, Some(routes::HOME));
    assert_eq!(storage.get(keys::TOKEN).unwrap().as_deref(), Some("fresh"));

    forgot.assert_async().await;
    verify.assert_async().await;
    change.assert_async().await;
}

#[tokio::test]
async fn password_change_without_code_is_an_application_failure() {
    let mut server = Server::new_async().await;
    let change = server
        .mock("POST", "/graphql/")
        .match_body(Matcher::PartialJson(json!({
            "variables": { "email": "a@b.com", "otp": null, "password": "n3w" }
        })))
        .with_status(200)
        .with_body(body(
            "userChangePassword",
            json!({ "success": false, "message": "Invalid OTP" }),
        ))
        .create_async()
        .await;

    let storage = Arc::new(MemoryStore::new());
    storage.set(keys::RECOVER_EMAIL, "a@b.com").unwrap();
    let auth = provider(&server, storage.clone());

    let outcome = auth.update_password("n3w").await.unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.message.as_deref(), Some("Invalid OTP"));
    assert!(storage.get(keys::TOKEN).unwrap().is_none());
    change.assert_async().await;
}

#[tokio::test]
async fn rejected_code_is_still_recorded() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/graphql/")
        .with_status(200)
        .with_body(body("verifyOtp", json!({ "success": false, "message": "Invalid OTP" })))
        .create_async()
        .await;

    let storage = Arc::new(MemoryStore::new());
    let auth = provider(&server, storage.clone());
    let outcome = auth.verify_otp("000000").await.unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.redirect_to, Some(routes::CHANGE_PASSWORD));
    assert_eq!(storage.get(keys::RECOVER_OTP).unwrap().as_deref(), Some("000000"));
}

#[tokio::test]
async fn code_is_not_recorded_when_the_call_fails() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/graphql/")
        .with_status(503)
        .create_async()
        .await;

    let storage = Arc::new(MemoryStore::new());
    let auth = provider(&server, storage.clone());
    assert!(auth.verify_otp("123456").await.is_err());
    assert!(storage.get(keys::RECOVER_OTP).unwrap().is_none());
}
