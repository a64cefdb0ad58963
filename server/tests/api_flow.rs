mod common;

use axum::http::StatusCode;
use fixtures::{test_state, MemoryStore, TEST_JWT_SECRET};
use quill::api::{API_LOGIN_REJECTION, API_USER_REJECTION};
use quill::routes::routes;
use quill::token::{JwtConfig, TOKEN_REJECTION};

use common::send_json;

const PASSWORD: &str = "a perfectly long password";

#[tokio::test]
async fn api_login_answers_with_a_verifiable_token() {
    let store = MemoryStore::new();
    let alice = store.seed_user("alice", "alice@example.com", PASSWORD);
    let app = routes(test_state(store));

    let (parts, body) = send_json(
        &app,
        "POST",
        "/api/login",
        serde_json::json!({ "username": "alice", "password": PASSWORD }),
    )
    .await;

    assert_eq!(parts.status, StatusCode::OK);
    let token: String = serde_json::from_str(&body).expect("token as JSON string");

    let claims = JwtConfig::new(TEST_JWT_SECRET)
        .verify(&token)
        .expect("token verifies");
    assert_eq!(claims.user_id, alice.user_id);
}

#[tokio::test]
async fn api_login_rejects_bad_credentials_with_the_fixed_string() {
    let store = MemoryStore::new();
    store.seed_user("alice", "alice@example.com", PASSWORD);
    let app = routes(test_state(store));

    let (_, body) = send_json(
        &app,
        "POST",
        "/api/login",
        serde_json::json!({ "username": "alice", "password": "wrong" }),
    )
    .await;
    assert_eq!(body, format!("\"{API_LOGIN_REJECTION}\""));

    // Unknown usernames read exactly the same.
    let (_, body) = send_json(
        &app,
        "POST",
        "/api/login",
        serde_json::json!({ "username": "ghost", "password": PASSWORD }),
    )
    .await;
    assert_eq!(body, format!("\"{API_LOGIN_REJECTION}\""));
}

#[tokio::test]
async fn posts_endpoint_requires_a_valid_token() {
    let store = MemoryStore::new();
    store.seed_user("alice", "alice@example.com", PASSWORD);
    let app = routes(test_state(store));

    // Garbage token.
    let (_, body) = send_json(
        &app,
        "GET",
        "/api/postsByUsername/alice",
        serde_json::json!({ "token": "not-a-token" }),
    )
    .await;
    assert_eq!(body, format!("\"{TOKEN_REJECTION}\""));

    // Missing token field.
    let (_, body) = send_json(
        &app,
        "GET",
        "/api/postsByUsername/alice",
        serde_json::json!({}),
    )
    .await;
    assert_eq!(body, format!("\"{TOKEN_REJECTION}\""));

    // Token signed with the wrong secret.
    let forged = JwtConfig::new("somebody-elses-secret")
        .sign(uuid::Uuid::new_v4())
        .unwrap();
    let (_, body) = send_json(
        &app,
        "GET",
        "/api/postsByUsername/alice",
        serde_json::json!({ "token": forged }),
    )
    .await;
    assert_eq!(body, format!("\"{TOKEN_REJECTION}\""));
}

#[tokio::test]
async fn valid_token_reads_an_authors_posts() {
    let store = MemoryStore::new();
    let alice = store.seed_user("alice", "alice@example.com", PASSWORD);
    let bob = store.seed_user("bob", "bob@example.com", PASSWORD);
    store.seed_post(&alice, "Field notes", "Two herons on the reservoir today.");
    let app = routes(test_state(store));

    let token = JwtConfig::new(TEST_JWT_SECRET).sign(bob.user_id).unwrap();

    let (parts, body) = send_json(
        &app,
        "GET",
        "/api/postsByUsername/alice",
        serde_json::json!({ "token": token }),
    )
    .await;

    assert_eq!(parts.status, StatusCode::OK);
    let posts: serde_json::Value = serde_json::from_str(&body).unwrap();
    let posts = posts.as_array().expect("JSON array");
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["title"], "Field notes");
    assert_eq!(posts[0]["author_username"], "alice");
}

#[tokio::test]
async fn valid_token_and_quiet_author_reads_an_empty_array() {
    let store = MemoryStore::new();
    let alice = store.seed_user("alice", "alice@example.com", PASSWORD);
    let app = routes(test_state(store));

    let token = JwtConfig::new(TEST_JWT_SECRET).sign(alice.user_id).unwrap();

    let (_, body) = send_json(
        &app,
        "GET",
        "/api/postsByUsername/alice",
        serde_json::json!({ "token": token }),
    )
    .await;

    assert_eq!(body, "[]");
}

#[tokio::test]
async fn unknown_author_reads_the_fixed_user_rejection() {
    let store = MemoryStore::new();
    let alice = store.seed_user("alice", "alice@example.com", PASSWORD);
    let app = routes(test_state(store));

    let token = JwtConfig::new(TEST_JWT_SECRET).sign(alice.user_id).unwrap();

    let (_, body) = send_json(
        &app,
        "GET",
        "/api/postsByUsername/ghost",
        serde_json::json!({ "token": token }),
    )
    .await;

    assert_eq!(body, format!("\"{API_USER_REJECTION}\""));
}
