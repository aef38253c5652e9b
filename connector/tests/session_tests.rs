/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

mod common;

use axum::http::{Method, StatusCode};
use common::*;
use connector::*;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_login_success_authenticates_and_persists() {
    let api = MockApi::new()
        .get("users/bob", &[("embed", "team")], json!({"user": user_json("bob", "admin")}))
        .start()
        .await;
    let store = Arc::new(MemoryStore::new());
    let config = api.config(Session::restore(Box::new(Arc::clone(&store))).unwrap());

    let user = auth::login(&config, "bob", "pw").await.unwrap();

    assert_eq!(user.name, "bob");
    assert!(config.session.is_authenticated());
    assert!(config.session.is_admin());
    assert_eq!(config.session.token().as_deref(), Some(BOB_TOKEN));

    let record = store.load().unwrap().unwrap();
    assert_eq!(record.token, BOB_TOKEN);
    assert_eq!(record.user.name, "bob");

    let requests = api.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].authorization.as_deref(),
        Some("Basic Ym9iOnB3")
    );
}

#[tokio::test]
async fn test_login_failure_is_unauthorized_and_not_persisted() {
    let api = MockApi::new()
        .route(
            Method::GET,
            "users/bob",
            &[],
            StatusCode::UNAUTHORIZED,
            json!({"message": "invalid credentials"}),
        )
        .start()
        .await;
    let store = Arc::new(MemoryStore::new());
    let config = api.config(Session::restore(Box::new(Arc::clone(&store))).unwrap());

    let err = auth::login(&config, "bob", "wrong").await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(config.session.is_unauthorized());
    assert!(!config.session.is_authenticated());
    assert!(config.session.token().is_none());
    assert!(store.load().unwrap().is_none());
}

#[tokio::test]
async fn test_login_server_error_leaves_session_unauthorized() {
    let api = MockApi::new()
        .route(
            Method::GET,
            "users/bob",
            &[],
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"message": "boom"}),
        )
        .start()
        .await;
    let config = api.config(Session::in_memory());

    let err = auth::login(&config, "bob", "pw").await.unwrap_err();

    assert!(matches!(err, Error::Status { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR));
    assert!(config.session.is_unauthorized());
    assert!(config.session.token().is_none());
}

#[tokio::test]
async fn test_non_admin_team_is_not_admin() {
    let api = MockApi::new()
        .get("users/bob", &[], json!({"user": user_json("bob", "partner")}))
        .start()
        .await;
    let config = api.config(Session::in_memory());

    auth::login(&config, "bob", "pw").await.unwrap();

    assert!(config.session.is_authenticated());
    assert!(!config.session.is_admin());
}

#[tokio::test]
async fn test_mid_session_401_flips_state_without_logout() {
    let api = MockApi::new()
        .get("users/bob", &[], json!({"user": user_json("bob", "admin")}))
        .route(
            Method::GET,
            "remotecis",
            &[],
            StatusCode::UNAUTHORIZED,
            json!({"message": "expired"}),
        )
        .start()
        .await;
    let config = api.config(Session::in_memory());
    auth::login(&config, "bob", "pw").await.unwrap();
    let watcher = config.session.subscribe();

    let err = remotecis::get_remotecis(&config, 1).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!config.session.is_authenticated());
    assert!(config.session.is_unauthorized());
    assert!(watcher.has_changed().unwrap());
    assert_eq!(watcher.borrow().state, SessionState::Unauthorized);
}

#[tokio::test]
async fn test_disconnected_call_never_reaches_network() {
    let api = MockApi::new()
        .get("jobs", &[], json!({"jobs": [], "_meta": {"count": 0}}))
        .start()
        .await;
    let config = api.config(Session::in_memory());

    let err = jobs::get_jobs(&config, 1).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(api.requests().is_empty());
    assert_eq!(config.session.state(), SessionState::Disconnected);
}

#[tokio::test]
async fn test_logout_disconnects_without_network() {
    let api = MockApi::new().start().await;
    let config = api.authenticated();
    assert!(config.session.is_authenticated());

    auth::logout(&config).unwrap();

    assert_eq!(config.session.state(), SessionState::Disconnected);
    assert!(config.session.user().is_none());
    assert!(api.requests().is_empty());

    let err = remotecis::get_remotecis(&config, 1).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(api.requests().is_empty());
}

#[tokio::test]
async fn test_restored_session_sends_persisted_token() {
    let api = MockApi::new()
        .get("remotecis", &[], json!({"remotecis": []}))
        .start()
        .await;
    let config = api.authenticated();

    remotecis::get_remotecis(&config, 1).await.unwrap();

    assert_eq!(
        api.requests()[0].authorization.as_deref(),
        Some("Basic Ym9iOnB3")
    );
}

#[tokio::test]
async fn test_login_encodes_username_in_path() {
    let api = MockApi::new()
        .get(
            "users/bo%23b",
            &[("embed", "team")],
            json!({"user": user_json("bo#b", "partner")}),
        )
        .start()
        .await;
    let config = api.config(Session::in_memory());

    let user = auth::login(&config, "bo#b", "pw").await.unwrap();

    assert_eq!(user.name, "bo#b");
    assert_eq!(api.hits("users/bo%23b"), 1);
    assert_eq!(api.hits("users/bo"), 0);
}
