//! `/api/v1/users` end to end, backed by a mocked database.

use std::collections::BTreeMap;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test;
use backend::config::profile::RuntimeProfile;
use backend::state::app_state::AppState;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use sea_orm::{MockDatabase, MockExecResult};
use serde_json::json;

use crate::common::json_body;
use crate::support::auth::{alice, bearer, test_tokens, token_for, InMemoryIdentities};
use crate::support::create_test_app;
use crate::support::fixtures::{mock_db, no_users, user_model, PASSWORD};

fn state_with(db: MockDatabase) -> AppState {
    AppState::new(db.into_connection(), test_tokens(), RuntimeProfile::new("prod"))
        .with_identity_lookup(Arc::new(InMemoryIdentities::default().with(alice())))
}

fn alice_header() -> (&'static str, String) {
    bearer(&token_for("alice"))
}

#[actix_web::test]
async fn test_me_returns_token_owner() {
    let app = create_test_app(state_with(
        mock_db().append_query_results([vec![user_model(1, "alice")]]),
    ))
    .with_prod_routes()
    .build()
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/users/me")
        .insert_header(alice_header())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["roles"], json!(["USER"]));
    assert!(body.get("passwordHash").is_none());
}

#[actix_web::test]
async fn test_users_require_token() {
    let app = create_test_app(state_with(mock_db()))
        .with_prod_routes()
        .build()
        .await;

    let req = test::TestRequest::get().uri("/api/v1/users").to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(
        resp,
        "UNAUTHORIZED",
        StatusCode::UNAUTHORIZED,
        Some("Authentication required"),
    )
    .await;
}

#[actix_web::test]
async fn test_list_users() {
    let app = create_test_app(state_with(
        mock_db().append_query_results([vec![user_model(1, "alice"), user_model(2, "bob")]]),
    ))
    .with_prod_routes()
    .build()
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/users")
        .insert_header(alice_header())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    let names: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["alice", "bob"]);
}

#[actix_web::test]
async fn test_get_missing_user_is_404() {
    let app = create_test_app(state_with(mock_db().append_query_results([no_users()])))
        .with_prod_routes()
        .build()
        .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/users/42")
        .insert_header(alice_header())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(
        resp,
        "USER_NOT_FOUND",
        StatusCode::NOT_FOUND,
        Some("User not found with id: 42"),
    )
    .await;
}

#[actix_web::test]
async fn test_create_user_returns_201() {
    let mut created = user_model(5, "dave");
    created.first_name = Some("Dave".to_string());
    let app = create_test_app(state_with(
        mock_db().append_query_results([no_users(), no_users(), vec![created]]),
    ))
    .with_prod_routes()
    .build()
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/users")
        .insert_header(alice_header())
        .set_json(json!({
            "username": "dave",
            "email": "dave@example.com",
            "password": PASSWORD,
            "firstName": "Dave"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    assert_eq!(body["id"], 5);
    assert_eq!(body["firstName"], "Dave");
}

#[actix_web::test]
async fn test_create_duplicate_username_is_400() {
    let app = create_test_app(state_with(
        mock_db().append_query_results([vec![user_model(2, "bob")]]),
    ))
    .with_prod_routes()
    .build()
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/users")
        .insert_header(alice_header())
        .set_json(json!({
            "username": "bob",
            "email": "other@example.com",
            "password": PASSWORD
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(
        resp,
        "USERNAME_TAKEN",
        StatusCode::BAD_REQUEST,
        None,
    )
    .await;
}

#[actix_web::test]
async fn test_create_rejects_invalid_body_before_touching_db() {
    let app = create_test_app(state_with(mock_db()))
        .with_prod_routes()
        .build()
        .await;

    let cases = BTreeMap::from([
        (
            "INVALID_EMAIL",
            json!({"username": "erin", "email": "nope", "password": PASSWORD}),
        ),
        (
            "INVALID_USERNAME",
            json!({"username": "er", "email": "erin@example.com", "password": PASSWORD}),
        ),
        ("BAD_REQUEST", json!({"username": "erin"})),
    ]);

    for (code, payload) in cases {
        let req = test::TestRequest::post()
            .uri("/api/v1/users")
            .insert_header(alice_header())
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_problem_details_from_service_response(resp, code, StatusCode::BAD_REQUEST, None)
            .await;
    }
}

#[actix_web::test]
async fn test_delete_user_returns_204() {
    let app = create_test_app(state_with(
        mock_db()
            .append_query_results([vec![user_model(2, "bob")]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }]),
    ))
    .with_prod_routes()
    .build()
    .await;

    let req = test::TestRequest::delete()
        .uri("/api/v1/users/2")
        .insert_header(alice_header())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn test_routes_without_database_are_503() {
    let state = AppState::without_db(test_tokens(), RuntimeProfile::new("prod"))
        .with_identity_lookup(Arc::new(InMemoryIdentities::default().with(alice())));
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get()
        .uri("/api/v1/users")
        .insert_header(alice_header())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(
        resp,
        "DB_UNAVAILABLE",
        StatusCode::SERVICE_UNAVAILABLE,
        None,
    )
    .await;
}
