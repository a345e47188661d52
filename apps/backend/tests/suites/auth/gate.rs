//! Request gate behaviour observed through echo handlers.

use std::sync::Arc;

use actix_web::dev::Service;
use actix_web::http::StatusCode;
use actix_web::{test, web, App, HttpMessage};
use backend::auth::identity::Identity;
use backend::middleware::{AccessControl, JwtAuthenticate};
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use serde_json::Value;

use crate::common::json_body;
use crate::support::auth::{
    alice, bearer, expired_token_for, state_for_profile, tamper_signature, token_for, whoami,
    FailingIdentities, InMemoryIdentities,
};
use crate::support::create_test_app;

fn whoami_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/v1/users/whoami", web::get().to(whoami))
        .route("/api/v1/auth/login", web::get().to(whoami));
}

fn identities() -> Arc<InMemoryIdentities> {
    Arc::new(InMemoryIdentities::default().with(alice()))
}

#[actix_web::test]
async fn test_valid_token_attaches_identity() {
    let app = create_test_app(state_for_profile("prod"))
        .with_identities(identities())
        .with_routes(whoami_routes)
        .build()
        .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/users/whoami")
        .insert_header(bearer(&token_for("alice")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["identity"]["username"], "alice");
    assert_eq!(body["identity"]["user_id"], 1);
}

#[actix_web::test]
async fn test_public_path_without_header_is_exempt() {
    let app = create_test_app(state_for_profile("prod"))
        .with_identities(identities())
        .with_routes(whoami_routes)
        .build()
        .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/login")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["identity"], Value::Null);
}

#[actix_web::test]
async fn test_public_path_ignores_bearer_token() {
    let app = create_test_app(state_for_profile("prod"))
        .with_identities(identities())
        .with_routes(whoami_routes)
        .build()
        .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/login")
        .insert_header(bearer(&token_for("alice")))
        .to_request();
    let body = json_body(test::call_service(&app, req).await).await;

    assert_eq!(body["identity"], Value::Null);
}

#[actix_web::test]
async fn test_expired_token_is_rejected_with_401() {
    let app = create_test_app(state_for_profile("prod"))
        .with_identities(identities())
        .with_routes(whoami_routes)
        .build()
        .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/users/whoami")
        .insert_header(bearer(&expired_token_for("alice")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(
        resp,
        "UNAUTHORIZED",
        StatusCode::UNAUTHORIZED,
        None,
    )
    .await;
}

#[actix_web::test]
async fn test_unusable_credentials_leave_request_unauthenticated() {
    let app = create_test_app(state_for_profile("prod"))
        .with_identities(identities())
        .with_routes(whoami_routes)
        .build()
        .await;

    let headers = [
        ("Authorization", format!("Bearer {}", tamper_signature(&token_for("alice")))),
        ("Authorization", format!("Bearer {}", token_for("mallory"))),
        ("Authorization", "Bearer not-a-token".to_string()),
        ("Authorization", format!("bearer {}", token_for("alice"))),
        ("Authorization", "Basic YWxpY2U6c2VjcmV0".to_string()),
    ];

    for header in headers {
        let req = test::TestRequest::get()
            .uri("/api/v1/users/whoami")
            .insert_header(header.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.status(),
            StatusCode::UNAUTHORIZED,
            "header {:?} should not authenticate",
            header.1
        );
    }
}

#[actix_web::test]
async fn test_lookup_failure_degrades_to_unauthenticated() {
    let app = create_test_app(state_for_profile("prod"))
        .with_identities(Arc::new(FailingIdentities))
        .with_routes(whoami_routes)
        .build()
        .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/users/whoami")
        .insert_header(bearer(&token_for("alice")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_existing_identity_is_left_untouched() {
    let data = web::Data::new(state_for_profile("prod").with_identity_lookup(identities()));

    let app = test::init_service(
        App::new()
            .wrap(AccessControl)
            .wrap(JwtAuthenticate)
            // Runs before the gate: pretend an earlier layer authenticated bob
            .wrap_fn(|req, srv| {
                req.extensions_mut().insert(Identity::new(2, "bob"));
                srv.call(req)
            })
            .app_data(data)
            .route("/api/v1/users/whoami", web::get().to(whoami)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/users/whoami")
        .insert_header(bearer(&token_for("alice")))
        .to_request();
    let body = json_body(test::call_service(&app, req).await).await;

    assert_eq!(body["identity"]["username"], "bob");
}

#[actix_web::test]
async fn test_rejection_trace_id_matches_request_id() {
    let app = create_test_app(state_for_profile("prod"))
        .with_identities(identities())
        .with_routes(whoami_routes)
        .build()
        .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/users/whoami")
        .to_request();
    let resp = test::call_service(&app, req).await;

    let request_id = resp
        .headers()
        .get("x-request-id")
        .expect("x-request-id header")
        .to_str()
        .unwrap()
        .to_string();
    let trace_id = resp
        .headers()
        .get("x-trace-id")
        .expect("x-trace-id header")
        .to_str()
        .unwrap()
        .to_string();
    assert_eq!(request_id, trace_id);
}
