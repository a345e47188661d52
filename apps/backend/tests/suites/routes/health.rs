use actix_web::http::StatusCode;
use actix_web::test;

use crate::common::json_body;
use crate::support::auth::state_for_profile;
use crate::support::create_test_app;

#[actix_web::test]
async fn test_health_without_database_is_503() {
    let app = create_test_app(state_for_profile("prod"))
        .with_prod_routes()
        .build()
        .await;

    let req = test::TestRequest::get().uri("/actuator/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(resp).await;
    assert_eq!(body["status"], "DOWN");
    assert_eq!(body["db"], "DOWN");
    assert_eq!(body["app_version"], env!("CARGO_PKG_VERSION"));
    assert!(body["time"].is_string());
}
