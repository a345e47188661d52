//! Login and registration against a mocked users table.

use backend::errors::ErrorCode;
use backend::services::auth::{authenticate, register, LoginRequest};
use backend::services::users::UserRequest;

use crate::support::auth::test_tokens;
use crate::support::fixtures::{mock_db, no_users, user_model, PASSWORD};

#[tokio::test]
async fn test_login_issues_token_for_subject() {
    let conn = mock_db()
        .append_query_results([vec![user_model(7, "alice")]])
        .into_connection();
    let tokens = test_tokens();

    let response = authenticate(&conn, &tokens, &LoginRequest::new("alice", PASSWORD))
        .await
        .expect("login succeeds");

    assert_eq!(response.username, "alice");
    assert_eq!(response.user_id, 7);
    assert!(tokens.validate_token(&response.token, "alice"));
    assert_eq!(tokens.extract_username(&response.token).unwrap(), "alice");
}

#[tokio::test]
async fn test_wrong_password_is_bad_credentials() {
    let conn = mock_db()
        .append_query_results([vec![user_model(7, "alice")]])
        .into_connection();

    let err = authenticate(&conn, &test_tokens(), &LoginRequest::new("alice", "wrong-pass"))
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::BadCredentials);
}

#[tokio::test]
async fn test_unknown_user_is_indistinguishable_from_wrong_password() {
    let conn = mock_db()
        .append_query_results([no_users()])
        .into_connection();

    let err = authenticate(&conn, &test_tokens(), &LoginRequest::new("ghost", PASSWORD))
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::BadCredentials);
    assert_eq!(err.to_string(), "Unauthorized: Bad credentials");
}

#[tokio::test]
async fn test_disabled_account_is_refused() {
    let mut user = user_model(7, "alice");
    user.enabled = false;
    let conn = mock_db()
        .append_query_results([vec![user]])
        .into_connection();

    let err = authenticate(&conn, &test_tokens(), &LoginRequest::new("alice", PASSWORD))
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::AccountDisabled);
}

#[tokio::test]
async fn test_register_creates_user_and_logs_in() {
    let created = user_model(11, "carol");
    let conn = mock_db()
        // username check, email check, insert, login lookup
        .append_query_results([no_users(), no_users(), vec![created.clone()], vec![created]])
        .into_connection();
    let tokens = test_tokens();

    let response = register(
        &conn,
        &tokens,
        UserRequest::new("carol", "carol@example.com", PASSWORD),
    )
    .await
    .expect("registration succeeds");

    assert_eq!(response.username, "carol");
    assert_eq!(response.user_id, 11);
    assert!(tokens.validate_token(&response.token, "carol"));
}

#[tokio::test]
async fn test_register_with_taken_username_fails_before_insert() {
    let conn = mock_db()
        .append_query_results([vec![user_model(3, "carol")]])
        .into_connection();

    let err = register(
        &conn,
        &test_tokens(),
        UserRequest::new("carol", "carol@example.com", PASSWORD),
    )
    .await
    .unwrap_err();

    assert_eq!(err.code(), ErrorCode::UsernameTaken);
}
