//! User service against a mocked users table.

use std::collections::BTreeSet;

use backend::auth::password::verify_password;
use backend::entities::users;
use backend::errors::ErrorCode;
use backend::services::users::{
    create_user, delete_user, get_user, get_user_by_username, list_users, update_user,
    UserRequest,
};
use sea_orm::{DatabaseBackend, MockExecResult, Transaction};

use crate::support::fixtures::{mock_db, no_users, user_model, PASSWORD};

/// SQL up to the `RETURNING` clause, which always lists every column.
fn without_returning(logged: &Transaction) -> String {
    let sql = &logged.statements()[0].sql;
    sql.split("RETURNING").next().unwrap_or_default().to_string()
}

/// Debug rendering of the bound values.
fn bound_values(logged: &Transaction) -> String {
    format!("{:?}", logged.statements()[0].values)
}

#[tokio::test]
async fn test_list_users_maps_rows() {
    let conn = mock_db()
        .append_query_results([vec![user_model(1, "alice"), user_model(2, "bob")]])
        .into_connection();

    let users = list_users(&conn).await.unwrap();

    assert_eq!(users.len(), 2);
    assert_eq!(users[1].username, "bob");
    assert_eq!(users[1].roles, BTreeSet::from(["USER".to_string()]));
}

#[tokio::test]
async fn test_lookups_report_missing_users() {
    let conn = mock_db()
        .append_query_results([no_users(), no_users()])
        .into_connection();

    let err = get_user(&conn, 9).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::UserNotFound);

    let err = get_user_by_username(&conn, "ghost").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::UserNotFound);
    assert!(err.to_string().contains("ghost"));
}

#[tokio::test]
async fn test_create_hashes_password_and_defaults_roles() {
    let conn = mock_db()
        .append_query_results([no_users(), no_users(), vec![user_model(4, "dana")]])
        .into_connection();

    let dto = create_user(&conn, UserRequest::new("dana", "dana@example.com", PASSWORD))
        .await
        .unwrap();
    assert_eq!(dto.id, 4);

    let log = conn.into_transaction_log();
    assert_eq!(log.len(), 3);
    assert!(log[2].statements()[0].sql.starts_with(r#"INSERT INTO "users""#));
    let values = bound_values(&log[2]);
    assert!(!values.contains(PASSWORD), "raw password must never reach the database");
    assert!(values.contains("USER"));
}

#[tokio::test]
async fn test_create_requires_password() {
    let conn = mock_db()
        .append_query_results([no_users(), no_users()])
        .into_connection();
    let mut request = UserRequest::new("dana", "dana@example.com", "");
    request.password = None;

    let err = create_user(&conn, request).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::InvalidPassword);
}

#[tokio::test]
async fn test_create_with_taken_email() {
    let conn = mock_db()
        .append_query_results([no_users(), vec![user_model(2, "bob")]])
        .into_connection();

    let err = create_user(&conn, UserRequest::new("dana", "bob@example.com", PASSWORD))
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::EmailTaken);
}

#[tokio::test]
async fn test_update_unchanged_identity_skips_uniqueness_checks() {
    let mut updated = user_model(2, "bob");
    updated.first_name = Some("Robert".to_string());
    let conn = mock_db()
        // lookup, update
        .append_query_results([vec![user_model(2, "bob")], vec![updated]])
        .into_connection();

    let mut request = UserRequest::new("bob", "bob@example.com", "");
    request.first_name = Some("Robert".to_string());

    let dto = update_user(&conn, 2, request).await.unwrap();
    assert_eq!(dto.first_name.as_deref(), Some("Robert"));

    let log = conn.into_transaction_log();
    assert_eq!(log.len(), 2);
    let update = without_returning(&log[1]);
    assert!(update.starts_with(r#"UPDATE "users""#));
    assert!(!update.contains(r#""password_hash""#));
    assert!(!update.contains(r#""roles""#));
}

#[tokio::test]
async fn test_update_rejects_username_owned_by_someone_else() {
    let conn = mock_db()
        .append_query_results([vec![user_model(2, "bob")], vec![user_model(1, "alice")]])
        .into_connection();

    let err = update_user(&conn, 2, UserRequest::new("alice", "bob@example.com", ""))
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::UsernameTaken);
}

#[tokio::test]
async fn test_update_replaces_password_and_roles_when_supplied() {
    let mut stored = user_model(2, "bob");
    stored.roles = serde_json::json!(["ADMIN", "USER"]);
    let conn = mock_db()
        .append_query_results([vec![user_model(2, "bob")], vec![stored]])
        .into_connection();

    let mut request = UserRequest::new("bob", "bob@example.com", "new-password");
    request.roles = Some(BTreeSet::from(["ADMIN".to_string(), "USER".to_string()]));

    let dto = update_user(&conn, 2, request).await.unwrap();
    assert!(dto.roles.contains("ADMIN"));

    let log = conn.into_transaction_log();
    assert!(without_returning(&log[1]).contains(r#""password_hash""#));
    assert!(!bound_values(&log[1]).contains("new-password"));
}

#[tokio::test]
async fn test_update_missing_user() {
    let conn = mock_db()
        .append_query_results([no_users()])
        .into_connection();

    let err = update_user(&conn, 77, UserRequest::new("bob", "bob@example.com", ""))
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::UserNotFound);
}

#[tokio::test]
async fn test_delete_checks_existence_first() {
    let conn = mock_db()
        .append_query_results([no_users()])
        .into_connection();
    let err = delete_user(&conn, 3).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::UserNotFound);

    let conn = mock_db()
        .append_query_results([vec![user_model(3, "carl")]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    delete_user(&conn, 3).await.unwrap();

    let log = conn.into_transaction_log();
    assert_eq!(
        log[1],
        Transaction::from_sql_and_values(
            DatabaseBackend::Postgres,
            r#"DELETE FROM "users" WHERE "users"."id" = $1"#,
            [3i64.into()],
        )
    );
}

#[tokio::test]
async fn test_fixture_hash_matches_fixture_password() {
    let model: users::Model = user_model(1, "alice");
    assert!(verify_password(PASSWORD, &model.password_hash).await.unwrap());
}
