//! Integration tests for the users domain
//!
//! These tests use real PostgreSQL via testcontainers and need Docker,
//! so they are ignored by default: `cargo test -- --ignored`.

use axum_helpers::Role;
use domain_users::*;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};

fn new_user(email: String) -> NewUser {
    NewUser {
        name: "Integration".to_string(),
        email,
        password_hash: "$argon2id$placeholder".to_string(),
        role: Role::Admin,
    }
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_create_and_get_user() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("create_and_get_user");

    let created = repo.create(new_user(builder.email("ada"))).await.unwrap();
    assert!(created.id > 0);
    assert_eq!(created.role, Role::Admin);

    let by_id = assert_some(repo.get_by_id(created.id).await.unwrap(), "user by id");
    assert_id_eq(by_id.id, created.id, "user id");

    let by_email = assert_some(
        repo.get_by_email(&builder.email("ada")).await.unwrap(),
        "user by email",
    );
    assert_eq!(by_email.password_hash, created.password_hash);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_unique_email_constraint_maps_to_duplicate() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("unique_email");

    repo.create(new_user(builder.email("dup"))).await.unwrap();
    let err = repo.create(new_user(builder.email("dup"))).await.unwrap_err();

    assert!(matches!(err, UserError::DuplicateEmail(_)));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_register_then_login_against_postgres() {
    let db = TestDatabase::new().await;
    let jwt = axum_helpers::JwtAuth::new(&axum_helpers::JwtConfig::new(
        "integration-test-secret-of-enough-length",
    ));
    let service = UserService::new(PgUserRepository::new(db.connection()), jwt);
    let builder = TestDataBuilder::from_test_name("register_login_pg");

    let user = service
        .register(RegisterUser {
            name: "Ada".into(),
            email: builder.email("ada"),
            password: builder.password(),
            role: None,
        })
        .await
        .unwrap();

    let login = service
        .login(LoginRequest {
            email: builder.email("ada"),
            password: builder.password(),
        })
        .await
        .unwrap();

    assert_eq!(login.user.id, user.id);
    assert_eq!(login.user.role, Role::User);
}
