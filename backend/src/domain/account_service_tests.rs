//! Tests for the account service.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{MockPasswordHasher, MockTokenService, MockUserRepository};
use crate::domain::{EmailAddress, ErrorCode, IssuedToken, PasswordDigest, Username};
use crate::test_support::{fixture_clock, fixture_timestamp};

fn issuing_tokens() -> MockTokenService {
    let mut tokens = MockTokenService::new();
    tokens
        .expect_issue()
        .returning(|identity| Ok(IssuedToken::new(format!("token-for-{}", identity.id()))));
    tokens
}

fn service(
    users: MockUserRepository,
    hasher: MockPasswordHasher,
    tokens: MockTokenService,
) -> AccountService<MockUserRepository, MockPasswordHasher> {
    AccountService::new(
        Arc::new(users),
        Arc::new(hasher),
        Arc::new(tokens),
        fixture_clock(),
    )
}

fn stored_user() -> User {
    User::new(
        UserId::random(),
        Username::new("candy").expect("valid username"),
        EmailAddress::new("candy@example.com").expect("valid email"),
        PasswordDigest::new("$argon2id$stored"),
        Role::User,
        fixture_timestamp(),
    )
}

fn register_request(username: &str, email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        username: Some(username.to_owned()),
        email: Some(email.to_owned()),
        password: Some(password.to_owned()),
    }
}

fn login_request(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: Some(email.to_owned()),
        password: Some(password.to_owned()),
    }
}

#[tokio::test]
async fn register_hashes_password_and_assigns_user_role() {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .withf(|password| password == "s3cret")
        .times(1)
        .return_once(|_| Ok(PasswordDigest::new("$argon2id$hashed")));
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .withf(|user| {
            user.role() == Role::User
                && user.email().as_ref() == "new@example.com"
                && user.password().as_str() == "$argon2id$hashed"
        })
        .times(1)
        .return_once(|_| Ok(()));

    let session = service(users, hasher, issuing_tokens())
        .register(register_request(" newbie ", "New@Example.com", "s3cret"))
        .await
        .expect("registration succeeds");

    assert_eq!(session.user.username().as_ref(), "newbie");
    assert_eq!(session.user.created_at(), fixture_timestamp());
    assert_eq!(
        session.token.as_str(),
        format!("token-for-{}", session.user.id())
    );
}

#[rstest]
#[case(RegisterRequest::default())]
#[case(RegisterRequest { password: None, ..register_request("a", "a@b.c", "x") })]
#[case(register_request("   ", "a@b.c", "x"))]
#[tokio::test]
async fn register_requires_every_field(#[case] request: RegisterRequest) {
    let mut users = MockUserRepository::new();
    users.expect_insert().times(0);
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_hash().times(0);

    let error = service(users, hasher, MockTokenService::new())
        .register(request)
        .await
        .expect_err("missing fields");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "Please provide username, email, and password");
}

#[tokio::test]
async fn register_reports_duplicates_as_invalid_request() {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .return_once(|_| Ok(PasswordDigest::new("$argon2id$hashed")));
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .return_once(|_| Err(UserRepositoryError::duplicate("email")));

    let error = service(users, hasher, MockTokenService::new())
        .register(register_request("candy", "candy@example.com", "pw"))
        .await
        .expect_err("duplicate");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert!(error.message().contains("already exists"));
    let details = error.details().expect("details attached");
    assert_eq!(details["field"], "email");
}

#[tokio::test]
async fn login_succeeds_with_matching_password() {
    let user = stored_user();
    let expected_id = *user.id();
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .withf(|email| email == "candy@example.com")
        .return_once(move |_| Ok(Some(user)));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_verify()
        .withf(|password, digest| password == "pw" && digest.as_str() == "$argon2id$stored")
        .return_once(|_, _| Ok(true));

    let session = service(users, hasher, issuing_tokens())
        .login(login_request(" CANDY@example.com", "pw"))
        .await
        .expect("login succeeds");

    assert_eq!(*session.user.id(), expected_id);
}

#[rstest]
#[case(false, true)]
#[case(true, false)]
#[tokio::test]
async fn login_rejects_unknown_email_or_wrong_password(
    #[case] known: bool,
    #[case] password_matches: bool,
) {
    let mut users = MockUserRepository::new();
    let found = known.then(stored_user);
    users
        .expect_find_by_email()
        .return_once(move |_| Ok(found));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_verify()
        .returning(move |_, _| Ok(password_matches));

    let error = service(users, hasher, MockTokenService::new())
        .login(login_request("candy@example.com", "pw"))
        .await
        .expect_err("rejected");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
    assert_eq!(error.message(), "Invalid email or password");
}

#[tokio::test]
async fn login_requires_email_and_password() {
    let error = service(
        MockUserRepository::new(),
        MockPasswordHasher::new(),
        MockTokenService::new(),
    )
    .login(LoginRequest {
        email: Some("candy@example.com".to_owned()),
        password: None,
    })
    .await
    .expect_err("missing password");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "Please provide email and password");
}

#[tokio::test]
async fn login_maps_store_outage_to_service_unavailable() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .return_once(|_| Err(UserRepositoryError::connection("pool exhausted")));

    let error = service(users, MockPasswordHasher::new(), MockTokenService::new())
        .login(login_request("candy@example.com", "pw"))
        .await
        .expect_err("store down");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
