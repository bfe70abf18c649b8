//! Account API handlers.
//!
//! ```text
//! POST /api/auth/register {"username":"shopper","email":"shopper@example.com","password":"secret"}
//! POST /api/auth/login {"email":"shopper@example.com","password":"secret"}
//! ```

use actix_web::{HttpResponse, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{LoginRequest, RegisterRequest};
use crate::domain::{AccountSession, Role, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{Envelope, ErrorEnvelope};
use crate::inbound::http::state::HttpState;

/// Registration body for `POST /api/auth/register`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl From<RegisterBody> for RegisterRequest {
    fn from(value: RegisterBody) -> Self {
        Self {
            username: value.username,
            email: value.email,
            password: value.password,
        }
    }
}

/// Login body for `POST /api/auth/login`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl From<LoginBody> for LoginRequest {
    fn from(value: LoginBody) -> Self {
        Self {
            email: value.email,
            password: value.password,
        }
    }
}

/// Public account representation; never includes the password digest.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[schema(value_type = String, example = "user")]
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            username: user.username().as_ref().to_owned(),
            email: user.email().as_ref().to_owned(),
            role: user.role(),
            created_at: user.created_at(),
        }
    }
}

/// Account plus bearer token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub user: UserResponse,
    pub token: String,
}

impl From<AccountSession> for SessionResponse {
    fn from(session: AccountSession) -> Self {
        Self {
            user: UserResponse::from(&session.user),
            token: session.token.as_str().to_owned(),
        }
    }
}

/// Create an account with the `user` role and return a token for it.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterBody,
    responses(
        (status = 201, description = "Account created", body = Envelope<SessionResponse>),
        (status = 400, description = "Invalid or duplicate registration", body = ErrorEnvelope),
        (status = 503, description = "Store unavailable", body = ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterBody>,
) -> ApiResult<HttpResponse> {
    let session = state.accounts.register(payload.into_inner().into()).await?;
    info!(user_id = %session.user.id(), "account registered");
    Ok(HttpResponse::Created().json(
        Envelope::ok(SessionResponse::from(session)).with_message("User registered successfully"),
    ))
}

/// Exchange email and password for a token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Login success", body = Envelope<SessionResponse>),
        (status = 400, description = "Missing credentials", body = ErrorEnvelope),
        (status = 401, description = "Invalid credentials", body = ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginBody>,
) -> ApiResult<HttpResponse> {
    let session = state.accounts.login(payload.into_inner().into()).await?;
    Ok(HttpResponse::Ok()
        .json(Envelope::ok(SessionResponse::from(session)).with_message("Login successful")))
}
