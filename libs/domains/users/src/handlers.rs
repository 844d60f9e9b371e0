use axum::{Json, Router, extract::State, routing::post};
use axum_helpers::{ErrorResponse, ValidatedJson};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{LoginRequest, LoginResponse, RegisterUser, UserResponse};
use crate::repository::UserRepository;
use crate::service::UserService;

pub const TAG: &str = "users";

/// OpenAPI documentation for the account endpoints
#[derive(OpenApi)]
#[openapi(
    paths(register, login),
    components(schemas(RegisterUser, LoginRequest, LoginResponse, UserResponse, ErrorResponse)),
    tags((name = TAG, description = "Registration and login"))
)]
pub struct ApiDoc;

/// Public account routes: `/users/register` and `/users/login`
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .with_state(shared_service)
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/users/register",
    tag = TAG,
    request_body = RegisterUser,
    responses(
        (status = 200, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
async fn register<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<RegisterUser>,
) -> UserResult<Json<UserResponse>> {
    let user = service.register(input).await?;
    Ok(Json(user))
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/users/login",
    tag = TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
async fn login<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<Json<LoginResponse>> {
    let response = service.login(input).await?;
    Ok(Json(response))
}
