use std::sync::Arc;

use axum::{
    Router,
    routing::get,
    extract::{Extension, Path},
    http::StatusCode,
    response::Json as RespJson,
};

use super::{extract::ValidatedJson, response::ResponseData};
use crate::{
    error::ApiError,
    model::{CreateUserRequest, User},
    service::UserService,
};

pub type SharedUserService = Arc<dyn UserService>;

// Users router, nested under /api/v1/users
pub fn users_router() -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user))
}

// POST /users
async fn create_user(
    Extension(service): Extension<SharedUserService>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, RespJson<ResponseData<User>>), ApiError> {
    let user = service.create_user(payload.into()).await.map_err(|e| {
        tracing::error!("Failed to create user: {}", e);
        ApiError::from(e)
    })?;

    tracing::info!(user_id = user.id, "User created");
    Ok((StatusCode::CREATED, RespJson(ResponseData::new(user))))
}

// GET /users
async fn list_users(
    Extension(service): Extension<SharedUserService>,
) -> Result<RespJson<ResponseData<Vec<User>>>, ApiError> {
    let users = service.list_users().await.map_err(|e| {
        tracing::error!("Failed to list users: {}", e);
        ApiError::from(e)
    })?;

    Ok(RespJson(ResponseData::new(users)))
}

// GET /users/:id
async fn get_user(
    Extension(service): Extension<SharedUserService>,
    Path(id): Path<String>,
) -> Result<RespJson<ResponseData<User>>, ApiError> {
    let user_id = parse_user_id(&id).ok_or_else(|| {
        tracing::debug!("Invalid user id: {}", id);
        ApiError::BadRequest("invalid id".to_string())
    })?;

    let user = service.get_user_by_id(user_id).await.map_err(|e| {
        tracing::error!("Failed to load user {}: {}", user_id, e);
        ApiError::from(e)
    })?;

    match user {
        Some(user) => Ok(RespJson(ResponseData::new(user))),
        None => Err(ApiError::NotFound("user not found".to_string())),
    }
}

/// Ids are positive integers; anything else is a bad request.
fn parse_user_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}
