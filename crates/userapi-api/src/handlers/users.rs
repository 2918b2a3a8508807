use crate::error::ApiError;
use crate::state::ApiContext;
use crate::types::{CreateUserRequest, MessageResponse, User, UserResponse, UsersResponse};
use crate::Result;
use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use validator::Validate;

pub async fn list_users(State(ctx): State<ApiContext>) -> Result<Json<UsersResponse>> {
    let users: Vec<User> = ctx
        .gateway
        .list_users()
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    Ok(Json(UsersResponse {
        count: users.len(),
        users,
    }))
}

pub async fn create_user(
    State(ctx): State<ApiContext>,
    payload: std::result::Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let Json(req) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let user = ctx.gateway.create_user(&req.name, &req.email).await?;
    info!(user_id = user.id, "User created");

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            user: User::from(user),
        }),
    ))
}

pub async fn get_user(
    State(ctx): State<ApiContext>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<UserResponse>> {
    let id = user_id(id)?;
    let user = ctx.gateway.get_user(id).await?;

    Ok(Json(UserResponse {
        user: User::from(user),
    }))
}

pub async fn delete_user(
    State(ctx): State<ApiContext>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>> {
    let id = user_id(id)?;
    ctx.gateway.delete_user(id).await?;
    info!(user_id = id, "User deleted");

    Ok(Json(MessageResponse {
        message: "User deleted successfully".to_string(),
    }))
}

/// Non-integer ids are invalid input; integers outside the `SERIAL` range
/// cannot name a stored user.
fn user_id(id: std::result::Result<Path<i64>, PathRejection>) -> Result<i32> {
    let Path(id) = id.map_err(|_| ApiError::Validation("User id must be an integer".to_string()))?;
    i32::try_from(id).map_err(|_| ApiError::NotFound("User".to_string()))
}
