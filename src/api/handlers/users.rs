//! User administration.
//!
//! Every handler runs [`authorize`] before it reads the target record.

use crate::{
    api::extract::{ApiJson, ApiPath, ApiQuery},
    auth::{
        middleware::AuthUser,
        policy::{authorize, Operation},
        service::password_strength_error,
    },
    types::{
        AppError, CreateUserRequest, FieldErrors, ListUsersQuery, MessageResponse, NewUser,
        Result, UpdateUserRequest, User, UserFilter, UserListResponse, UserUpdate,
    },
    AppState,
};
use axum::{extract::State, http::StatusCode, Json};

/// List users
#[utoipa::path(
    get,
    path = "/api/users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "One page of users", body = UserListResponse),
        (status = 401, description = "Missing or invalid session"),
        (status = 403, description = "Admin access required")
    ),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ApiQuery(query): ApiQuery<ListUsersQuery>,
) -> Result<Json<UserListResponse>> {
    authorize(&claims, None, Operation::ListUsers).into_result()?;

    let filter = UserFilter::from(query);
    let (users, total) = state.credentials.list(&filter).await?;

    Ok(Json(UserListResponse {
        users,
        total,
        page: filter.page,
        limit: filter.limit,
    }))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Missing or invalid session"),
        (status = 403, description = "Admin access required"),
        (status = 409, description = "User already exists")
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>)> {
    authorize(&claims, None, Operation::CreateUser).into_result()?;

    let mut fields = FieldErrors::new();
    if payload.email.trim().is_empty() {
        fields.insert("email".to_string(), "Email is required".to_string());
    }
    if let Some(message) = password_strength_error(&payload.password) {
        fields.insert("password".to_string(), message.to_string());
    }
    if !fields.is_empty() {
        return Err(AppError::Validation(fields));
    }

    let user = state
        .credentials
        .create(NewUser {
            email: payload.email,
            password: payload.password,
            first_name: payload.first_name,
            last_name: payload.last_name,
            role: payload.role,
            active: payload.active,
        })
        .await?;

    tracing::info!(
        admin_id = claims.user_id,
        user_id = user.id,
        role = %user.role,
        "User created by admin"
    );

    Ok((StatusCode::CREATED, Json(user)))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = User),
        (status = 401, description = "Missing or invalid session"),
        (status = 403, description = "Not an admin and not the owner"),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<User>> {
    authorize(&claims, Some(id), Operation::ViewUser).into_result()?;

    Ok(Json(state.credentials.find_by_id(id).await?))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Missing or invalid session"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already in use")
    ),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<UpdateUserRequest>,
) -> Result<Json<User>> {
    authorize(&claims, Some(id), Operation::UpdateUser).into_result()?;

    let mut fields = FieldErrors::new();
    if payload.email.as_deref().is_some_and(|e| e.trim().is_empty()) {
        fields.insert("email".to_string(), "Email is required".to_string());
    }
    if let Some(message) = payload
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .and_then(password_strength_error)
    {
        fields.insert("password".to_string(), message.to_string());
    }
    if !fields.is_empty() {
        return Err(AppError::Validation(fields));
    }

    state.credentials.find_by_id(id).await?;

    if let Some(email) = payload.email.as_deref() {
        if state.credentials.email_in_use(email, Some(id)).await? {
            return Err(AppError::Conflict("Email already in use".to_string()));
        }
    }

    let user = state
        .credentials
        .update(
            id,
            UserUpdate {
                email: payload.email,
                password: payload.password,
                first_name: payload.first_name,
                last_name: payload.last_name,
                role: payload.role,
                active: payload.active,
            },
        )
        .await?;

    tracing::info!(admin_id = claims.user_id, user_id = id, "User updated");

    Ok(Json(user))
}

/// Soft-delete a user
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Cannot delete own account"),
        (status = 401, description = "Missing or invalid session"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "User not found")
    ),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MessageResponse>> {
    if let Err(e) = authorize(&claims, Some(id), Operation::DeleteUser).into_result() {
        tracing::info!(user_id = claims.user_id, target = id, "Delete denied");
        return Err(e);
    }

    state.credentials.delete(id).await?;

    tracing::info!(admin_id = claims.user_id, user_id = id, "User deleted");

    Ok(Json(MessageResponse::new("User deleted successfully")))
}
