use crate::{
    api::extract::ApiPath,
    types::{Result, Role},
    AppState,
};
use axum::{extract::State, Json};

/// List the role catalog
#[utoipa::path(
    get,
    path = "/api/roles",
    responses(
        (status = 200, description = "All roles", body = Vec<Role>),
        (status = 401, description = "Missing or invalid session"),
        (status = 403, description = "Admin access required")
    ),
    tag = "roles"
)]
pub async fn list_roles(State(state): State<AppState>) -> Result<Json<Vec<Role>>> {
    Ok(Json(state.credentials.list_roles().await?))
}

/// Get a role by id
#[utoipa::path(
    get,
    path = "/api/roles/{id}",
    params(("id" = i64, Path, description = "Role id")),
    responses(
        (status = 200, description = "The role", body = Role),
        (status = 401, description = "Missing or invalid session"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Role not found")
    ),
    tag = "roles"
)]
pub async fn get_role(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Role>> {
    Ok(Json(state.credentials.find_role(id).await?))
}
