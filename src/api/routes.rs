use crate::api::handlers::{auth, health, roles, users};
use crate::auth::jwt::TokenIssuer;
use crate::auth::middleware::{require_admin, require_authenticated};
use crate::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use utoipa::OpenApi;

/// Warden OpenAPI document
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Warden API",
        description = "User registration, cookie-backed sessions and user administration"
    ),
    paths(
        health::health,
        auth::register,
        auth::login,
        auth::logout,
        auth::me,
        users::list_users,
        users::create_user,
        users::get_user,
        users::update_user,
        users::delete_user,
        roles::list_roles,
        roles::get_role,
    ),
    components(schemas(
        crate::types::User,
        crate::types::UserRole,
        crate::types::Role,
        crate::types::RegisterRequest,
        crate::types::LoginRequest,
        crate::types::AuthResponse,
        crate::types::MessageResponse,
        crate::types::CreateUserRequest,
        crate::types::UpdateUserRequest,
        crate::types::UserListResponse,
        health::HealthResponse,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "auth", description = "Registration and sessions"),
        (name = "users", description = "User administration"),
        (name = "roles", description = "Role catalog")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Routes mounted under `/api`.
///
/// Everything except register, login, logout and the OpenAPI document sits
/// behind `require_authenticated`; the role catalog additionally requires
/// the admin role.
pub fn create_router(issuer: Arc<TokenIssuer>) -> Router<AppState> {
    let public_routes = Router::new()
        // Public routes (no auth required)
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/openapi.json", get(openapi_json));

    let admin_routes = Router::new()
        .route("/roles", get(roles::list_roles))
        .route("/roles/{id}", get(roles::get_role))
        .layer(middleware::from_fn(require_admin));

    let protected_routes = Router::new()
        // Protected routes (auth required, per-operation policy in handlers)
        .route("/auth/me", get(auth::me))
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(issuer, require_authenticated));

    public_routes.merge(protected_routes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/auth/register",
            "/api/auth/login",
            "/api/auth/logout",
            "/api/auth/me",
            "/api/users",
            "/api/users/{id}",
            "/api/roles",
            "/api/roles/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
