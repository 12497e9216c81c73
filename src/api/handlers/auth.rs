use crate::{
    api::extract::ApiJson,
    auth::middleware::{expired_session_cookie, session_cookie, AuthUser},
    types::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest, Result, User},
    AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::CookieJar;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered; session cookie set", body = AuthResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "User already exists")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>)> {
    let response = state.auth_service.register(payload).await?;
    let jar = jar.add(session_cookie(
        response.token.clone(),
        state.config.auth.cookie_secure,
    ));

    Ok((StatusCode::CREATED, jar, Json(response)))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful; session cookie set", body = AuthResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account is deactivated")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    let response = state.auth_service.login(payload).await?;
    let jar = jar.add(session_cookie(
        response.token.clone(),
        state.config.auth.cookie_secure,
    ));

    Ok((jar, Json(response)))
}

/// Clear the session cookie
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session cookie cleared", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.add(expired_session_cookie(state.config.auth.cookie_secure));

    (jar, Json(MessageResponse::new("Logged out successfully")))
}

/// Current user
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "The authenticated user", body = User),
        (status = 401, description = "Missing or invalid session"),
        (status = 404, description = "User no longer exists")
    ),
    tag = "auth"
)]
pub async fn me(State(state): State<AppState>, AuthUser(claims): AuthUser) -> Result<Json<User>> {
    let user = state.auth_service.me(&claims).await?;
    Ok(Json(user))
}
