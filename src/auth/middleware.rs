use crate::auth::jwt::{TokenIssuer, TOKEN_LIFETIME};
use crate::types::{AppError, Claims, UserRole};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use std::sync::Arc;
use time::OffsetDateTime;

/// Name of the session cookie carrying the signed token.
pub const AUTH_COOKIE_NAME: &str = "auth_token";

/// Verifies the session token and stores its [`Claims`] in request extensions.
///
/// The `auth_token` cookie wins over an `Authorization: Bearer` header when
/// both are present.
pub async fn require_authenticated(
    State(issuer): State<Arc<TokenIssuer>>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = jar
        .get(AUTH_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| {
            req.headers()
                .typed_get::<Authorization<Bearer>>()
                .map(|auth| auth.token().to_string())
        })
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    let claims = issuer.verify(&token).map_err(|e| {
        tracing::debug!(reason = %e, "Rejected session token");
        AppError::from(e)
    })?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Requires claims set by [`require_authenticated`] and an exact role match.
pub async fn require_role(role: UserRole, req: Request, next: Next) -> Result<Response, AppError> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    if claims.role != role {
        tracing::info!(
            user_id = claims.user_id,
            required = %role,
            actual = %claims.role,
            "Role check denied"
        );
        return Err(match role {
            UserRole::Admin => AppError::Forbidden("Admin access required".to_string()),
            _ => AppError::Forbidden(format!("{} role required", role)),
        });
    }

    Ok(next.run(req).await)
}

/// [`require_role`] fixed to `admin`, for use with `middleware::from_fn`.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    require_role(UserRole::Admin, req, next).await
}

/// Builds the session cookie for a freshly issued token.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    let lifetime = time::Duration::seconds(TOKEN_LIFETIME.num_seconds());

    Cookie::build((AUTH_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(lifetime)
        .expires(OffsetDateTime::now_utc() + lifetime)
        .build()
}

/// Builds a cookie that makes the browser drop the session immediately.
pub fn expired_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::ZERO)
        .expires(OffsetDateTime::UNIX_EPOCH)
        .build()
}

/// Claims of the authenticated caller.
pub struct AuthUser(pub Claims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::User;
    use axum::{
        body::Body,
        http::{header, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use chrono::Utc;
    use tower::ServiceExt;

    const SECRET: &str = "middleware-test-secret-at-least-32-bytes";

    fn user(role: UserRole) -> User {
        let now = Utc::now();
        User {
            id: 7,
            email: "mw@example.com".to_string(),
            password_hash: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            role,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    async fn whoami(AuthUser(claims): AuthUser) -> String {
        claims.email
    }

    fn app(issuer: Arc<TokenIssuer>) -> Router {
        let admin = Router::new()
            .route("/admin", get(whoami))
            .layer(middleware::from_fn(require_admin));

        Router::new()
            .route("/me", get(whoami))
            .merge(admin)
            .layer(middleware::from_fn_with_state(issuer, require_authenticated))
    }

    async fn status_for(path: &str, header: Option<(header::HeaderName, String)>) -> StatusCode {
        let issuer = Arc::new(TokenIssuer::new(SECRET));
        let mut builder = axum::http::Request::builder().uri(path);
        if let Some((name, value)) = header {
            builder = builder.header(name, value);
        }
        app(issuer)
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        assert_eq!(status_for("/me", None).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_cookie_token_is_accepted() {
        let token = TokenIssuer::new(SECRET).issue(&user(UserRole::User)).unwrap();
        let cookie = format!("{}={}", AUTH_COOKIE_NAME, token);
        assert_eq!(
            status_for("/me", Some((header::COOKIE, cookie))).await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn test_bearer_token_is_accepted() {
        let token = TokenIssuer::new(SECRET).issue(&user(UserRole::User)).unwrap();
        assert_eq!(
            status_for("/me", Some((header::AUTHORIZATION, format!("Bearer {}", token)))).await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn test_foreign_signature_is_unauthorized() {
        let token = TokenIssuer::new("another-secret-that-is-32-bytes-long!")
            .issue(&user(UserRole::Admin))
            .unwrap();
        let cookie = format!("{}={}", AUTH_COOKIE_NAME, token);
        assert_eq!(
            status_for("/me", Some((header::COOKIE, cookie))).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_role_gate() {
        let issuer = TokenIssuer::new(SECRET);
        let user_cookie = format!(
            "{}={}",
            AUTH_COOKIE_NAME,
            issuer.issue(&user(UserRole::User)).unwrap()
        );
        let admin_cookie = format!(
            "{}={}",
            AUTH_COOKIE_NAME,
            issuer.issue(&user(UserRole::Admin)).unwrap()
        );

        assert_eq!(
            status_for("/admin", Some((header::COOKIE, user_cookie))).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_for("/admin", Some((header::COOKIE, admin_cookie))).await,
            StatusCode::OK
        );
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc".to_string(), true);
        assert_eq!(cookie.name(), AUTH_COOKIE_NAME);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(time::Duration::hours(24)));
    }

    #[test]
    fn test_expired_session_cookie_clears_value() {
        let cookie = expired_session_cookie(false);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
        assert_eq!(cookie.secure(), Some(false));
    }
}
