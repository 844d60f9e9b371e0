use super::jwt::{JwtAuth, JwtClaims, JwtError, Role};
use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};

/// Caller identity attached to the request by [`require_auth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl TryFrom<&JwtClaims> for AuthUser {
    type Error = JwtError;

    fn try_from(claims: &JwtClaims) -> Result<Self, Self::Error> {
        Ok(Self {
            id: claims.user_id()?,
            role: claims.role,
        })
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

/// `Authorization: Bearer <token>`; the scheme is case-insensitive.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Rejects requests without a valid bearer token; otherwise inserts the
/// caller's [`AuthUser`] into request extensions.
pub async fn require_auth(
    State(auth): State<JwtAuth>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or_else(|| {
        tracing::debug!("No bearer token in Authorization header");
        AppError::Unauthorized("Authorization header is required".to_string())
    })?;

    let user = auth
        .verify(token)
        .and_then(|claims| AuthUser::try_from(&claims))
        .map_err(|e| {
            tracing::debug!("JWT verification failed: {}", e);
            AppError::Unauthorized("Invalid or expired token".to_string())
        })?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Rejects callers whose role is not `admin`. Must run after [`require_auth`].
pub async fn require_admin(
    user: AuthUser,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !user.is_admin() {
        tracing::info!(user_id = user.id, "Admin access denied");
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtConfig;
    use axum::{
        Router,
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware::{from_fn, from_fn_with_state},
        routing::get,
    };
    use tower::ServiceExt;

    async fn whoami(user: AuthUser) -> String {
        format!("{}:{}", user.id, user.role)
    }

    fn app(auth: JwtAuth) -> Router {
        let admin = Router::new()
            .route("/admin", get(whoami))
            .route_layer(from_fn(require_admin));

        Router::new()
            .route("/me", get(whoami))
            .merge(admin)
            .route_layer(from_fn_with_state(auth, require_auth))
    }

    fn auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("middleware-test-secret-of-enough-length"))
    }

    async fn call(app: Router, uri: &str, token: Option<&str>) -> StatusCode {
        let mut builder = HttpRequest::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        app.oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        assert_eq!(call(app(auth()), "/me", None).await, StatusCode::UNAUTHORIZED);
        assert_eq!(call(app(auth()), "/admin", None).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_token_is_unauthorized() {
        assert_eq!(
            call(app(auth()), "/me", Some("garbage")).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_user_token_reaches_user_route_but_not_admin_route() {
        let auth = auth();
        let token = auth.issue(5, "u@example.com", Role::User).unwrap().token;
        assert_eq!(call(app(auth.clone()), "/me", Some(&token)).await, StatusCode::OK);
        assert_eq!(
            call(app(auth), "/admin", Some(&token)).await,
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn test_admin_token_reaches_admin_route() {
        let auth = auth();
        let token = auth.issue(1, "a@example.com", Role::Admin).unwrap().token;
        assert_eq!(call(app(auth), "/admin", Some(&token)).await, StatusCode::OK);
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "bearer abc".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc"));

        headers.insert(header::AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }
}
