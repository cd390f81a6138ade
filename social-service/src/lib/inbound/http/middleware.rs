use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use http::header::AUTHORIZATION;
use http::HeaderMap;
use thiserror::Error;

use super::handlers::ApiError;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated identity in request extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Reasons the gate refuses a request.
///
/// Every variant is a `401`. The codec's own error kind is logged but never
/// surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("Authorization header required")]
    MissingCredential,

    #[error("Invalid authorization header format")]
    MalformedCredential,

    #[error("Invalid token")]
    InvalidToken,
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        ApiError::Unauthorized(self.to_string()).into_response()
    }
}

/// Middleware that rejects requests without a valid session token and adds
/// the caller's identity to request extensions
pub async fn require_authentication<S: UserServicePort>(
    State(state): State<AppState<S>>,
    mut req: Request,
    next: Next,
) -> Result<Response, GateError> {
    let caller = authenticate(&state, req.headers())?;

    req.extensions_mut().insert(caller);

    Ok(next.run(req).await)
}

/// Middleware that adds the caller's identity when a valid session token is
/// present, and otherwise lets the request through anonymously
pub async fn optional_authentication<S: UserServicePort>(
    State(state): State<AppState<S>>,
    mut req: Request,
    next: Next,
) -> Response {
    match authenticate(&state, req.headers()) {
        Ok(caller) => {
            req.extensions_mut().insert(caller);
        }
        Err(GateError::MissingCredential) => {}
        Err(e) => tracing::debug!(error = %e, "Continuing without identity"),
    }

    next.run(req).await
}

fn authenticate<S: UserServicePort>(
    state: &AppState<S>,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser, GateError> {
    let token = extract_bearer_token(headers)?;

    let user_id = state.user_service.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Session token rejected");
        GateError::InvalidToken
    })?;

    Ok(AuthenticatedUser { user_id })
}

/// Read the token out of an `Authorization: Bearer <token>` header.
///
/// An absent or empty header is `MissingCredential`; any other shape than
/// exactly two space-separated parts starting with `Bearer` is
/// `MalformedCredential`.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, GateError> {
    let value = headers
        .get(AUTHORIZATION)
        .filter(|value| !value.is_empty())
        .ok_or(GateError::MissingCredential)?;

    let value = value
        .to_str()
        .map_err(|_| GateError::MalformedCredential)?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(GateError::MalformedCredential),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use auth::TokenError;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use axum::Extension;
    use axum::Router;
    use http::HeaderValue;
    use mockall::mock;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::user::models::ProfileUpdate;
    use crate::domain::user::models::RegisterCommand;
    use crate::domain::user::models::Session;
    use crate::domain::user::models::UserProfile;
    use crate::user::errors::UserError;

    mock! {
        pub Sessions {}

        #[async_trait]
        impl UserServicePort for Sessions {
            async fn register(&self, command: RegisterCommand) -> Result<UserProfile, UserError>;
            async fn login(&self, email: &str, password: &str) -> Result<Session, UserError>;
            fn validate_token(&self, token: &str) -> Result<UserId, TokenError>;
            async fn get_profile(&self, id: &UserId) -> Result<UserProfile, UserError>;
            async fn update_profile(&self, id: &UserId, update: ProfileUpdate) -> Result<UserProfile, UserError>;
        }
    }

    fn headers(authorization: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(authorization));
        headers
    }

    async fn whoami(caller: Option<Extension<AuthenticatedUser>>) -> String {
        caller
            .map(|Extension(caller)| caller.user_id.to_string())
            .unwrap_or_else(|| "anonymous".to_string())
    }

    fn app(sessions: MockSessions) -> Router {
        let state = AppState {
            user_service: Arc::new(sessions),
        };

        let required = Router::new()
            .route("/required", get(whoami))
            .route_layer(from_fn_with_state(
                state.clone(),
                require_authentication::<MockSessions>,
            ));
        let optional = Router::new()
            .route("/optional", get(whoami))
            .route_layer(from_fn_with_state(
                state.clone(),
                optional_authentication::<MockSessions>,
            ));

        Router::new()
            .merge(required)
            .merge(optional)
            .with_state(state)
    }

    async fn call(app: Router, uri: &str, authorization: Option<&str>) -> (StatusCode, String) {
        let mut request = axum::http::Request::builder().uri(uri);
        if let Some(authorization) = authorization {
            request = request.header(AUTHORIZATION, authorization);
        }

        let response = app
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
    }

    #[test]
    fn test_extract_missing_header() {
        assert_eq!(
            extract_bearer_token(&HeaderMap::new()),
            Err(GateError::MissingCredential)
        );
        assert_eq!(
            extract_bearer_token(&headers("")),
            Err(GateError::MissingCredential)
        );
    }

    #[test]
    fn test_extract_malformed_header() {
        for value in [
            "abc.def.ghi",
            "Basic dXNlcjpwYXNz",
            "bearer abc.def.ghi",
            "Bearer",
            "Bearer ",
            "Bearer abc def",
            "Bearer  abc",
        ] {
            assert_eq!(
                extract_bearer_token(&headers(value)),
                Err(GateError::MalformedCredential),
                "header {:?}",
                value
            );
        }
    }

    #[tokio::test]
    async fn test_required_attaches_identity() {
        let user_id = UserId::new();
        let mut sessions = MockSessions::new();
        sessions
            .expect_validate_token()
            .withf(|token| token == "good-token")
            .times(1)
            .returning(move |_| Ok(user_id));

        let (status, body) = call(app(sessions), "/required", Some("Bearer good-token")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, user_id.to_string());
    }

    #[tokio::test]
    async fn test_required_rejects_missing_header() {
        let mut sessions = MockSessions::new();
        sessions.expect_validate_token().times(0);

        let (status, body) = call(app(sessions), "/required", None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Authorization header required"));
    }

    #[tokio::test]
    async fn test_required_rejects_malformed_header() {
        let mut sessions = MockSessions::new();
        sessions.expect_validate_token().times(0);

        let (status, body) = call(app(sessions), "/required", Some("Token abc")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Invalid authorization header format"));
    }

    #[tokio::test]
    async fn test_required_flattens_codec_errors() {
        let mut bodies = Vec::new();

        for error in [
            TokenError::Expired,
            TokenError::Signature,
            TokenError::Algorithm("none".to_string()),
            TokenError::Malformed("bad".to_string()),
        ] {
            let mut sessions = MockSessions::new();
            sessions
                .expect_validate_token()
                .times(1)
                .returning(move |_| Err(error.clone()));

            let (status, body) = call(app(sessions), "/required", Some("Bearer token")).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            bodies.push(body);
        }

        assert!(bodies.iter().all(|body| body == &bodies[0]));
        assert!(bodies[0].contains("Invalid token"));
    }

    #[tokio::test]
    async fn test_optional_attaches_identity() {
        let user_id = UserId::new();
        let mut sessions = MockSessions::new();
        sessions
            .expect_validate_token()
            .returning(move |_| Ok(user_id));

        let (status, body) = call(app(sessions), "/optional", Some("Bearer good-token")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, user_id.to_string());
    }

    #[tokio::test]
    async fn test_optional_degrades_to_anonymous() {
        let mut sessions = MockSessions::new();
        sessions
            .expect_validate_token()
            .returning(|_| Err(TokenError::Expired));

        let (status, body) = call(app(sessions), "/optional", Some("Bearer stale-token")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");

        let (status, body) = call(app(MockSessions::new()), "/optional", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");

        let (status, body) = call(app(MockSessions::new()), "/optional", Some("garbage")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }
}
