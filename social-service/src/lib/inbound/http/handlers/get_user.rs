use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::UserResponseData;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Public profile lookup. Anonymous callers are allowed.
pub async fn get_user<S: UserServicePort>(
    State(state): State<AppState<S>>,
    viewer: Option<Extension<AuthenticatedUser>>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    let user_id =
        UserId::from_string(&user_id).map_err(|_| ApiError::BadRequest("Invalid user ID".to_string()))?;

    tracing::debug!(
        user_id = %user_id,
        viewer = ?viewer.as_ref().map(|Extension(viewer)| viewer.user_id.to_string()),
        "Profile lookup"
    );

    state
        .user_service
        .get_profile(&user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref profile| ApiSuccess::new(StatusCode::OK, profile.into()))
}
