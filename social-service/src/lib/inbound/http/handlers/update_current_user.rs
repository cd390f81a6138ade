use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserResponseData;
use crate::domain::user::models::FullName;
use crate::domain::user::models::ProfileUpdate;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// HTTP request body for a profile update (raw JSON).
///
/// Keys other than these are ignored.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

impl UpdateProfileRequest {
    fn try_into_update(self) -> Result<ProfileUpdate, UserError> {
        let full_name = self.full_name.map(FullName::new).transpose()?;

        Ok(ProfileUpdate {
            full_name,
            bio: self.bio,
            avatar: self.avatar,
        })
    }
}

pub async fn update_current_user<S: UserServicePort>(
    State(state): State<AppState<S>>,
    Extension(caller): Extension<AuthenticatedUser>,
    body: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    let Json(body) = body?;
    let update = body.try_into_update()?;

    state
        .user_service
        .update_profile(&caller.user_id, update)
        .await
        .map_err(ApiError::from)
        .map(|ref profile| ApiSuccess::new(StatusCode::OK, profile.into()))
}
