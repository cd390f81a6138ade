use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserResponseData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::FullName;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn register<S: UserServicePort>(
    State(state): State<AppState<S>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiSuccess<UserResponseData>, ApiError> {
    let Json(body) = body?;

    state
        .user_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref profile| ApiSuccess::new(StatusCode::CREATED, profile.into()))
}

/// HTTP request body for registering an account (raw JSON)
#[derive(Deserialize)]
pub struct RegisterRequest {
    username: String,
    email: String,
    password: String,
    full_name: String,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, UserError> {
        let username = Username::new(self.username)?;
        let email = EmailAddress::new(self.email)?;
        let password = Password::new(self.password)?;
        let full_name = FullName::new(self.full_name)?;
        Ok(RegisterCommand::new(username, email, password, full_name))
    }
}
