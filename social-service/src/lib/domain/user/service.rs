use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use chrono::Duration;
use chrono::Utc;

use crate::domain::user::models::ProfileUpdate;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Session;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for account and session operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    session_ttl: Duration,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hashing and session token issuance
    /// * `session_ttl` - Lifetime of every token issued at login
    pub fn new(
        repository: Arc<UR>,
        authenticator: Arc<Authenticator>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            repository,
            authenticator,
            session_ttl,
        }
    }

    async fn require_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<UserProfile, UserError> {
        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(UserError::DuplicateEmail(command.email.to_string()));
        }

        if self
            .repository
            .find_by_username(&command.username)
            .await?
            .is_some()
        {
            return Err(UserError::DuplicateUsername(command.username.to_string()));
        }

        let password_hash = self.authenticator.hash_password(command.password.as_str())?;

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            password_hash,
            full_name: command.full_name,
            bio: String::new(),
            avatar: String::new(),
            created_at: now,
            updated_at: now,
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(user_id = %created_user.id, "User registered");

        Ok(UserProfile::from(&created_user))
    }

    async fn login(&self, email: &str, password: &str) -> Result<Session, UserError> {
        let Some(user) = self.repository.find_by_email(email).await? else {
            tracing::debug!("Login rejected: unknown account");
            self.authenticator.verify_decoy(password);
            return Err(UserError::InvalidCredentials);
        };

        let result = self
            .authenticator
            .authenticate(
                password,
                &user.password_hash,
                user.id,
                Utc::now(),
                self.session_ttl,
            )
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => {
                    tracing::debug!(user_id = %user.id, "Login rejected: password mismatch");
                    UserError::InvalidCredentials
                }
                AuthenticationError::PasswordError(err) => UserError::Hashing(err),
                AuthenticationError::TokenError(err) => UserError::TokenIssuance(err),
            })?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(Session {
            user: UserProfile::from(&user),
            token: result.access_token,
        })
    }

    fn validate_token(&self, token: &str) -> Result<UserId, auth::TokenError> {
        self.authenticator.validate_token(token)
    }

    async fn get_profile(&self, id: &UserId) -> Result<UserProfile, UserError> {
        self.require_user(id)
            .await
            .map(|user| UserProfile::from(&user))
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: ProfileUpdate,
    ) -> Result<UserProfile, UserError> {
        let mut user = self.require_user(id).await?;

        update.apply_to(&mut user);
        user.updated_at = Utc::now();

        let updated_user = self.repository.update(user).await?;
        tracing::info!(user_id = %updated_user.id, "Profile updated");

        Ok(UserProfile::from(&updated_user))
    }
}
