use async_trait::async_trait;

use crate::domain::user::models::ProfileUpdate;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Session;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::user::errors::UserError;
use crate::user::models::Username;

/// Port for account and session operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new account.
    ///
    /// # Arguments
    /// * `command` - Validated username, email, password and full name
    ///
    /// # Returns
    /// Public profile of the created account
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email is already registered
    /// * `DuplicateUsername` - Username is already taken
    /// * `Hashing` - Password could not be hashed
    /// * `Persistence` - Database operation failed
    async fn register(&self, command: RegisterCommand) -> Result<UserProfile, UserError>;

    /// Authenticate by email and password and issue a session token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `Hashing` - Stored hash is unusable
    /// * `TokenIssuance` - Token could not be signed
    /// * `Persistence` - Database operation failed
    async fn login(&self, email: &str, password: &str) -> Result<Session, UserError>;

    /// Resolve a session token to the identity it carries.
    ///
    /// Token errors are returned unchanged.
    fn validate_token(&self, token: &str) -> Result<UserId, auth::TokenError>;

    /// Retrieve the public profile for an identity.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Persistence` - Database operation failed
    async fn get_profile(&self, id: &UserId) -> Result<UserProfile, UserError>;

    /// Apply a partial profile update.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Persistence` - Database operation failed
    async fn update_profile(
        &self,
        id: &UserId,
        update: ProfileUpdate,
    ) -> Result<UserProfile, UserError>;
}

/// Persistence operations for user aggregate.
///
/// Lookups return `Ok(None)` when nothing matches; `Err` is reserved for
/// genuine storage failures.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `DuplicateUsername` - Username is already taken
    /// * `DuplicateEmail` - Email is already registered
    /// * `Persistence` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by username.
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Update existing user in storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Persistence` - Database operation failed
    async fn update(&self, user: User) -> Result<User, UserError>;
}
