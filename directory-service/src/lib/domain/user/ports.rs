use async_trait::async_trait;

use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::StoreError;

/// Persistence operations for user records.
///
/// The credential store behind this port is an external collaborator; the
/// core only depends on point lookups and the full listing used by the
/// directory cache.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Retrieve a user by login.
    ///
    /// # Returns
    /// `None` when the login is unknown, so callers can distinguish "not
    /// found" from a store failure.
    ///
    /// # Errors
    /// * `Unavailable` - Store operation failed
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, StoreError>;

    /// Retrieve all users, ordered by creation time.
    ///
    /// # Errors
    /// * `Unavailable` - Store operation failed
    async fn list_all(&self) -> Result<Vec<User>, StoreError>;

    /// Persist a new user.
    ///
    /// # Errors
    /// * `AlreadyExists` - Login or email is already taken
    /// * `Unavailable` - Store operation failed
    async fn create(&self, user: User) -> Result<User, StoreError>;

    /// Remove a user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Unavailable` - Store operation failed
    async fn delete_by_id(&self, id: &UserId) -> Result<(), StoreError>;
}
