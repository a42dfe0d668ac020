use std::sync::Arc;

use auth::PasswordHasher;
use auth::TokenManager;
use chrono::Utc;

use crate::domain::user::models::Login;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::AuthError;
use crate::user::ports::UserStore;

/// Credential checks and token issuance on top of the user store.
///
/// Password hashing and verification are CPU-bound, so both run on the
/// blocking thread pool instead of the async reactor.
pub struct AuthService<S>
where
    S: UserStore,
{
    store: Arc<S>,
    tokens: Arc<TokenManager>,
    password_hasher: PasswordHasher,
}

impl<S> AuthService<S>
where
    S: UserStore,
{
    pub fn new(store: Arc<S>, tokens: Arc<TokenManager>) -> Self {
        Self {
            store,
            tokens,
            password_hasher: PasswordHasher::new(),
        }
    }

    /// Verify credentials and mint an access token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown login or wrong password
    /// * `Store` - Store lookup failed
    /// * `Token` - Token generation failed
    pub async fn issue_access_token(
        &self,
        login: &Login,
        password: &str,
    ) -> Result<String, AuthError> {
        let user = self.check_credentials(login, password).await?;
        let token = self.tokens.generate_access_token(
            user.login.as_str(),
            user.email.as_str(),
            user.role.as_str(),
        )?;
        Ok(token)
    }

    /// Verify credentials and mint an admin token.
    ///
    /// The role gate lives here, at issuance time: the middleware only ever
    /// checks a presented token's audience.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown login or wrong password
    /// * `InsufficientRole` - Valid credentials but the caller is not an admin
    pub async fn issue_admin_token(
        &self,
        login: &Login,
        password: &str,
    ) -> Result<String, AuthError> {
        let user = self.check_credentials(login, password).await?;
        if !user.role.is_admin() {
            return Err(AuthError::InsufficientRole);
        }
        let token = self.tokens.generate_admin_token(user.login.as_str())?;
        Ok(token)
    }

    /// Hash the password and persist a new user.
    ///
    /// # Errors
    /// * `Store` - Login or email already taken, or store failed
    pub async fn register_user(&self, new_user: NewUser) -> Result<User, AuthError> {
        let hasher = self.password_hasher.clone();
        let password = new_user.password;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("hashing task failed: {e}")))??;

        let user = User {
            id: UserId::new(),
            login: new_user.login,
            email: new_user.email,
            role: new_user.role,
            password_hash,
            created_at: Utc::now(),
        };

        Ok(self.store.create(user).await?)
    }

    /// Retrieve all users from the store.
    pub async fn list_users(&self) -> Result<Vec<User>, AuthError> {
        Ok(self.store.list_all().await?)
    }

    /// Delete a user by id.
    ///
    /// # Errors
    /// * `Store(NotFound)` - User does not exist
    pub async fn delete_user(&self, id: &UserId) -> Result<(), AuthError> {
        Ok(self.store.delete_by_id(id).await?)
    }

    async fn check_credentials(&self, login: &Login, password: &str) -> Result<User, AuthError> {
        let user = self.store.find_by_login(login.as_str()).await?;

        // An unknown login still pays for a full comparison against a fixed
        // dummy hash, so its timing matches the wrong-password path.
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let password = password.to_string();
        let hasher = self.password_hasher.clone();
        let password_matches =
            tokio::task::spawn_blocking(move || hasher.verify_or_dummy(&password, stored_hash.as_deref()))
                .await
                .map_err(|e| AuthError::Internal(format!("verification task failed: {e}")))??;

        match user {
            Some(user) if password_matches => Ok(user),
            _ => Err(AuthError::InvalidCredentials),
        }
    }
}
