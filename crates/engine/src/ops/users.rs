use chrono::Utc;

use crate::{
    AuthenticatedUser, EngineError, ManagementLevel, ResultEngine, Session, Status, User,
    UserFilter, UserToken,
    auth::{hash_password_blocking, verify_password_blocking},
    listing::{PageParams, Paged},
    users,
    util::{normalize_optional_text, normalize_required_text},
};

use super::Engine;

const INVALID_CREDENTIALS: &str = "invalid username or password";
const FORBIDDEN: &str = "You do not have permission to access this resource";

#[derive(Clone, Debug, Default)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub level: Option<i32>,
    pub status: Option<i32>,
}

/// Partial user update; blank or zero fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct UserPatch {
    pub username: Option<String>,
    pub password: Option<String>,
    pub level: Option<i32>,
    pub status: Option<i32>,
}

fn required_password(password: &str) -> ResultEngine<()> {
    if password.is_empty() {
        return Err(EngineError::InvalidInput("password is required".to_string()));
    }
    Ok(())
}

impl Engine {
    /// Register a user. Usernames are unique across active and inactive rows.
    pub async fn add_user(&self, input: NewUser) -> ResultEngine<User> {
        let username = normalize_required_text(&input.username, "username")?;
        required_password(&input.password)?;
        let level = ManagementLevel::from_input(input.level)?.unwrap_or_default();
        let status = Status::from_input(input.status)?.unwrap_or_default();

        if self.users.find_by_username(&username, None).await?.is_some() {
            return Err(EngineError::ExistingKey("username duplicate".to_string()));
        }

        let password_hash = hash_password_blocking(input.password).await?;
        let user = self
            .users
            .insert(&User::new(username, password_hash, level, status))
            .await?;
        tracing::info!(user_id = user.id, management_level = ?user.level, "user created");
        Ok(user)
    }

    /// Check credentials and issue a bearer token.
    pub async fn login(&self, username: &str, password: &str) -> ResultEngine<Session> {
        let Some(user) = self
            .users
            .find_by_username(username.trim(), Some(Status::Active))
            .await?
        else {
            tracing::debug!("login rejected: unknown or inactive username");
            return Err(EngineError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_password_blocking(password.to_string(), user.password_hash.clone()).await? {
            tracing::debug!(user_id = user.id, "login rejected: password mismatch");
            return Err(EngineError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.signer.issue(user.id, &user.username)?;
        self.tokens
            .insert(&UserToken::new(user.id, token.clone()))
            .await?;
        tracing::info!(user_id = user.id, "user logged in");

        Ok(Session {
            token,
            level: user.level,
            user_id: user.id,
        })
    }

    /// Revoke a token by deleting its row.
    pub async fn logout(&self, token: &str) -> ResultEngine<()> {
        let row = self
            .tokens
            .find_by_token(token)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("token not found".to_string()))?;
        self.tokens.delete(row.id).await?;
        tracing::info!(user_id = row.user_id, "user logged out");
        Ok(())
    }

    /// Resolve the caller behind a bearer token and gate on its level.
    ///
    /// The signature and expiry are checked first, then the stored token row
    /// and the owning user, which must be active. Only the final level check
    /// yields [`EngineError::Forbidden`]; everything else is
    /// [`EngineError::Unauthorized`].
    pub async fn authorize(
        &self,
        token: &str,
        allowed: &[ManagementLevel],
    ) -> ResultEngine<AuthenticatedUser> {
        let claims = self.signer.verify(token)?;

        let row = self
            .tokens
            .find_by_token(token)
            .await?
            .ok_or_else(|| EngineError::Unauthorized("token has been revoked".to_string()))?;
        if row.user_id != claims.user_id {
            return Err(EngineError::Unauthorized("invalid token".to_string()));
        }

        let user = self
            .users
            .find_by_id(claims.user_id, Some(Status::Active))
            .await?
            .ok_or_else(|| EngineError::Unauthorized("user not found or inactive".to_string()))?;

        if !allowed.contains(&user.level) {
            tracing::debug!(user_id = user.id, management_level = ?user.level, "access denied");
            return Err(EngineError::Forbidden(FORBIDDEN.to_string()));
        }

        Ok(AuthenticatedUser {
            id: user.id,
            username: user.username,
            level: user.level,
        })
    }

    pub async fn list_users(
        &self,
        filter: &UserFilter,
        page: &PageParams,
    ) -> ResultEngine<Paged<User>> {
        let page = page.normalize(users::ORDERABLE_COLUMNS);
        self.users.find_all(filter, &page).await
    }

    pub async fn update_user(&self, id: i32, patch: UserPatch) -> ResultEngine<User> {
        let mut user = self
            .users
            .find_by_id(id, None)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not found".to_string()))?;

        if let Some(username) = normalize_optional_text(patch.username.as_deref())
            && username != user.username
        {
            if self.users.find_by_username(&username, None).await?.is_some() {
                return Err(EngineError::ExistingKey("username duplicate".to_string()));
            }
            user.username = username;
        }
        if let Some(password) = patch.password.filter(|p| !p.is_empty()) {
            user.password_hash = hash_password_blocking(password).await?;
        }
        if let Some(level) = ManagementLevel::from_input(patch.level)? {
            user.level = level;
        }
        if let Some(status) = Status::from_input(patch.status)? {
            user.status = status;
        }
        if user.status.is_active() {
            user.deleted_at = None;
        }

        user.updated_at = Utc::now();
        self.users.update(&user).await
    }

    pub async fn remove_user(&self, id: i32) -> ResultEngine<()> {
        let user = self
            .users
            .find_by_id(id, Some(Status::Active))
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not found".to_string()))?;
        self.users.soft_delete(user.id).await?;
        tracing::info!(user_id = user.id, "user removed");
        Ok(())
    }
}
