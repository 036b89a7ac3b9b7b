use chrono::Utc;

use foodgram_domain::id::UserId;
use foodgram_domain::user::validate_username;

use crate::domain::repository::{FollowRepository, UserRepository};
use crate::domain::types::{User, UserView};
use crate::error::RecipesServiceError;

// ── CreateUser ───────────────────────────────────────────────────────────────

pub struct CreateUserInput {
    /// Issued by the gateway's identity provider.
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

pub struct CreateUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> CreateUserUseCase<U> {
    pub async fn execute(&self, input: CreateUserInput) -> Result<User, RecipesServiceError> {
        if !validate_username(&input.username) {
            return Err(RecipesServiceError::InvalidUsername);
        }
        if input.email.trim().is_empty() {
            return Err(RecipesServiceError::MissingData);
        }
        let user = User {
            id: input.id,
            username: input.username,
            email: input.email.trim().to_owned(),
            first_name: input.first_name,
            last_name: input.last_name,
            created_at: Utc::now(),
        };
        self.users.create(&user).await?;
        tracing::info!(user_id = %user.id, "user profile created");
        Ok(user)
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<U: UserRepository, F: FollowRepository> {
    pub users: U,
    pub follows: F,
}

impl<U: UserRepository, F: FollowRepository> GetUserUseCase<U, F> {
    pub async fn execute(
        &self,
        viewer: Option<UserId>,
        id: UserId,
    ) -> Result<UserView, RecipesServiceError> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(RecipesServiceError::UserNotFound)?;
        let is_subscribed = match viewer {
            Some(viewer) if viewer != id => {
                self.follows.following(viewer, &[id]).await?.contains(&id)
            }
            _ => false,
        };
        Ok(UserView {
            user,
            is_subscribed,
        })
    }
}
