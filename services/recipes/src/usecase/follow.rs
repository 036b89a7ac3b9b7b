use foodgram_domain::id::UserId;
use foodgram_domain::pagination::{Page, PageRequest};

use crate::domain::repository::{FollowRepository, RecipeRepository, UserRepository};
use crate::domain::types::{Subscription, User};
use crate::error::RecipesServiceError;

async fn subscription_of<R: RecipeRepository>(
    recipes: &R,
    author: User,
    recipes_limit: Option<u64>,
) -> Result<Subscription, RecipesServiceError> {
    let preview = recipes.list_by_author(author.id, recipes_limit).await?;
    let recipes_count = recipes.count_by_author(author.id).await?;
    Ok(Subscription {
        author,
        recipes: preview,
        recipes_count,
    })
}

// ── FollowAuthor ─────────────────────────────────────────────────────────────

pub struct FollowAuthorUseCase<F: FollowRepository, U: UserRepository, R: RecipeRepository> {
    pub follows: F,
    pub users: U,
    pub recipes: R,
}

impl<F: FollowRepository, U: UserRepository, R: RecipeRepository> FollowAuthorUseCase<F, U, R> {
    pub async fn execute(
        &self,
        user_id: UserId,
        author_id: UserId,
        recipes_limit: Option<u64>,
    ) -> Result<Subscription, RecipesServiceError> {
        if user_id == author_id {
            return Err(RecipesServiceError::SelfFollow);
        }
        let author = self
            .users
            .find_by_id(author_id)
            .await?
            .ok_or(RecipesServiceError::UserNotFound)?;
        if !self.follows.add(user_id, author_id).await? {
            return Err(RecipesServiceError::FollowAlreadyExists);
        }
        tracing::info!(user_id = %user_id, author_id = %author_id, "author followed");
        subscription_of(&self.recipes, author, recipes_limit).await
    }
}

// ── UnfollowAuthor ───────────────────────────────────────────────────────────

pub struct UnfollowAuthorUseCase<F: FollowRepository> {
    pub follows: F,
}

impl<F: FollowRepository> UnfollowAuthorUseCase<F> {
    pub async fn execute(
        &self,
        user_id: UserId,
        author_id: UserId,
    ) -> Result<(), RecipesServiceError> {
        if !self.follows.remove(user_id, author_id).await? {
            return Err(RecipesServiceError::FollowNotFound);
        }
        tracing::info!(user_id = %user_id, author_id = %author_id, "author unfollowed");
        Ok(())
    }
}

// ── ListSubscriptions ────────────────────────────────────────────────────────

pub struct ListSubscriptionsUseCase<F: FollowRepository, R: RecipeRepository> {
    pub follows: F,
    pub recipes: R,
}

impl<F: FollowRepository, R: RecipeRepository> ListSubscriptionsUseCase<F, R> {
    pub async fn execute(
        &self,
        user_id: UserId,
        page: PageRequest,
        recipes_limit: Option<u64>,
    ) -> Result<Page<Subscription>, RecipesServiceError> {
        let authors = self.follows.list_authors(user_id, page.clamped()).await?;
        let mut results = Vec::with_capacity(authors.results.len());
        for author in authors.results {
            results.push(subscription_of(&self.recipes, author, recipes_limit).await?);
        }
        Ok(Page {
            count: authors.count,
            results,
        })
    }
}
