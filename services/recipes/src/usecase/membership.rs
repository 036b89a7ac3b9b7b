use foodgram_domain::id::{RecipeId, UserId};

use crate::domain::repository::{RecipeListRepository, RecipeRepository};
use crate::domain::types::{RecipeList, RecipeSummary};
use crate::error::RecipesServiceError;

// ── AddToRecipeList ──────────────────────────────────────────────────────────

pub struct AddToRecipeListUseCase<R: RecipeRepository, L: RecipeListRepository> {
    pub recipes: R,
    pub lists: L,
}

impl<R: RecipeRepository, L: RecipeListRepository> AddToRecipeListUseCase<R, L> {
    /// Add a recipe to the user's favorites or cart exactly once.
    ///
    /// A second add, concurrent or not, fails with the list's
    /// "already exists" conflict and leaves a single row.
    pub async fn execute(
        &self,
        list: RecipeList,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<RecipeSummary, RecipesServiceError> {
        let summary = self
            .recipes
            .find_summary(recipe_id)
            .await?
            .ok_or(RecipesServiceError::RecipeNotFound)?;
        if !self.lists.add(list, user_id, recipe_id).await? {
            return Err(list.already_exists());
        }
        tracing::info!(
            list = list.as_str(),
            user_id = %user_id,
            recipe_id = %recipe_id,
            "recipe added to list"
        );
        Ok(summary)
    }
}

// ── RemoveFromRecipeList ─────────────────────────────────────────────────────

pub struct RemoveFromRecipeListUseCase<L: RecipeListRepository> {
    pub lists: L,
}

impl<L: RecipeListRepository> RemoveFromRecipeListUseCase<L> {
    pub async fn execute(
        &self,
        list: RecipeList,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<(), RecipesServiceError> {
        if !self.lists.remove(list, user_id, recipe_id).await? {
            return Err(list.not_found());
        }
        tracing::info!(
            list = list.as_str(),
            user_id = %user_id,
            recipe_id = %recipe_id,
            "recipe removed from list"
        );
        Ok(())
    }
}
