#![allow(async_fn_in_trait)]

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use foodgram_domain::id::{IngredientId, RecipeId, TagId, UserId};
use foodgram_domain::pagination::{Page, PageRequest};

use crate::domain::shopping_list::CartLine;
use crate::domain::types::{
    ImportOutcome, Ingredient, NewIngredient, NewTag, Recipe, RecipeDraft, RecipeFilter,
    RecipeList, RecipeSummary, Tag, User,
};
use crate::error::RecipesServiceError;

/// Read access to tags and ingredients, plus their one-shot bulk import.
pub trait CatalogRepository: Send + Sync {
    async fn list_tags(&self) -> Result<Vec<Tag>, RecipesServiceError>;

    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>, RecipesServiceError>;

    /// Existing tags among `ids`. Missing ids are simply absent from the result.
    async fn find_tags(&self, ids: &[TagId]) -> Result<Vec<Tag>, RecipesServiceError>;

    /// Ingredients ordered by name, optionally filtered by a case-insensitive
    /// name prefix.
    async fn list_ingredients(
        &self,
        name_prefix: Option<&str>,
    ) -> Result<Vec<Ingredient>, RecipesServiceError>;

    async fn find_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, RecipesServiceError>;

    /// Existing ingredients among `ids`.
    async fn find_ingredients(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<Ingredient>, RecipesServiceError>;

    /// Insert all records in one transaction, unless the table already has rows.
    async fn import_ingredients(
        &self,
        records: &[NewIngredient],
    ) -> Result<ImportOutcome, RecipesServiceError>;

    /// Insert all records in one transaction, unless the table already has rows.
    async fn import_tags(&self, records: &[NewTag]) -> Result<ImportOutcome, RecipesServiceError>;
}

/// Repository for the recipe aggregate (recipe row, ingredient lines, tag links).
pub trait RecipeRepository: Send + Sync {
    async fn find(&self, id: RecipeId) -> Result<Option<Recipe>, RecipesServiceError>;

    async fn find_summary(
        &self,
        id: RecipeId,
    ) -> Result<Option<RecipeSummary>, RecipesServiceError>;

    /// Newest first.
    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Page<Recipe>, RecipesServiceError>;

    /// Persist the recipe row, its ingredient lines and tag links atomically.
    ///
    /// A uniqueness violation on the lines maps to `DuplicateIngredient`.
    async fn create(
        &self,
        author_id: UserId,
        draft: &RecipeDraft,
        created_at: DateTime<Utc>,
    ) -> Result<RecipeId, RecipesServiceError>;

    /// Replace scalar fields and both collections atomically.
    ///
    /// Returns `RecipeNotFound` when the recipe vanished in the meantime.
    async fn update(&self, id: RecipeId, draft: &RecipeDraft) -> Result<(), RecipesServiceError>;

    /// Delete a recipe. Returns `true` if a row was deleted.
    async fn delete(&self, id: RecipeId) -> Result<bool, RecipesServiceError>;

    /// Newest first, at most `limit` when given.
    async fn list_by_author(
        &self,
        author_id: UserId,
        limit: Option<u64>,
    ) -> Result<Vec<RecipeSummary>, RecipesServiceError>;

    async fn count_by_author(&self, author_id: UserId) -> Result<u64, RecipesServiceError>;
}

/// Favorites and shopping carts: sets of `(user, recipe)` pairs.
pub trait RecipeListRepository: Send + Sync {
    /// Insert the pair. Returns `false` if it was already present, including
    /// when a concurrent insert won the race. `RecipeNotFound` if the recipe
    /// does not exist.
    async fn add(
        &self,
        list: RecipeList,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<bool, RecipesServiceError>;

    /// Delete the pair. Returns `true` if a row was deleted.
    async fn remove(
        &self,
        list: RecipeList,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<bool, RecipesServiceError>;

    /// The subset of `recipe_ids` the user has in `list`.
    async fn contains(
        &self,
        list: RecipeList,
        user_id: UserId,
        recipe_ids: &[RecipeId],
    ) -> Result<HashSet<RecipeId>, RecipesServiceError>;

    /// Every ingredient line of every recipe in the user's cart, read in a
    /// single statement.
    async fn cart_lines(&self, user_id: UserId) -> Result<Vec<CartLine>, RecipesServiceError>;
}

/// Follow relation between users.
pub trait FollowRepository: Send + Sync {
    /// Returns `false` if the follow already existed. `UserNotFound` if the
    /// author does not exist.
    async fn add(&self, user_id: UserId, author_id: UserId) -> Result<bool, RecipesServiceError>;

    /// Returns `true` if a row was deleted.
    async fn remove(&self, user_id: UserId, author_id: UserId)
    -> Result<bool, RecipesServiceError>;

    /// The subset of `author_ids` followed by `user_id`.
    async fn following(
        &self,
        user_id: UserId,
        author_ids: &[UserId],
    ) -> Result<HashSet<UserId>, RecipesServiceError>;

    /// Authors followed by `user_id`, most recent follow first.
    async fn list_authors(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Page<User>, RecipesServiceError>;
}

/// Repository for local user profiles.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RecipesServiceError>;

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, RecipesServiceError>;

    /// `UserAlreadyExists` on a duplicate id, username or email.
    async fn create(&self, user: &User) -> Result<(), RecipesServiceError>;
}
