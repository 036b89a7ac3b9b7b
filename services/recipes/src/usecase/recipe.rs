use std::collections::{HashMap, HashSet};

use anyhow::anyhow;
use chrono::Utc;

use foodgram_domain::id::{IngredientId, RecipeId, TagId, UserId};
use foodgram_domain::pagination::{Page, PageRequest};
use foodgram_domain::user::UserRole;

use crate::domain::repository::{
    CatalogRepository, FollowRepository, RecipeListRepository, RecipeRepository, UserRepository,
};
use crate::domain::types::{
    Recipe, RecipeDraft, RecipeFilter, RecipeInput, RecipeList, RecipeView, User, UserView,
};
use crate::error::RecipesServiceError;

/// Resolve the requested catalog rows and run the composition rules.
async fn validate_input<C: CatalogRepository>(
    catalog: &C,
    input: RecipeInput,
) -> Result<RecipeDraft, RecipesServiceError> {
    if input.ingredients.is_empty() {
        return Err(RecipesServiceError::IngredientsRequired);
    }
    let ingredient_ids: Vec<IngredientId> = input
        .ingredients
        .iter()
        .map(|l| l.ingredient_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let tag_ids: Vec<TagId> = input
        .tag_ids
        .iter()
        .copied()
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let known_ingredients = catalog.find_ingredients(&ingredient_ids).await?;
    let known_tags = if tag_ids.is_empty() {
        Vec::new()
    } else {
        catalog.find_tags(&tag_ids).await?
    };
    RecipeDraft::validate(input, &known_ingredients, &known_tags)
}

fn ensure_can_modify(
    recipe: &Recipe,
    actor: UserId,
    role: UserRole,
) -> Result<(), RecipesServiceError> {
    if recipe.author_id == actor || role.is_admin() {
        Ok(())
    } else {
        Err(RecipesServiceError::Forbidden)
    }
}

// ── RecipeViewer ─────────────────────────────────────────────────────────────

/// Annotates recipes with the viewer's favorite/cart flags and the author's
/// profile.
pub struct RecipeViewer<L: RecipeListRepository, F: FollowRepository, U: UserRepository> {
    pub lists: L,
    pub follows: F,
    pub users: U,
}

impl<L: RecipeListRepository, F: FollowRepository, U: UserRepository> RecipeViewer<L, F, U> {
    pub async fn annotate(
        &self,
        viewer: Option<UserId>,
        recipes: Vec<Recipe>,
    ) -> Result<Vec<RecipeView>, RecipesServiceError> {
        if recipes.is_empty() {
            return Ok(Vec::new());
        }
        let recipe_ids: Vec<RecipeId> = recipes.iter().map(|r| r.id).collect();
        let mut author_ids: Vec<UserId> = recipes.iter().map(|r| r.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let authors: HashMap<UserId, User> = self
            .users
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let (favorited, in_cart, followed) = match viewer {
            Some(viewer) => (
                self.lists
                    .contains(RecipeList::Favorites, viewer, &recipe_ids)
                    .await?,
                self.lists
                    .contains(RecipeList::ShoppingCart, viewer, &recipe_ids)
                    .await?,
                self.follows.following(viewer, &author_ids).await?,
            ),
            None => Default::default(),
        };

        recipes
            .into_iter()
            .map(|recipe| -> Result<RecipeView, RecipesServiceError> {
                let author = authors.get(&recipe.author_id).cloned().ok_or_else(|| {
                    anyhow!("recipe {} references missing author {}", recipe.id, recipe.author_id)
                })?;
                Ok(RecipeView {
                    is_favorited: favorited.contains(&recipe.id),
                    is_in_shopping_cart: in_cart.contains(&recipe.id),
                    author: UserView {
                        is_subscribed: followed.contains(&author.id),
                        user: author,
                    },
                    recipe,
                })
            })
            .collect()
    }

    pub async fn annotate_one(
        &self,
        viewer: Option<UserId>,
        recipe: Recipe,
    ) -> Result<RecipeView, RecipesServiceError> {
        self.annotate(viewer, vec![recipe])
            .await?
            .pop()
            .ok_or_else(|| anyhow!("annotating a single recipe yielded nothing").into())
    }
}

// ── CreateRecipe ─────────────────────────────────────────────────────────────

pub struct CreateRecipeUseCase<R: RecipeRepository, C: CatalogRepository, U: UserRepository> {
    pub recipes: R,
    pub catalog: C,
    pub users: U,
}

impl<R: RecipeRepository, C: CatalogRepository, U: UserRepository> CreateRecipeUseCase<R, C, U> {
    pub async fn execute(
        &self,
        author_id: UserId,
        input: RecipeInput,
    ) -> Result<Recipe, RecipesServiceError> {
        if self.users.find_by_id(author_id).await?.is_none() {
            return Err(RecipesServiceError::UserNotFound);
        }
        let draft = validate_input(&self.catalog, input).await?;
        let id = self.recipes.create(author_id, &draft, Utc::now()).await?;
        tracing::info!(recipe_id = %id, author_id = %author_id, "recipe created");
        self.recipes
            .find(id)
            .await?
            .ok_or(RecipesServiceError::RecipeNotFound)
    }
}

// ── UpdateRecipe ─────────────────────────────────────────────────────────────

pub struct UpdateRecipeUseCase<R: RecipeRepository, C: CatalogRepository> {
    pub recipes: R,
    pub catalog: C,
}

impl<R: RecipeRepository, C: CatalogRepository> UpdateRecipeUseCase<R, C> {
    /// Full replace: scalar fields, tags and ingredient lines all come from
    /// `input`. Author and creation time are kept.
    pub async fn execute(
        &self,
        actor: UserId,
        role: UserRole,
        id: RecipeId,
        input: RecipeInput,
    ) -> Result<Recipe, RecipesServiceError> {
        let existing = self
            .recipes
            .find(id)
            .await?
            .ok_or(RecipesServiceError::RecipeNotFound)?;
        ensure_can_modify(&existing, actor, role)?;
        let draft = validate_input(&self.catalog, input).await?;
        self.recipes.update(id, &draft).await?;
        tracing::info!(recipe_id = %id, actor = %actor, "recipe updated");
        self.recipes
            .find(id)
            .await?
            .ok_or(RecipesServiceError::RecipeNotFound)
    }
}

// ── DeleteRecipe ─────────────────────────────────────────────────────────────

pub struct DeleteRecipeUseCase<R: RecipeRepository> {
    pub recipes: R,
}

impl<R: RecipeRepository> DeleteRecipeUseCase<R> {
    pub async fn execute(
        &self,
        actor: UserId,
        role: UserRole,
        id: RecipeId,
    ) -> Result<(), RecipesServiceError> {
        let existing = self
            .recipes
            .find(id)
            .await?
            .ok_or(RecipesServiceError::RecipeNotFound)?;
        ensure_can_modify(&existing, actor, role)?;
        if !self.recipes.delete(id).await? {
            return Err(RecipesServiceError::RecipeNotFound);
        }
        tracing::info!(recipe_id = %id, actor = %actor, "recipe deleted");
        Ok(())
    }
}

// ── GetRecipe ────────────────────────────────────────────────────────────────

pub struct GetRecipeUseCase<
    R: RecipeRepository,
    L: RecipeListRepository,
    F: FollowRepository,
    U: UserRepository,
> {
    pub recipes: R,
    pub viewer: RecipeViewer<L, F, U>,
}

impl<R: RecipeRepository, L: RecipeListRepository, F: FollowRepository, U: UserRepository>
    GetRecipeUseCase<R, L, F, U>
{
    pub async fn execute(
        &self,
        viewer: Option<UserId>,
        id: RecipeId,
    ) -> Result<RecipeView, RecipesServiceError> {
        let recipe = self
            .recipes
            .find(id)
            .await?
            .ok_or(RecipesServiceError::RecipeNotFound)?;
        self.viewer.annotate_one(viewer, recipe).await
    }
}

// ── ListRecipes ──────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct ListRecipesInput {
    pub author: Option<UserId>,
    pub tags: Vec<String>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

pub struct ListRecipesUseCase<
    R: RecipeRepository,
    L: RecipeListRepository,
    F: FollowRepository,
    U: UserRepository,
> {
    pub recipes: R,
    pub viewer: RecipeViewer<L, F, U>,
}

impl<R: RecipeRepository, L: RecipeListRepository, F: FollowRepository, U: UserRepository>
    ListRecipesUseCase<R, L, F, U>
{
    /// Membership filters only apply to an authenticated viewer.
    pub async fn execute(
        &self,
        viewer: Option<UserId>,
        input: ListRecipesInput,
        page: PageRequest,
    ) -> Result<Page<RecipeView>, RecipesServiceError> {
        let filter = RecipeFilter {
            author: input.author,
            tags: input.tags,
            favorited_by: viewer.filter(|_| input.is_favorited),
            in_cart_of: viewer.filter(|_| input.is_in_shopping_cart),
        };
        let page = self.recipes.list(&filter, page.clamped()).await?;
        let views = self.viewer.annotate(viewer, page.results).await?;
        Ok(Page {
            count: page.count,
            results: views,
        })
    }
}
