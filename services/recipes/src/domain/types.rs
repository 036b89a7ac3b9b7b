use chrono::{DateTime, Utc};

use foodgram_domain::id::{IngredientId, RecipeId, TagId, UserId};

use crate::error::RecipesServiceError;

/// Local profile of a gateway-authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

/// A user profile as seen by a particular viewer.
#[derive(Debug, Clone)]
pub struct UserView {
    pub user: User,
    /// Whether the viewer follows this user. Always false for anonymous viewers.
    pub is_subscribed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
}

/// Tag record accepted by the catalog import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    pub name: String,
    pub color: String,
    pub slug: String,
}

/// Ingredient record accepted by the catalog import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIngredient {
    pub name: String,
    pub measurement_unit: String,
}

/// Result of a bulk catalog import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    Imported(u64),
    /// The table already held rows; nothing was written.
    Skipped,
}

/// One requested `{ingredient_id, amount}` line of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientLine {
    pub ingredient_id: IngredientId,
    pub amount: i32,
}

/// A stored ingredient line with its catalog details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeIngredient {
    pub ingredient: Ingredient,
    pub amount: i32,
}

/// Recipe aggregate: the recipe row plus its tags and ingredient lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: RecipeId,
    pub author_id: UserId,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i32,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<RecipeIngredient>,
}

impl Recipe {
    pub fn summary(&self) -> RecipeSummary {
        RecipeSummary {
            id: self.id,
            name: self.name.clone(),
            image: self.image.clone(),
            cooking_time: self.cooking_time,
        }
    }
}

/// Minimal recipe projection returned by toggles and subscription listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: i32,
}

/// Validated recipe fields and collections, ready to persist.
///
/// Only [`RecipeDraft::validate`] builds one, so a draft always has at least
/// one ingredient line, no duplicate ingredients, no duplicate tags and
/// positive amounts and cooking time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    name: String,
    text: String,
    image: Option<String>,
    cooking_time: i32,
    tag_ids: Vec<TagId>,
    lines: Vec<IngredientLine>,
}

/// Unvalidated recipe fields as submitted by a client.
#[derive(Debug, Clone)]
pub struct RecipeInput {
    pub name: String,
    pub text: String,
    pub image: Option<String>,
    pub cooking_time: i32,
    pub tag_ids: Vec<TagId>,
    pub ingredients: Vec<IngredientLine>,
}

impl RecipeDraft {
    /// Apply the composition rules in order, first failure wins:
    /// empty ingredient list, then per line unknown ingredient, duplicate
    /// ingredient and non-positive amount, then unknown tags, then cooking time.
    ///
    /// `known_ingredients` and `known_tags` are the catalog rows that exist
    /// among the requested ids.
    pub fn validate(
        input: RecipeInput,
        known_ingredients: &[Ingredient],
        known_tags: &[Tag],
    ) -> Result<Self, RecipesServiceError> {
        if input.ingredients.is_empty() {
            return Err(RecipesServiceError::IngredientsRequired);
        }
        let mut seen = Vec::with_capacity(input.ingredients.len());
        for line in &input.ingredients {
            if !known_ingredients
                .iter()
                .any(|i| i.id == line.ingredient_id)
            {
                return Err(RecipesServiceError::IngredientNotFound);
            }
            if seen.contains(&line.ingredient_id) {
                return Err(RecipesServiceError::DuplicateIngredient);
            }
            if line.amount < 1 {
                return Err(RecipesServiceError::InvalidAmount);
            }
            seen.push(line.ingredient_id);
        }

        let mut tag_ids: Vec<TagId> = Vec::with_capacity(input.tag_ids.len());
        for id in input.tag_ids {
            if !known_tags.iter().any(|t| t.id == id) {
                return Err(RecipesServiceError::TagNotFound);
            }
            if !tag_ids.contains(&id) {
                tag_ids.push(id);
            }
        }

        if input.cooking_time < 1 {
            return Err(RecipesServiceError::InvalidCookingTime);
        }

        Ok(Self {
            name: input.name,
            text: input.text,
            image: input.image,
            cooking_time: input.cooking_time,
            tag_ids,
            lines: input.ingredients,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn cooking_time(&self) -> i32 {
        self.cooking_time
    }

    pub fn tag_ids(&self) -> &[TagId] {
        &self.tag_ids
    }

    pub fn lines(&self) -> &[IngredientLine] {
        &self.lines
    }
}

/// A recipe annotated relative to the requesting viewer.
#[derive(Debug, Clone)]
pub struct RecipeView {
    pub recipe: Recipe,
    pub author: UserView,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Filters for the recipe listing.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    pub author: Option<UserId>,
    /// Tag slugs; a recipe matches if it carries any of them.
    pub tags: Vec<String>,
    /// Only recipes favorited by this user.
    pub favorited_by: Option<UserId>,
    /// Only recipes in this user's shopping cart.
    pub in_cart_of: Option<UserId>,
}

/// The two user↔recipe membership sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeList {
    Favorites,
    ShoppingCart,
}

impl RecipeList {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Favorites => "favorites",
            Self::ShoppingCart => "shopping_cart",
        }
    }

    pub fn already_exists(self) -> RecipesServiceError {
        match self {
            Self::Favorites => RecipesServiceError::FavoriteAlreadyExists,
            Self::ShoppingCart => RecipesServiceError::ShoppingCartEntryAlreadyExists,
        }
    }

    pub fn not_found(self) -> RecipesServiceError {
        match self {
            Self::Favorites => RecipesServiceError::FavoriteNotFound,
            Self::ShoppingCart => RecipesServiceError::ShoppingCartEntryNotFound,
        }
    }
}

/// A followed author with a preview of their recipes.
#[derive(Debug, Clone)]
pub struct Subscription {
    pub author: User,
    pub recipes: Vec<RecipeSummary>,
    pub recipes_count: u64,
}
