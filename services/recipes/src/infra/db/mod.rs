//! sea-orm implementations of the domain repositories.

mod catalog;
mod follow;
mod membership;
mod recipe;
mod user;

pub use catalog::DbCatalogRepository;
pub use follow::DbFollowRepository;
pub use membership::DbRecipeListRepository;
pub use recipe::DbRecipeRepository;
pub use user::DbUserRepository;

use foodgram_domain::id::{IngredientId, RecipeId, TagId, UserId};
use foodgram_recipes_schema::{ingredients, recipes, tags, users};

use crate::domain::types::{Ingredient, RecipeSummary, Tag, User};

fn tag_from_model(model: tags::Model) -> Tag {
    Tag {
        id: TagId(model.id),
        name: model.name,
        color: model.color,
        slug: model.slug,
    }
}

fn ingredient_from_model(model: ingredients::Model) -> Ingredient {
    Ingredient {
        id: IngredientId(model.id),
        name: model.name,
        measurement_unit: model.measurement_unit,
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: UserId(model.id),
        username: model.username,
        email: model.email,
        first_name: model.first_name,
        last_name: model.last_name,
        created_at: model.created_at,
    }
}

fn summary_from_model(model: recipes::Model) -> RecipeSummary {
    RecipeSummary {
        id: RecipeId(model.id),
        name: model.name,
        image: model.image,
        cooking_time: model.cooking_time,
    }
}
