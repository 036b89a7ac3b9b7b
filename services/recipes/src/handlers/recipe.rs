use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use foodgram_auth_types::identity::IdentityHeaders;
use foodgram_domain::id::{IngredientId, RecipeId, TagId, UserId};
use foodgram_domain::pagination::{Page, PageRequest};

use super::catalog::TagResponse;
use super::user::UserResponse;
use super::{parse_query, query_flag};
use crate::domain::types::{IngredientLine, RecipeInput, RecipeSummary, RecipeView};
use crate::error::RecipesServiceError;
use crate::state::AppState;
use crate::usecase::recipe::{
    CreateRecipeUseCase, DeleteRecipeUseCase, GetRecipeUseCase, ListRecipesInput,
    ListRecipesUseCase, UpdateRecipeUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct RecipeIngredientResponse {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Serialize)]
pub struct RecipeResponse {
    pub id: RecipeId,
    pub tags: Vec<TagResponse>,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i32,
    #[serde(serialize_with = "foodgram_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<RecipeView> for RecipeResponse {
    fn from(view: RecipeView) -> Self {
        let recipe = view.recipe;
        Self {
            id: recipe.id,
            tags: recipe.tags.into_iter().map(TagResponse::from).collect(),
            author: view.author.into(),
            ingredients: recipe
                .ingredients
                .into_iter()
                .map(|line| RecipeIngredientResponse {
                    id: line.ingredient.id,
                    name: line.ingredient.name,
                    measurement_unit: line.ingredient.measurement_unit,
                    amount: line.amount,
                })
                .collect(),
            is_favorited: view.is_favorited,
            is_in_shopping_cart: view.is_in_shopping_cart,
            name: recipe.name,
            image: recipe.image,
            text: recipe.text,
            cooking_time: recipe.cooking_time,
            created_at: recipe.created_at,
        }
    }
}

/// Minimal recipe projection.
#[derive(Serialize)]
pub struct RecipeSummaryResponse {
    pub id: RecipeId,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: i32,
}

impl From<RecipeSummary> for RecipeSummaryResponse {
    fn from(summary: RecipeSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            image: summary.image,
            cooking_time: summary.cooking_time,
        }
    }
}

// ── Request types ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct IngredientLineRequest {
    pub id: IngredientId,
    pub amount: i32,
}

/// Body of both create and update; update replaces every field.
#[derive(Deserialize)]
pub struct RecipeRequest {
    pub ingredients: Vec<IngredientLineRequest>,
    #[serde(default)]
    pub tags: Vec<TagId>,
    pub image: Option<String>,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
}

impl RecipeRequest {
    fn into_input(self) -> Result<RecipeInput, RecipesServiceError> {
        let name = self.name.trim().to_owned();
        if name.is_empty() || name.chars().count() > 200 || self.text.trim().is_empty() {
            return Err(RecipesServiceError::MissingData);
        }
        Ok(RecipeInput {
            name,
            text: self.text,
            image: self.image.filter(|i| !i.is_empty()),
            cooking_time: self.cooking_time,
            tag_ids: self.tags,
            ingredients: self
                .ingredients
                .into_iter()
                .map(|line| IngredientLine {
                    ingredient_id: line.id,
                    amount: line.amount,
                })
                .collect(),
        })
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct RecipeListQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    pub author: Option<UserId>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
}

// ── GET /recipes ─────────────────────────────────────────────────────────────

pub async fn list_recipes(
    identity: Option<IdentityHeaders>,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Page<RecipeResponse>>, RecipesServiceError> {
    let query: RecipeListQuery = parse_query(raw_query)?;
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    };
    let usecase = ListRecipesUseCase {
        recipes: state.recipe_repo(),
        viewer: state.recipe_viewer(),
    };
    let recipes = usecase
        .execute(
            identity.map(|i| i.user_id),
            ListRecipesInput {
                author: query.author,
                tags: query.tags,
                is_favorited: query_flag(query.is_favorited.as_deref()),
                is_in_shopping_cart: query_flag(query.is_in_shopping_cart.as_deref()),
            },
            page,
        )
        .await?;
    Ok(Json(recipes.map(RecipeResponse::from)))
}

// ── GET /recipes/{id} ────────────────────────────────────────────────────────

pub async fn get_recipe(
    identity: Option<IdentityHeaders>,
    State(state): State<AppState>,
    Path(id): Path<RecipeId>,
) -> Result<Json<RecipeResponse>, RecipesServiceError> {
    let usecase = GetRecipeUseCase {
        recipes: state.recipe_repo(),
        viewer: state.recipe_viewer(),
    };
    let view = usecase.execute(identity.map(|i| i.user_id), id).await?;
    Ok(Json(view.into()))
}

// ── POST /recipes ────────────────────────────────────────────────────────────

pub async fn create_recipe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<RecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), RecipesServiceError> {
    let usecase = CreateRecipeUseCase {
        recipes: state.recipe_repo(),
        catalog: state.catalog_repo(),
        users: state.user_repo(),
    };
    let recipe = usecase
        .execute(identity.user_id, body.into_input()?)
        .await?;
    let view = state
        .recipe_viewer()
        .annotate_one(Some(identity.user_id), recipe)
        .await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

// ── PATCH /recipes/{id} ──────────────────────────────────────────────────────

pub async fn update_recipe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<RecipeId>,
    Json(body): Json<RecipeRequest>,
) -> Result<Json<RecipeResponse>, RecipesServiceError> {
    let usecase = UpdateRecipeUseCase {
        recipes: state.recipe_repo(),
        catalog: state.catalog_repo(),
    };
    let recipe = usecase
        .execute(identity.user_id, identity.role(), id, body.into_input()?)
        .await?;
    let view = state
        .recipe_viewer()
        .annotate_one(Some(identity.user_id), recipe)
        .await?;
    Ok(Json(view.into()))
}

// ── DELETE /recipes/{id} ─────────────────────────────────────────────────────

pub async fn delete_recipe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<RecipeId>,
) -> Result<StatusCode, RecipesServiceError> {
    let usecase = DeleteRecipeUseCase {
        recipes: state.recipe_repo(),
    };
    usecase
        .execute(identity.user_id, identity.role(), id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
