use axum::{
    Json,
    extract::{Path, RawQuery, State},
};
use serde::{Deserialize, Serialize};

use foodgram_domain::id::{IngredientId, TagId};

use super::parse_query;
use crate::domain::types::{Ingredient, Tag};
use crate::error::RecipesServiceError;
use crate::state::AppState;
use crate::usecase::catalog::{
    GetIngredientUseCase, GetTagUseCase, ListIngredientsUseCase, ListTagsUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct TagResponse {
    pub id: TagId,
    pub name: String,
    pub color: String,
    pub slug: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            color: tag.color,
            slug: tag.slug,
        }
    }
}

#[derive(Serialize)]
pub struct IngredientResponse {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

// ── GET /tags ────────────────────────────────────────────────────────────────

pub async fn list_tags(
    State(state): State<AppState>,
) -> Result<Json<Vec<TagResponse>>, RecipesServiceError> {
    let usecase = ListTagsUseCase {
        catalog: state.catalog_repo(),
    };
    let tags = usecase.execute().await?;
    Ok(Json(tags.into_iter().map(TagResponse::from).collect()))
}

// ── GET /tags/{id} ───────────────────────────────────────────────────────────

pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<TagId>,
) -> Result<Json<TagResponse>, RecipesServiceError> {
    let usecase = GetTagUseCase {
        catalog: state.catalog_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

// ── GET /ingredients ─────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct IngredientListQuery {
    pub name: Option<String>,
}

pub async fn list_ingredients(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<IngredientResponse>>, RecipesServiceError> {
    let query: IngredientListQuery = parse_query(raw_query)?;
    let usecase = ListIngredientsUseCase {
        catalog: state.catalog_repo(),
    };
    let ingredients = usecase.execute(query.name.as_deref()).await?;
    Ok(Json(
        ingredients
            .into_iter()
            .map(IngredientResponse::from)
            .collect(),
    ))
}

// ── GET /ingredients/{id} ────────────────────────────────────────────────────

pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<IngredientId>,
) -> Result<Json<IngredientResponse>, RecipesServiceError> {
    let usecase = GetIngredientUseCase {
        catalog: state.catalog_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}
