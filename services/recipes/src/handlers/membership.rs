use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use foodgram_auth_types::identity::IdentityHeaders;
use foodgram_domain::id::RecipeId;

use super::recipe::RecipeSummaryResponse;
use crate::domain::types::RecipeList;
use crate::error::RecipesServiceError;
use crate::state::AppState;
use crate::usecase::membership::{AddToRecipeListUseCase, RemoveFromRecipeListUseCase};

async fn add(
    list: RecipeList,
    identity: IdentityHeaders,
    state: AppState,
    recipe_id: RecipeId,
) -> Result<(StatusCode, Json<RecipeSummaryResponse>), RecipesServiceError> {
    let usecase = AddToRecipeListUseCase {
        recipes: state.recipe_repo(),
        lists: state.recipe_list_repo(),
    };
    let summary = usecase.execute(list, identity.user_id, recipe_id).await?;
    Ok((StatusCode::CREATED, Json(summary.into())))
}

async fn remove(
    list: RecipeList,
    identity: IdentityHeaders,
    state: AppState,
    recipe_id: RecipeId,
) -> Result<StatusCode, RecipesServiceError> {
    let usecase = RemoveFromRecipeListUseCase {
        lists: state.recipe_list_repo(),
    };
    usecase.execute(list, identity.user_id, recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /recipes/{id}/favorite ──────────────────────────────────────────────

pub async fn add_favorite(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<RecipeId>,
) -> Result<(StatusCode, Json<RecipeSummaryResponse>), RecipesServiceError> {
    add(RecipeList::Favorites, identity, state, id).await
}

// ── DELETE /recipes/{id}/favorite ────────────────────────────────────────────

pub async fn remove_favorite(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<RecipeId>,
) -> Result<StatusCode, RecipesServiceError> {
    remove(RecipeList::Favorites, identity, state, id).await
}

// ── POST /recipes/{id}/shopping_cart ─────────────────────────────────────────

pub async fn add_to_shopping_cart(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<RecipeId>,
) -> Result<(StatusCode, Json<RecipeSummaryResponse>), RecipesServiceError> {
    add(RecipeList::ShoppingCart, identity, state, id).await
}

// ── DELETE /recipes/{id}/shopping_cart ───────────────────────────────────────

pub async fn remove_from_shopping_cart(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<RecipeId>,
) -> Result<StatusCode, RecipesServiceError> {
    remove(RecipeList::ShoppingCart, identity, state, id).await
}
