use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use foodgram_auth_types::identity::IdentityHeaders;

use crate::error::RecipesServiceError;
use crate::state::AppState;
use crate::usecase::shopping_list::{BuildShoppingListUseCase, ExportShoppingListUseCase};

// ── GET /recipes/download_shopping_cart ──────────────────────────────────────

pub async fn download_shopping_cart(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Response, RecipesServiceError> {
    let usecase = ExportShoppingListUseCase {
        build: BuildShoppingListUseCase {
            lists: state.recipe_list_repo(),
        },
        users: state.user_repo(),
    };
    let export = usecase
        .execute(identity.user_id, Utc::now().date_naive())
        .await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", export.filename),
            ),
        ],
        export.body,
    )
        .into_response())
}
