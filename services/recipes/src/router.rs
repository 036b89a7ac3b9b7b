use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use foodgram_core::health::{database_ready, healthz};
use foodgram_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    catalog::{get_ingredient, get_tag, list_ingredients, list_tags},
    membership::{add_favorite, add_to_shopping_cart, remove_favorite, remove_from_shopping_cart},
    recipe::{create_recipe, delete_recipe, get_recipe, list_recipes, update_recipe},
    shopping_list::download_shopping_cart,
    user::{create_user, get_me, get_user, list_subscriptions, subscribe, unsubscribe},
};
use crate::state::AppState;

async fn readyz(State(state): State<AppState>) -> StatusCode {
    database_ready(&state.db).await
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Catalog
        .route("/tags", get(list_tags))
        .route("/tags/{id}", get(get_tag))
        .route("/ingredients", get(list_ingredients))
        .route("/ingredients/{id}", get(get_ingredient))
        // Recipes
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route("/recipes/download_shopping_cart", get(download_shopping_cart))
        .route(
            "/recipes/{id}",
            get(get_recipe).patch(update_recipe).delete(delete_recipe),
        )
        .route(
            "/recipes/{id}/favorite",
            post(add_favorite).delete(remove_favorite),
        )
        .route(
            "/recipes/{id}/shopping_cart",
            post(add_to_shopping_cart).delete(remove_from_shopping_cart),
        )
        // Users
        .route("/users", post(create_user))
        .route("/users/@me", get(get_me))
        .route("/users/@me/subscriptions", get(list_subscriptions))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/subscribe", post(subscribe).delete(unsubscribe))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
