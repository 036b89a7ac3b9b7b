use foodgram_domain::id::RecipeId;
use foodgram_recipes::domain::types::{RecipeList, User};
use foodgram_recipes::error::RecipesServiceError;
use foodgram_recipes::usecase::membership::{AddToRecipeListUseCase, RemoveFromRecipeListUseCase};
use foodgram_recipes::usecase::recipe::CreateRecipeUseCase;

use crate::helpers::{MemoryStore, line, recipe_input, user};

async fn store_with_recipe() -> (MemoryStore, User, RecipeId) {
    let alice = user("alice");
    let store = MemoryStore::new()
        .with_ingredient(1, "flour", "g")
        .with_user(&alice);
    let recipe = CreateRecipeUseCase {
        recipes: store.clone(),
        catalog: store.clone(),
        users: store.clone(),
    }
    .execute(alice.id, recipe_input("Bread", vec![line(1, 500)], vec![]))
    .await
    .unwrap();
    (store, alice, recipe.id)
}

fn add_uc(store: &MemoryStore) -> AddToRecipeListUseCase<MemoryStore, MemoryStore> {
    AddToRecipeListUseCase {
        recipes: store.clone(),
        lists: store.clone(),
    }
}

fn remove_uc(store: &MemoryStore) -> RemoveFromRecipeListUseCase<MemoryStore> {
    RemoveFromRecipeListUseCase {
        lists: store.clone(),
    }
}

#[tokio::test]
async fn should_return_summary_and_reject_second_favorite() {
    let (store, alice, recipe_id) = store_with_recipe().await;
    let uc = add_uc(&store);

    let summary = uc
        .execute(RecipeList::Favorites, alice.id, recipe_id)
        .await
        .unwrap();
    assert_eq!(summary.id, recipe_id);
    assert_eq!(summary.name, "Bread");

    let again = uc.execute(RecipeList::Favorites, alice.id, recipe_id).await;
    assert!(matches!(again, Err(RecipesServiceError::FavoriteAlreadyExists)));
    assert_eq!(store.list_len(RecipeList::Favorites), 1);
}

#[tokio::test]
async fn should_keep_one_row_when_two_adds_race() {
    let (store, alice, recipe_id) = store_with_recipe().await;
    let first = add_uc(&store);
    let second = add_uc(&store);

    let (a, b) = tokio::join!(
        first.execute(RecipeList::ShoppingCart, alice.id, recipe_id),
        second.execute(RecipeList::ShoppingCart, alice.id, recipe_id),
    );

    let results = [a, b];
    let ok = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(RecipesServiceError::ShoppingCartEntryAlreadyExists)))
        .count();
    assert_eq!(ok, 1);
    assert_eq!(conflicts, 1);
    assert_eq!(store.list_len(RecipeList::ShoppingCart), 1);
}

#[tokio::test]
async fn should_succeed_exactly_once_when_two_removes_race() {
    let (store, alice, recipe_id) = store_with_recipe().await;
    add_uc(&store)
        .execute(RecipeList::Favorites, alice.id, recipe_id)
        .await
        .unwrap();
    let first = remove_uc(&store);
    let second = remove_uc(&store);

    let (a, b) = tokio::join!(
        first.execute(RecipeList::Favorites, alice.id, recipe_id),
        second.execute(RecipeList::Favorites, alice.id, recipe_id),
    );

    let results = [a, b];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(RecipesServiceError::FavoriteNotFound)))
            .count(),
        1
    );
    assert_eq!(store.list_len(RecipeList::Favorites), 0);
}

#[tokio::test]
async fn should_report_missing_entry_on_remove() {
    let (store, alice, recipe_id) = store_with_recipe().await;

    let result = remove_uc(&store)
        .execute(RecipeList::ShoppingCart, alice.id, recipe_id)
        .await;

    assert!(matches!(
        result,
        Err(RecipesServiceError::ShoppingCartEntryNotFound)
    ));
}

#[tokio::test]
async fn should_reject_unknown_recipe() {
    let (store, alice, _) = store_with_recipe().await;

    let result = add_uc(&store)
        .execute(RecipeList::Favorites, alice.id, RecipeId(999))
        .await;

    assert!(matches!(result, Err(RecipesServiceError::RecipeNotFound)));
    assert_eq!(store.list_len(RecipeList::Favorites), 0);
}

#[tokio::test]
async fn should_keep_favorites_and_cart_independent() {
    let (store, alice, recipe_id) = store_with_recipe().await;
    let uc = add_uc(&store);

    uc.execute(RecipeList::Favorites, alice.id, recipe_id)
        .await
        .unwrap();
    uc.execute(RecipeList::ShoppingCart, alice.id, recipe_id)
        .await
        .unwrap();

    assert_eq!(store.list_len(RecipeList::Favorites), 1);
    assert_eq!(store.list_len(RecipeList::ShoppingCart), 1);
}
