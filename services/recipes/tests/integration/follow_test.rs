use foodgram_domain::pagination::PageRequest;
use foodgram_recipes::error::RecipesServiceError;
use foodgram_recipes::usecase::follow::{
    FollowAuthorUseCase, ListSubscriptionsUseCase, UnfollowAuthorUseCase,
};
use foodgram_recipes::usecase::recipe::CreateRecipeUseCase;

use crate::helpers::{MemoryStore, line, recipe_input, user};

fn follow_uc(store: &MemoryStore) -> FollowAuthorUseCase<MemoryStore, MemoryStore, MemoryStore> {
    FollowAuthorUseCase {
        follows: store.clone(),
        users: store.clone(),
        recipes: store.clone(),
    }
}

#[tokio::test]
async fn should_reject_following_yourself() {
    let alice = user("alice");
    let store = MemoryStore::new().with_user(&alice);

    let result = follow_uc(&store).execute(alice.id, alice.id, None).await;

    assert!(matches!(result, Err(RecipesServiceError::SelfFollow)));
    assert_eq!(store.follow_count(), 0);
}

#[tokio::test]
async fn should_follow_once_when_two_requests_race() {
    let alice = user("alice");
    let bob = user("bob");
    let store = MemoryStore::new().with_user(&alice).with_user(&bob);
    let first = follow_uc(&store);
    let second = follow_uc(&store);

    let (a, b) = tokio::join!(
        first.execute(bob.id, alice.id, None),
        second.execute(bob.id, alice.id, None),
    );

    let results = [a, b];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(RecipesServiceError::FollowAlreadyExists)))
            .count(),
        1
    );
    assert_eq!(store.follow_count(), 1);
}

#[tokio::test]
async fn should_report_missing_follow_on_unfollow() {
    let alice = user("alice");
    let bob = user("bob");
    let store = MemoryStore::new().with_user(&alice).with_user(&bob);
    let uc = UnfollowAuthorUseCase {
        follows: store.clone(),
    };

    let result = uc.execute(bob.id, alice.id).await;
    assert!(matches!(result, Err(RecipesServiceError::FollowNotFound)));

    follow_uc(&store).execute(bob.id, alice.id, None).await.unwrap();
    uc.execute(bob.id, alice.id).await.unwrap();
    assert_eq!(store.follow_count(), 0);
}

#[tokio::test]
async fn should_list_subscriptions_with_limited_preview() {
    let alice = user("alice");
    let bob = user("bob");
    let store = MemoryStore::new()
        .with_ingredient(1, "flour", "g")
        .with_user(&alice)
        .with_user(&bob);
    let create = CreateRecipeUseCase {
        recipes: store.clone(),
        catalog: store.clone(),
        users: store.clone(),
    };
    for name in ["Bread", "Buns", "Rolls"] {
        create
            .execute(alice.id, recipe_input(name, vec![line(1, 100)], vec![]))
            .await
            .unwrap();
    }

    let sub = follow_uc(&store).execute(bob.id, alice.id, Some(1)).await.unwrap();
    assert_eq!(sub.recipes.len(), 1);
    assert_eq!(sub.recipes_count, 3);

    let subs = ListSubscriptionsUseCase {
        follows: store.clone(),
        recipes: store.clone(),
    }
    .execute(bob.id, PageRequest::default(), Some(2))
    .await
    .unwrap();
    assert_eq!(subs.count, 1);
    assert_eq!(subs.results[0].author.id, alice.id);
    assert_eq!(subs.results[0].recipes.len(), 2);
    assert_eq!(subs.results[0].recipes[0].name, "Rolls");
    assert_eq!(subs.results[0].recipes_count, 3);
}
