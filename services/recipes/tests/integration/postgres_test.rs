//! Storage tests against a live Postgres.
//!
//! Run with `DATABASE_URL` pointing at a disposable database, e.g. the one
//! the contract harness starts. Without it every test here returns early.

use std::time::Duration;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Database, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, TransactionTrait,
};
use sea_orm_migration::MigratorTrait;
use tokio::sync::OnceCell;
use uuid::Uuid;

use foodgram_domain::id::{IngredientId, RecipeId, UserId};
use foodgram_recipes::domain::repository::{RecipeListRepository, RecipeRepository, UserRepository};
use foodgram_recipes::domain::types::{Ingredient, RecipeDraft, RecipeList, User};
use foodgram_recipes::error::RecipesServiceError;
use foodgram_recipes::infra::db::{DbRecipeListRepository, DbRecipeRepository, DbUserRepository};
use foodgram_recipes::usecase::membership::AddToRecipeListUseCase;
use foodgram_recipes_migration::Migrator;
use foodgram_recipes_schema::{favorites, ingredients};

use crate::helpers::{line, recipe_input, user};

static MIGRATED: OnceCell<()> = OnceCell::const_new();

async fn connect() -> Option<DatabaseConnection> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping Postgres test");
        return None;
    };
    MIGRATED
        .get_or_init(|| async {
            let db = Database::connect(&url).await.unwrap();
            Migrator::up(&db, None).await.unwrap();
        })
        .await;
    Some(Database::connect(&url).await.unwrap())
}

async fn seed_user(db: &DatabaseConnection) -> User {
    let user = user(&format!("pg{}", Uuid::now_v7().simple()));
    DbUserRepository { db: db.clone() }.create(&user).await.unwrap();
    user
}

async fn seed_ingredient(db: &DatabaseConnection) -> Ingredient {
    let model = ingredients::ActiveModel {
        name: Set(format!("flour {}", Uuid::now_v7().simple())),
        measurement_unit: Set("g".into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap();
    Ingredient {
        id: IngredientId(model.id),
        name: model.name,
        measurement_unit: model.measurement_unit,
    }
}

async fn seed_recipe(db: &DatabaseConnection, author: UserId) -> RecipeId {
    let flour = seed_ingredient(db).await;
    let draft = RecipeDraft::validate(
        recipe_input("Bread", vec![line(flour.id.0, 500)], vec![]),
        &[flour],
        &[],
    )
    .unwrap();
    DbRecipeRepository { db: db.clone() }
        .create(author, &draft, Utc::now())
        .await
        .unwrap()
}

async fn favorite_rows(db: &DatabaseConnection, user_id: UserId, recipe_id: RecipeId) -> u64 {
    favorites::Entity::find()
        .filter(favorites::Column::UserId.eq(user_id.0))
        .filter(favorites::Column::RecipeId.eq(recipe_id.0))
        .count(db)
        .await
        .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn should_keep_one_favorite_when_adds_race() {
    let Some(db) = connect().await else { return };
    let author = seed_user(&db).await;
    let fan = seed_user(&db).await;
    let recipe_id = seed_recipe(&db, author.id).await;
    let fan_id = fan.id;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let db = db.clone();
            tokio::spawn(async move {
                AddToRecipeListUseCase {
                    recipes: DbRecipeRepository { db: db.clone() },
                    lists: DbRecipeListRepository { db },
                }
                .execute(RecipeList::Favorites, fan_id, recipe_id)
                .await
            })
        })
        .collect();

    let mut added = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(summary) => {
                assert_eq!(summary.id, recipe_id);
                added += 1;
            }
            Err(e) => assert!(matches!(e, RecipesServiceError::FavoriteAlreadyExists)),
        }
    }
    assert_eq!(added, 1);
    assert_eq!(favorite_rows(&db, fan.id, recipe_id).await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn should_report_conflict_when_primary_key_rejects_late_insert() {
    let Some(db) = connect().await else { return };
    let author = seed_user(&db).await;
    let fan = seed_user(&db).await;
    let recipe_id = seed_recipe(&db, author.id).await;

    // An uncommitted row is invisible to the repository's pre-check, so its
    // insert blocks on the key and fails once this transaction commits.
    let txn = db.begin().await.unwrap();
    favorites::Entity::insert(favorites::ActiveModel {
        user_id: Set(fan.id.0),
        recipe_id: Set(recipe_id.0),
        created_at: Set(Utc::now()),
    })
    .exec_without_returning(&txn)
    .await
    .unwrap();

    let lists = DbRecipeListRepository { db: db.clone() };
    let fan_id = fan.id;
    let late =
        tokio::spawn(async move { lists.add(RecipeList::Favorites, fan_id, recipe_id).await });
    tokio::time::sleep(Duration::from_millis(200)).await;
    txn.commit().await.unwrap();

    assert!(!late.await.unwrap().unwrap());
    assert_eq!(favorite_rows(&db, fan.id, recipe_id).await, 1);
}

#[tokio::test]
async fn should_reject_favorite_of_missing_recipe() {
    let Some(db) = connect().await else { return };
    let fan = seed_user(&db).await;

    let result = DbRecipeListRepository { db }
        .add(RecipeList::Favorites, fan.id, RecipeId(i32::MAX))
        .await;

    assert!(matches!(result, Err(RecipesServiceError::RecipeNotFound)));
}

#[tokio::test]
async fn should_roll_back_recipe_when_a_line_is_rejected() {
    let Some(db) = connect().await else { return };
    let author = seed_user(&db).await;
    let flour = seed_ingredient(&db).await;
    let ghost = Ingredient {
        id: IngredientId(i32::MAX),
        name: "ghost".into(),
        measurement_unit: "g".into(),
    };
    // Validation accepts the ghost line; the foreign key on the line table
    // rejects it after the recipe row is written.
    let draft = RecipeDraft::validate(
        recipe_input(
            "Ghost bread",
            vec![line(flour.id.0, 500), line(ghost.id.0, 1)],
            vec![],
        ),
        &[flour, ghost],
        &[],
    )
    .unwrap();
    let recipes = DbRecipeRepository { db };

    let result = recipes.create(author.id, &draft, Utc::now()).await;

    assert!(result.is_err());
    assert_eq!(recipes.count_by_author(author.id).await.unwrap(), 0);
}
