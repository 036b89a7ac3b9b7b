use std::collections::HashSet;

use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, PaginatorTrait, QueryFilter, QuerySelect, Statement, TransactionTrait,
};

use foodgram_core::sea_ext::{TransactionErrorExt, is_foreign_key_violation, is_unique_violation};
use foodgram_domain::id::{RecipeId, UserId};
use foodgram_recipes_schema::{favorites, recipes, shopping_carts};

use crate::domain::repository::RecipeListRepository;
use crate::domain::shopping_list::CartLine;
use crate::domain::types::RecipeList;
use crate::error::RecipesServiceError;

/// Favorites and shopping carts share one implementation; the two tables
/// have the same shape.
#[derive(Clone)]
pub struct DbRecipeListRepository {
    pub db: DatabaseConnection,
}

#[derive(Debug, FromQueryResult)]
struct CartLineRow {
    name: String,
    measurement_unit: String,
    amount: i32,
}

const CART_LINES_SQL: &str = r#"
    SELECT i.name, i.measurement_unit, ri.amount
    FROM shopping_carts sc
    JOIN recipe_ingredients ri ON ri.recipe_id = sc.recipe_id
    JOIN ingredients i ON i.id = ri.ingredient_id
    WHERE sc.user_id = $1
"#;

impl DbRecipeListRepository {
    /// A foreign key rejected the insert: tell a vanished recipe apart from a
    /// user without a local profile.
    async fn missing_reference(&self, recipe_id: RecipeId) -> RecipesServiceError {
        match recipes::Entity::find_by_id(recipe_id.0).count(&self.db).await {
            Ok(0) => RecipesServiceError::RecipeNotFound,
            Ok(_) => RecipesServiceError::UserNotFound,
            Err(e) => anyhow::Error::new(e)
                .context("resolve missing membership reference")
                .into(),
        }
    }
}

impl RecipeListRepository for DbRecipeListRepository {
    async fn add(
        &self,
        list: RecipeList,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<bool, RecipesServiceError> {
        let now = Utc::now();
        // The pre-check only saves a write; the primary key decides races.
        let result = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                Box::pin(async move {
                    match list {
                        RecipeList::Favorites => {
                            let key = (user_id.0, recipe_id.0);
                            if favorites::Entity::find_by_id(key).one(txn).await?.is_some() {
                                return Ok(false);
                            }
                            favorites::Entity::insert(favorites::ActiveModel {
                                user_id: Set(user_id.0),
                                recipe_id: Set(recipe_id.0),
                                created_at: Set(now),
                            })
                            .exec_without_returning(txn)
                            .await?;
                        }
                        RecipeList::ShoppingCart => {
                            let key = (user_id.0, recipe_id.0);
                            if shopping_carts::Entity::find_by_id(key)
                                .one(txn)
                                .await?
                                .is_some()
                            {
                                return Ok(false);
                            }
                            shopping_carts::Entity::insert(shopping_carts::ActiveModel {
                                user_id: Set(user_id.0),
                                recipe_id: Set(recipe_id.0),
                                created_at: Set(now),
                            })
                            .exec_without_returning(txn)
                            .await?;
                        }
                    }
                    Ok(true)
                })
            })
            .await;
        match result.map_err(TransactionErrorExt::into_db_err) {
            Ok(added) => Ok(added),
            Err(e) if is_unique_violation(&e) => {
                tracing::debug!(list = list.as_str(), "concurrent add lost the race");
                Ok(false)
            }
            Err(e) if is_foreign_key_violation(&e) => Err(self.missing_reference(recipe_id).await),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("add recipe to {}", list.as_str()))
                .into()),
        }
    }

    async fn remove(
        &self,
        list: RecipeList,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<bool, RecipesServiceError> {
        let result = match list {
            RecipeList::Favorites => favorites::Entity::delete_many()
                .filter(favorites::Column::UserId.eq(user_id.0))
                .filter(favorites::Column::RecipeId.eq(recipe_id.0))
                .exec(&self.db)
                .await
                .context("remove favorite")?,
            RecipeList::ShoppingCart => shopping_carts::Entity::delete_many()
                .filter(shopping_carts::Column::UserId.eq(user_id.0))
                .filter(shopping_carts::Column::RecipeId.eq(recipe_id.0))
                .exec(&self.db)
                .await
                .context("remove shopping cart entry")?,
        };
        Ok(result.rows_affected > 0)
    }

    async fn contains(
        &self,
        list: RecipeList,
        user_id: UserId,
        recipe_ids: &[RecipeId],
    ) -> Result<HashSet<RecipeId>, RecipesServiceError> {
        if recipe_ids.is_empty() {
            return Ok(HashSet::new());
        }
        let ids = recipe_ids.iter().map(|id| id.0);
        let found: Vec<i32> = match list {
            RecipeList::Favorites => favorites::Entity::find()
                .select_only()
                .column(favorites::Column::RecipeId)
                .filter(favorites::Column::UserId.eq(user_id.0))
                .filter(favorites::Column::RecipeId.is_in(ids))
                .into_tuple()
                .all(&self.db)
                .await
                .context("check favorites")?,
            RecipeList::ShoppingCart => shopping_carts::Entity::find()
                .select_only()
                .column(shopping_carts::Column::RecipeId)
                .filter(shopping_carts::Column::UserId.eq(user_id.0))
                .filter(shopping_carts::Column::RecipeId.is_in(ids))
                .into_tuple()
                .all(&self.db)
                .await
                .context("check shopping cart")?,
        };
        Ok(found.into_iter().map(RecipeId).collect())
    }

    async fn cart_lines(&self, user_id: UserId) -> Result<Vec<CartLine>, RecipesServiceError> {
        let rows = CartLineRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            CART_LINES_SQL,
            [user_id.0.into()],
        ))
        .all(&self.db)
        .await
        .context("load shopping cart lines")?;
        Ok(rows
            .into_iter()
            .map(|row| CartLine {
                name: row.name,
                measurement_unit: row.measurement_unit,
                amount: row.amount,
            })
            .collect())
    }
}
