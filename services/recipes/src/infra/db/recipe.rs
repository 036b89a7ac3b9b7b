use std::collections::HashMap;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    sea_query::{Expr, Query},
};

use foodgram_core::sea_ext::{TransactionErrorExt, is_foreign_key_violation, is_unique_violation};
use foodgram_domain::id::{RecipeId, UserId};
use foodgram_domain::pagination::{Page, PageRequest};
use foodgram_recipes_schema::{
    favorites, ingredients, recipe_ingredients, recipe_tags, recipes, shopping_carts, tags,
};

use super::{ingredient_from_model, summary_from_model, tag_from_model};
use crate::domain::repository::RecipeRepository;
use crate::domain::types::{Recipe, RecipeDraft, RecipeFilter, RecipeIngredient, RecipeSummary, Tag};
use crate::error::RecipesServiceError;

#[derive(Clone)]
pub struct DbRecipeRepository {
    pub db: DatabaseConnection,
}

impl DbRecipeRepository {
    /// Load tags and ingredient lines for `models`, keeping their order.
    async fn assemble(&self, models: Vec<recipes::Model>) -> Result<Vec<Recipe>, RecipesServiceError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();

        let tag_rows = recipe_tags::Entity::find()
            .filter(recipe_tags::Column::RecipeId.is_in(ids.clone()))
            .find_also_related(tags::Entity)
            .order_by_asc(tags::Column::Id)
            .all(&self.db)
            .await
            .context("load recipe tags")?;
        let mut tags_by_recipe: HashMap<i32, Vec<Tag>> = HashMap::new();
        for (link, tag) in tag_rows {
            if let Some(tag) = tag {
                tags_by_recipe
                    .entry(link.recipe_id)
                    .or_default()
                    .push(tag_from_model(tag));
            }
        }

        let line_rows = recipe_ingredients::Entity::find()
            .filter(recipe_ingredients::Column::RecipeId.is_in(ids))
            .find_also_related(ingredients::Entity)
            .order_by_asc(recipe_ingredients::Column::Id)
            .all(&self.db)
            .await
            .context("load recipe ingredient lines")?;
        let mut lines_by_recipe: HashMap<i32, Vec<RecipeIngredient>> = HashMap::new();
        for (line, ingredient) in line_rows {
            if let Some(ingredient) = ingredient {
                lines_by_recipe
                    .entry(line.recipe_id)
                    .or_default()
                    .push(RecipeIngredient {
                        ingredient: ingredient_from_model(ingredient),
                        amount: line.amount,
                    });
            }
        }

        Ok(models
            .into_iter()
            .map(|m| Recipe {
                id: RecipeId(m.id),
                author_id: UserId(m.author_id),
                tags: tags_by_recipe.remove(&m.id).unwrap_or_default(),
                ingredients: lines_by_recipe.remove(&m.id).unwrap_or_default(),
                name: m.name,
                image: m.image,
                text: m.text,
                cooking_time: m.cooking_time,
                created_at: m.created_at,
            })
            .collect())
    }
}

/// Insert the draft's ingredient lines (in request order) and tag links.
async fn insert_collections(
    txn: &DatabaseTransaction,
    recipe_id: i32,
    draft: &RecipeDraft,
) -> Result<(), DbErr> {
    recipe_ingredients::Entity::insert_many(draft.lines().iter().map(|line| {
        recipe_ingredients::ActiveModel {
            recipe_id: Set(recipe_id),
            ingredient_id: Set(line.ingredient_id.0),
            amount: Set(line.amount),
            ..Default::default()
        }
    }))
    .exec_without_returning(txn)
    .await?;
    if !draft.tag_ids().is_empty() {
        recipe_tags::Entity::insert_many(draft.tag_ids().iter().map(|tag_id| {
            recipe_tags::ActiveModel {
                recipe_id: Set(recipe_id),
                tag_id: Set(tag_id.0),
            }
        }))
        .exec_without_returning(txn)
        .await?;
    }
    Ok(())
}

impl RecipeRepository for DbRecipeRepository {
    async fn find(&self, id: RecipeId) -> Result<Option<Recipe>, RecipesServiceError> {
        let Some(model) = recipes::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find recipe by id")?
        else {
            return Ok(None);
        };
        Ok(self.assemble(vec![model]).await?.pop())
    }

    async fn find_summary(
        &self,
        id: RecipeId,
    ) -> Result<Option<RecipeSummary>, RecipesServiceError> {
        let model = recipes::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find recipe summary")?;
        Ok(model.map(summary_from_model))
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Page<Recipe>, RecipesServiceError> {
        let mut query = recipes::Entity::find();
        if let Some(author) = filter.author {
            query = query.filter(recipes::Column::AuthorId.eq(author.0));
        }
        if !filter.tags.is_empty() {
            query = query.filter(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column((recipe_tags::Entity, recipe_tags::Column::RecipeId))
                        .from(recipe_tags::Entity)
                        .inner_join(
                            tags::Entity,
                            Expr::col((tags::Entity, tags::Column::Id))
                                .equals((recipe_tags::Entity, recipe_tags::Column::TagId)),
                        )
                        .and_where(
                            Expr::col((tags::Entity, tags::Column::Slug))
                                .is_in(filter.tags.iter().cloned()),
                        )
                        .to_owned(),
                ),
            );
        }
        if let Some(user) = filter.favorited_by {
            query = query.filter(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column(favorites::Column::RecipeId)
                        .from(favorites::Entity)
                        .and_where(Expr::col(favorites::Column::UserId).eq(user.0))
                        .to_owned(),
                ),
            );
        }
        if let Some(user) = filter.in_cart_of {
            query = query.filter(
                recipes::Column::Id.in_subquery(
                    Query::select()
                        .column(shopping_carts::Column::RecipeId)
                        .from(shopping_carts::Entity)
                        .and_where(Expr::col(shopping_carts::Column::UserId).eq(user.0))
                        .to_owned(),
                ),
            );
        }

        let count = query
            .clone()
            .count(&self.db)
            .await
            .context("count recipes")?;
        let models = query
            .order_by_desc(recipes::Column::CreatedAt)
            .order_by_desc(recipes::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list recipes")?;
        Ok(Page {
            count,
            results: self.assemble(models).await?,
        })
    }

    async fn create(
        &self,
        author_id: UserId,
        draft: &RecipeDraft,
        created_at: DateTime<Utc>,
    ) -> Result<RecipeId, RecipesServiceError> {
        let draft = draft.clone();
        let result = self
            .db
            .transaction::<_, i32, DbErr>(|txn| {
                Box::pin(async move {
                    let recipe = recipes::ActiveModel {
                        author_id: Set(author_id.0),
                        name: Set(draft.name().to_owned()),
                        image: Set(draft.image().map(str::to_owned)),
                        text: Set(draft.text().to_owned()),
                        cooking_time: Set(draft.cooking_time()),
                        created_at: Set(created_at),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;
                    insert_collections(txn, recipe.id, &draft).await?;
                    Ok(recipe.id)
                })
            })
            .await;
        match result.map_err(TransactionErrorExt::into_db_err) {
            Ok(id) => Ok(RecipeId(id)),
            Err(e) if is_unique_violation(&e) => Err(RecipesServiceError::DuplicateIngredient),
            // The author profile was removed while the recipe was being written.
            Err(e) if is_foreign_key_violation(&e) => Err(RecipesServiceError::UserNotFound),
            Err(e) => Err(anyhow::Error::new(e).context("create recipe").into()),
        }
    }

    async fn update(&self, id: RecipeId, draft: &RecipeDraft) -> Result<(), RecipesServiceError> {
        let draft = draft.clone();
        let result = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                Box::pin(async move {
                    let updated = recipes::Entity::update_many()
                        .col_expr(recipes::Column::Name, Expr::value(draft.name()))
                        .col_expr(
                            recipes::Column::Image,
                            Expr::value(draft.image().map(str::to_owned)),
                        )
                        .col_expr(recipes::Column::Text, Expr::value(draft.text()))
                        .col_expr(
                            recipes::Column::CookingTime,
                            Expr::value(draft.cooking_time()),
                        )
                        .filter(recipes::Column::Id.eq(id.0))
                        .exec(txn)
                        .await?;
                    if updated.rows_affected == 0 {
                        return Ok(false);
                    }
                    recipe_ingredients::Entity::delete_many()
                        .filter(recipe_ingredients::Column::RecipeId.eq(id.0))
                        .exec(txn)
                        .await?;
                    recipe_tags::Entity::delete_many()
                        .filter(recipe_tags::Column::RecipeId.eq(id.0))
                        .exec(txn)
                        .await?;
                    insert_collections(txn, id.0, &draft).await?;
                    Ok(true)
                })
            })
            .await;
        match result.map_err(TransactionErrorExt::into_db_err) {
            Ok(true) => Ok(()),
            Ok(false) => Err(RecipesServiceError::RecipeNotFound),
            Err(e) if is_unique_violation(&e) => Err(RecipesServiceError::DuplicateIngredient),
            Err(e) if is_foreign_key_violation(&e) => Err(RecipesServiceError::RecipeNotFound),
            Err(e) => Err(anyhow::Error::new(e).context("update recipe").into()),
        }
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, RecipesServiceError> {
        let result = recipes::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete recipe")?;
        Ok(result.rows_affected > 0)
    }

    async fn list_by_author(
        &self,
        author_id: UserId,
        limit: Option<u64>,
    ) -> Result<Vec<RecipeSummary>, RecipesServiceError> {
        let mut query = recipes::Entity::find()
            .filter(recipes::Column::AuthorId.eq(author_id.0))
            .order_by_desc(recipes::Column::CreatedAt)
            .order_by_desc(recipes::Column::Id);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        let models = query
            .all(&self.db)
            .await
            .context("list recipes by author")?;
        Ok(models.into_iter().map(summary_from_model).collect())
    }

    async fn count_by_author(&self, author_id: UserId) -> Result<u64, RecipesServiceError> {
        let count = recipes::Entity::find()
            .filter(recipes::Column::AuthorId.eq(author_id.0))
            .count(&self.db)
            .await
            .context("count recipes by author")?;
        Ok(count)
    }
}
