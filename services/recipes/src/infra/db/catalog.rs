use anyhow::Context as _;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, TransactionTrait,
    sea_query::{Expr, Func},
};

use foodgram_domain::id::{IngredientId, TagId};
use foodgram_recipes_schema::{ingredients, tags};

use super::{ingredient_from_model, tag_from_model};
use crate::domain::repository::CatalogRepository;
use crate::domain::types::{ImportOutcome, Ingredient, NewIngredient, NewTag, Tag};
use crate::error::RecipesServiceError;

/// Rows per INSERT statement during bulk import.
const IMPORT_CHUNK: usize = 1000;

#[derive(Clone)]
pub struct DbCatalogRepository {
    pub db: DatabaseConnection,
}

/// Escape LIKE wildcards so user input only ever matches literally.
fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl CatalogRepository for DbCatalogRepository {
    async fn list_tags(&self) -> Result<Vec<Tag>, RecipesServiceError> {
        let models = tags::Entity::find()
            .order_by_asc(tags::Column::Id)
            .all(&self.db)
            .await
            .context("list tags")?;
        Ok(models.into_iter().map(tag_from_model).collect())
    }

    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>, RecipesServiceError> {
        let model = tags::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find tag by id")?;
        Ok(model.map(tag_from_model))
    }

    async fn find_tags(&self, ids: &[TagId]) -> Result<Vec<Tag>, RecipesServiceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = tags::Entity::find()
            .filter(tags::Column::Id.is_in(ids.iter().map(|id| id.0)))
            .all(&self.db)
            .await
            .context("find tags by ids")?;
        Ok(models.into_iter().map(tag_from_model).collect())
    }

    async fn list_ingredients(
        &self,
        name_prefix: Option<&str>,
    ) -> Result<Vec<Ingredient>, RecipesServiceError> {
        let mut query = ingredients::Entity::find();
        if let Some(prefix) = name_prefix {
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(ingredients::Column::Name)))
                    .like(like_prefix(prefix)),
            );
        }
        let models = query
            .order_by_asc(ingredients::Column::Name)
            .order_by_asc(ingredients::Column::MeasurementUnit)
            .all(&self.db)
            .await
            .context("list ingredients")?;
        Ok(models.into_iter().map(ingredient_from_model).collect())
    }

    async fn find_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, RecipesServiceError> {
        let model = ingredients::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find ingredient by id")?;
        Ok(model.map(ingredient_from_model))
    }

    async fn find_ingredients(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<Ingredient>, RecipesServiceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = ingredients::Entity::find()
            .filter(ingredients::Column::Id.is_in(ids.iter().map(|id| id.0)))
            .all(&self.db)
            .await
            .context("find ingredients by ids")?;
        Ok(models.into_iter().map(ingredient_from_model).collect())
    }

    async fn import_ingredients(
        &self,
        records: &[NewIngredient],
    ) -> Result<ImportOutcome, RecipesServiceError> {
        let records = records.to_vec();
        let outcome = self
            .db
            .transaction::<_, ImportOutcome, DbErr>(|txn| {
                Box::pin(async move {
                    if ingredients::Entity::find().count(txn).await? > 0 {
                        return Ok(ImportOutcome::Skipped);
                    }
                    for chunk in records.chunks(IMPORT_CHUNK) {
                        ingredients::Entity::insert_many(chunk.iter().map(|r| {
                            ingredients::ActiveModel {
                                name: Set(r.name.clone()),
                                measurement_unit: Set(r.measurement_unit.clone()),
                                ..Default::default()
                            }
                        }))
                        .exec_without_returning(txn)
                        .await?;
                    }
                    Ok(ImportOutcome::Imported(records.len() as u64))
                })
            })
            .await
            .context("import ingredients")?;
        Ok(outcome)
    }

    async fn import_tags(&self, records: &[NewTag]) -> Result<ImportOutcome, RecipesServiceError> {
        let records = records.to_vec();
        let outcome = self
            .db
            .transaction::<_, ImportOutcome, DbErr>(|txn| {
                Box::pin(async move {
                    if tags::Entity::find().count(txn).await? > 0 {
                        return Ok(ImportOutcome::Skipped);
                    }
                    if !records.is_empty() {
                        tags::Entity::insert_many(records.iter().map(|r| tags::ActiveModel {
                            name: Set(r.name.clone()),
                            color: Set(r.color.clone()),
                            slug: Set(r.slug.clone()),
                            ..Default::default()
                        }))
                        .exec_without_returning(txn)
                        .await?;
                    }
                    Ok(ImportOutcome::Imported(records.len() as u64))
                })
            })
            .await
            .context("import tags")?;
        Ok(outcome)
    }
}
