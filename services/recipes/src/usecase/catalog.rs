use foodgram_domain::id::{IngredientId, TagId};
use foodgram_domain::tag::validate_tag;

use crate::domain::repository::CatalogRepository;
use crate::domain::types::{ImportOutcome, Ingredient, NewIngredient, NewTag, Tag};
use crate::error::RecipesServiceError;

// ── ListTags ─────────────────────────────────────────────────────────────────

pub struct ListTagsUseCase<C: CatalogRepository> {
    pub catalog: C,
}

impl<C: CatalogRepository> ListTagsUseCase<C> {
    pub async fn execute(&self) -> Result<Vec<Tag>, RecipesServiceError> {
        self.catalog.list_tags().await
    }
}

// ── GetTag ───────────────────────────────────────────────────────────────────

pub struct GetTagUseCase<C: CatalogRepository> {
    pub catalog: C,
}

impl<C: CatalogRepository> GetTagUseCase<C> {
    pub async fn execute(&self, id: TagId) -> Result<Tag, RecipesServiceError> {
        self.catalog
            .find_tag(id)
            .await?
            .ok_or(RecipesServiceError::TagNotFound)
    }
}

// ── ListIngredients ──────────────────────────────────────────────────────────

pub struct ListIngredientsUseCase<C: CatalogRepository> {
    pub catalog: C,
}

impl<C: CatalogRepository> ListIngredientsUseCase<C> {
    pub async fn execute(
        &self,
        name_prefix: Option<&str>,
    ) -> Result<Vec<Ingredient>, RecipesServiceError> {
        let prefix = name_prefix.map(str::trim).filter(|p| !p.is_empty());
        self.catalog.list_ingredients(prefix).await
    }
}

// ── GetIngredient ────────────────────────────────────────────────────────────

pub struct GetIngredientUseCase<C: CatalogRepository> {
    pub catalog: C,
}

impl<C: CatalogRepository> GetIngredientUseCase<C> {
    pub async fn execute(&self, id: IngredientId) -> Result<Ingredient, RecipesServiceError> {
        self.catalog
            .find_ingredient(id)
            .await?
            .ok_or(RecipesServiceError::IngredientNotFound)
    }
}

// ── ImportIngredients ────────────────────────────────────────────────────────

pub struct ImportIngredientsUseCase<C: CatalogRepository> {
    pub catalog: C,
}

impl<C: CatalogRepository> ImportIngredientsUseCase<C> {
    /// Seed the ingredient catalog. A no-op once any ingredient exists.
    pub async fn execute(
        &self,
        records: Vec<NewIngredient>,
    ) -> Result<ImportOutcome, RecipesServiceError> {
        let mut cleaned: Vec<NewIngredient> = Vec::with_capacity(records.len());
        for record in records {
            let record = NewIngredient {
                name: record.name.trim().to_owned(),
                measurement_unit: record.measurement_unit.trim().to_owned(),
            };
            if record.name.is_empty() || record.measurement_unit.is_empty() {
                tracing::warn!(?record, "rejecting ingredient record with empty field");
                return Err(RecipesServiceError::MissingData);
            }
            // (name, unit) pairs are unique in storage.
            if !cleaned.contains(&record) {
                cleaned.push(record);
            }
        }
        let outcome = self.catalog.import_ingredients(&cleaned).await?;
        tracing::info!(?outcome, "ingredient import finished");
        Ok(outcome)
    }
}

// ── ImportTags ───────────────────────────────────────────────────────────────

pub struct ImportTagsUseCase<C: CatalogRepository> {
    pub catalog: C,
}

impl<C: CatalogRepository> ImportTagsUseCase<C> {
    /// Seed the tag catalog. A no-op once any tag exists.
    pub async fn execute(&self, records: Vec<NewTag>) -> Result<ImportOutcome, RecipesServiceError> {
        for record in &records {
            if let Err(e) = validate_tag(&record.name, &record.color, &record.slug) {
                tracing::warn!(error = %e, "rejecting tag record");
                return Err(RecipesServiceError::MissingData);
            }
        }
        let outcome = self.catalog.import_tags(&records).await?;
        tracing::info!(?outcome, "tag import finished");
        Ok(outcome)
    }
}

/// The tag set seeded into a fresh database.
pub fn default_tags() -> Vec<NewTag> {
    [
        ("Breakfast", "#5E9653", "breakfast"),
        ("Lunch", "#965D3E", "lunch"),
        ("Dinner", "#7F3E96", "dinner"),
        ("Snack", "#AFB84B", "snack"),
    ]
    .into_iter()
    .map(|(name, color, slug)| NewTag {
        name: name.to_owned(),
        color: color.to_owned(),
        slug: slug.to_owned(),
    })
    .collect()
}
