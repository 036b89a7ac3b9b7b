use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use foodgram_domain::id::{IngredientId, RecipeId, TagId, UserId};
use foodgram_domain::pagination::{Page, PageRequest};
use foodgram_recipes::domain::repository::{
    CatalogRepository, FollowRepository, RecipeListRepository, RecipeRepository, UserRepository,
};
use foodgram_recipes::domain::shopping_list::CartLine;
use foodgram_recipes::domain::types::{
    ImportOutcome, Ingredient, IngredientLine, NewIngredient, NewTag, Recipe, RecipeDraft,
    RecipeFilter, RecipeIngredient, RecipeInput, RecipeList, RecipeSummary, Tag, User,
};
use foodgram_recipes::error::RecipesServiceError;
use foodgram_recipes::usecase::recipe::RecipeViewer;

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn user(username: &str) -> User {
    User {
        id: UserId(Uuid::now_v7()),
        username: username.into(),
        email: format!("{username}@example.com"),
        first_name: username.into(),
        last_name: "Tester".into(),
        created_at: Utc::now(),
    }
}

pub fn line(ingredient_id: i32, amount: i32) -> IngredientLine {
    IngredientLine {
        ingredient_id: IngredientId(ingredient_id),
        amount,
    }
}

pub fn recipe_input(name: &str, lines: Vec<IngredientLine>, tags: Vec<i32>) -> RecipeInput {
    RecipeInput {
        name: name.into(),
        text: format!("How to make {name}."),
        image: None,
        cooking_time: 30,
        tag_ids: tags.into_iter().map(TagId).collect(),
        ingredients: lines,
    }
}

// ── MemoryStore ──────────────────────────────────────────────────────────────

struct StoredRecipe {
    id: RecipeId,
    author_id: UserId,
    name: String,
    image: Option<String>,
    text: String,
    cooking_time: i32,
    created_at: DateTime<Utc>,
    tag_ids: Vec<TagId>,
    lines: Vec<IngredientLine>,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    tags: Vec<Tag>,
    ingredients: Vec<Ingredient>,
    recipes: Vec<StoredRecipe>,
    next_recipe_id: i32,
    favorites: Vec<(UserId, RecipeId)>,
    carts: Vec<(UserId, RecipeId)>,
    follows: Vec<(UserId, UserId)>,
}

impl Tables {
    fn list(&self, list: RecipeList) -> &Vec<(UserId, RecipeId)> {
        match list {
            RecipeList::Favorites => &self.favorites,
            RecipeList::ShoppingCart => &self.carts,
        }
    }

    fn list_mut(&mut self, list: RecipeList) -> &mut Vec<(UserId, RecipeId)> {
        match list {
            RecipeList::Favorites => &mut self.favorites,
            RecipeList::ShoppingCart => &mut self.carts,
        }
    }

    fn assemble(&self, stored: &StoredRecipe) -> Recipe {
        Recipe {
            id: stored.id,
            author_id: stored.author_id,
            name: stored.name.clone(),
            image: stored.image.clone(),
            text: stored.text.clone(),
            cooking_time: stored.cooking_time,
            created_at: stored.created_at,
            // Storage returns tags ordered by id.
            tags: self
                .tags
                .iter()
                .filter(|t| stored.tag_ids.contains(&t.id))
                .cloned()
                .collect(),
            ingredients: stored
                .lines
                .iter()
                .filter_map(|l| {
                    self.ingredients
                        .iter()
                        .find(|i| i.id == l.ingredient_id)
                        .map(|i| RecipeIngredient {
                            ingredient: i.clone(),
                            amount: l.amount,
                        })
                })
                .collect(),
        }
    }

    fn newest_first(&self) -> Vec<&StoredRecipe> {
        let mut rows: Vec<&StoredRecipe> = self.recipes.iter().collect();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        rows
    }
}

/// Shared in-memory tables implementing every repository trait.
///
/// Primary keys and uniqueness are enforced at write time, and writes yield
/// to the scheduler between their pre-check and the insert so concurrent
/// callers interleave the way they would against a real database.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, user: &User) -> Self {
        self.tables.lock().unwrap().users.push(user.clone());
        self
    }

    pub fn with_tag(self, id: i32, slug: &str) -> Self {
        self.tables.lock().unwrap().tags.push(Tag {
            id: TagId(id),
            name: slug.to_uppercase(),
            color: format!("#0000{:02X}", id),
            slug: slug.into(),
        });
        self.tables.lock().unwrap().tags.sort_by_key(|t| t.id);
        self
    }

    pub fn with_ingredient(self, id: i32, name: &str, unit: &str) -> Self {
        self.tables.lock().unwrap().ingredients.push(Ingredient {
            id: IngredientId(id),
            name: name.into(),
            measurement_unit: unit.into(),
        });
        self
    }

    pub fn recipe_count(&self) -> usize {
        self.tables.lock().unwrap().recipes.len()
    }

    pub fn list_len(&self, list: RecipeList) -> usize {
        self.tables.lock().unwrap().list(list).len()
    }

    pub fn follow_count(&self) -> usize {
        self.tables.lock().unwrap().follows.len()
    }

    pub fn viewer(&self) -> RecipeViewer<MemoryStore, MemoryStore, MemoryStore> {
        RecipeViewer {
            lists: self.clone(),
            follows: self.clone(),
            users: self.clone(),
        }
    }
}

impl CatalogRepository for MemoryStore {
    async fn list_tags(&self) -> Result<Vec<Tag>, RecipesServiceError> {
        Ok(self.tables.lock().unwrap().tags.clone())
    }

    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>, RecipesServiceError> {
        let t = self.tables.lock().unwrap();
        Ok(t.tags.iter().find(|tag| tag.id == id).cloned())
    }

    async fn find_tags(&self, ids: &[TagId]) -> Result<Vec<Tag>, RecipesServiceError> {
        let t = self.tables.lock().unwrap();
        Ok(t.tags.iter().filter(|tag| ids.contains(&tag.id)).cloned().collect())
    }

    async fn list_ingredients(
        &self,
        name_prefix: Option<&str>,
    ) -> Result<Vec<Ingredient>, RecipesServiceError> {
        let t = self.tables.lock().unwrap();
        let prefix = name_prefix.map(str::to_lowercase);
        let mut found: Vec<Ingredient> = t
            .ingredients
            .iter()
            .filter(|i| match &prefix {
                Some(p) => i.name.to_lowercase().starts_with(p.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn find_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, RecipesServiceError> {
        let t = self.tables.lock().unwrap();
        Ok(t.ingredients.iter().find(|i| i.id == id).cloned())
    }

    async fn find_ingredients(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<Ingredient>, RecipesServiceError> {
        let t = self.tables.lock().unwrap();
        Ok(t.ingredients
            .iter()
            .filter(|i| ids.contains(&i.id))
            .cloned()
            .collect())
    }

    async fn import_ingredients(
        &self,
        records: &[NewIngredient],
    ) -> Result<ImportOutcome, RecipesServiceError> {
        let mut t = self.tables.lock().unwrap();
        if !t.ingredients.is_empty() {
            return Ok(ImportOutcome::Skipped);
        }
        for (n, record) in records.iter().enumerate() {
            t.ingredients.push(Ingredient {
                id: IngredientId(n as i32 + 1),
                name: record.name.clone(),
                measurement_unit: record.measurement_unit.clone(),
            });
        }
        Ok(ImportOutcome::Imported(records.len() as u64))
    }

    async fn import_tags(&self, records: &[NewTag]) -> Result<ImportOutcome, RecipesServiceError> {
        let mut t = self.tables.lock().unwrap();
        if !t.tags.is_empty() {
            return Ok(ImportOutcome::Skipped);
        }
        for (n, record) in records.iter().enumerate() {
            t.tags.push(Tag {
                id: TagId(n as i32 + 1),
                name: record.name.clone(),
                color: record.color.clone(),
                slug: record.slug.clone(),
            });
        }
        Ok(ImportOutcome::Imported(records.len() as u64))
    }
}

impl RecipeRepository for MemoryStore {
    async fn find(&self, id: RecipeId) -> Result<Option<Recipe>, RecipesServiceError> {
        let t = self.tables.lock().unwrap();
        Ok(t.recipes.iter().find(|r| r.id == id).map(|r| t.assemble(r)))
    }

    async fn find_summary(
        &self,
        id: RecipeId,
    ) -> Result<Option<RecipeSummary>, RecipesServiceError> {
        let t = self.tables.lock().unwrap();
        Ok(t.recipes
            .iter()
            .find(|r| r.id == id)
            .map(|r| t.assemble(r).summary()))
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Page<Recipe>, RecipesServiceError> {
        let t = self.tables.lock().unwrap();
        let matching: Vec<&StoredRecipe> = t
            .newest_first()
            .into_iter()
            .filter(|r| filter.author.is_none_or(|a| r.author_id == a))
            .filter(|r| {
                filter.tags.is_empty()
                    || t.tags.iter().any(|tag| {
                        r.tag_ids.contains(&tag.id) && filter.tags.contains(&tag.slug)
                    })
            })
            .filter(|r| {
                filter
                    .favorited_by
                    .is_none_or(|u| t.favorites.contains(&(u, r.id)))
            })
            .filter(|r| filter.in_cart_of.is_none_or(|u| t.carts.contains(&(u, r.id))))
            .collect();
        Ok(Page {
            count: matching.len() as u64,
            results: matching
                .into_iter()
                .skip(page.offset() as usize)
                .take(page.limit() as usize)
                .map(|r| t.assemble(r))
                .collect(),
        })
    }

    async fn create(
        &self,
        author_id: UserId,
        draft: &RecipeDraft,
        created_at: DateTime<Utc>,
    ) -> Result<RecipeId, RecipesServiceError> {
        let mut t = self.tables.lock().unwrap();
        if !t.users.iter().any(|u| u.id == author_id) {
            return Err(RecipesServiceError::UserNotFound);
        }
        // UNIQUE(recipe_id, ingredient_id)
        let mut seen = HashSet::new();
        if !draft.lines().iter().all(|l| seen.insert(l.ingredient_id)) {
            return Err(RecipesServiceError::DuplicateIngredient);
        }
        t.next_recipe_id += 1;
        let id = RecipeId(t.next_recipe_id);
        t.recipes.push(StoredRecipe {
            id,
            author_id,
            name: draft.name().to_owned(),
            image: draft.image().map(str::to_owned),
            text: draft.text().to_owned(),
            cooking_time: draft.cooking_time(),
            created_at,
            tag_ids: draft.tag_ids().to_vec(),
            lines: draft.lines().to_vec(),
        });
        Ok(id)
    }

    async fn update(&self, id: RecipeId, draft: &RecipeDraft) -> Result<(), RecipesServiceError> {
        let mut t = self.tables.lock().unwrap();
        let stored = t
            .recipes
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(RecipesServiceError::RecipeNotFound)?;
        stored.name = draft.name().to_owned();
        stored.image = draft.image().map(str::to_owned);
        stored.text = draft.text().to_owned();
        stored.cooking_time = draft.cooking_time();
        stored.tag_ids = draft.tag_ids().to_vec();
        stored.lines = draft.lines().to_vec();
        Ok(())
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, RecipesServiceError> {
        let mut t = self.tables.lock().unwrap();
        let before = t.recipes.len();
        t.recipes.retain(|r| r.id != id);
        if t.recipes.len() == before {
            return Ok(false);
        }
        // ON DELETE CASCADE
        t.favorites.retain(|(_, r)| *r != id);
        t.carts.retain(|(_, r)| *r != id);
        Ok(true)
    }

    async fn list_by_author(
        &self,
        author_id: UserId,
        limit: Option<u64>,
    ) -> Result<Vec<RecipeSummary>, RecipesServiceError> {
        let t = self.tables.lock().unwrap();
        Ok(t.newest_first()
            .into_iter()
            .filter(|r| r.author_id == author_id)
            .take(limit.map_or(usize::MAX, |l| l as usize))
            .map(|r| t.assemble(r).summary())
            .collect())
    }

    async fn count_by_author(&self, author_id: UserId) -> Result<u64, RecipesServiceError> {
        let t = self.tables.lock().unwrap();
        Ok(t.recipes.iter().filter(|r| r.author_id == author_id).count() as u64)
    }
}

impl RecipeListRepository for MemoryStore {
    async fn add(
        &self,
        list: RecipeList,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<bool, RecipesServiceError> {
        {
            let t = self.tables.lock().unwrap();
            if !t.recipes.iter().any(|r| r.id == recipe_id) {
                return Err(RecipesServiceError::RecipeNotFound);
            }
            if t.list(list).contains(&(user_id, recipe_id)) {
                return Ok(false);
            }
        }
        tokio::task::yield_now().await;
        let mut t = self.tables.lock().unwrap();
        let rows = t.list_mut(list);
        // primary key (user_id, recipe_id)
        if rows.contains(&(user_id, recipe_id)) {
            return Ok(false);
        }
        rows.push((user_id, recipe_id));
        Ok(true)
    }

    async fn remove(
        &self,
        list: RecipeList,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<bool, RecipesServiceError> {
        tokio::task::yield_now().await;
        let mut t = self.tables.lock().unwrap();
        let rows = t.list_mut(list);
        let before = rows.len();
        rows.retain(|pair| *pair != (user_id, recipe_id));
        Ok(rows.len() < before)
    }

    async fn contains(
        &self,
        list: RecipeList,
        user_id: UserId,
        recipe_ids: &[RecipeId],
    ) -> Result<HashSet<RecipeId>, RecipesServiceError> {
        let t = self.tables.lock().unwrap();
        Ok(t.list(list)
            .iter()
            .filter(|(u, r)| *u == user_id && recipe_ids.contains(r))
            .map(|(_, r)| *r)
            .collect())
    }

    async fn cart_lines(&self, user_id: UserId) -> Result<Vec<CartLine>, RecipesServiceError> {
        let t = self.tables.lock().unwrap();
        let mut lines = Vec::new();
        for (_, recipe_id) in t.carts.iter().filter(|(u, _)| *u == user_id) {
            let Some(stored) = t.recipes.iter().find(|r| r.id == *recipe_id) else {
                continue;
            };
            for l in &stored.lines {
                if let Some(i) = t.ingredients.iter().find(|i| i.id == l.ingredient_id) {
                    lines.push(CartLine {
                        name: i.name.clone(),
                        measurement_unit: i.measurement_unit.clone(),
                        amount: l.amount,
                    });
                }
            }
        }
        Ok(lines)
    }
}

impl FollowRepository for MemoryStore {
    async fn add(&self, user_id: UserId, author_id: UserId) -> Result<bool, RecipesServiceError> {
        {
            let t = self.tables.lock().unwrap();
            if !t.users.iter().any(|u| u.id == author_id) {
                return Err(RecipesServiceError::UserNotFound);
            }
            if t.follows.contains(&(user_id, author_id)) {
                return Ok(false);
            }
        }
        tokio::task::yield_now().await;
        let mut t = self.tables.lock().unwrap();
        if t.follows.contains(&(user_id, author_id)) {
            return Ok(false);
        }
        t.follows.push((user_id, author_id));
        Ok(true)
    }

    async fn remove(
        &self,
        user_id: UserId,
        author_id: UserId,
    ) -> Result<bool, RecipesServiceError> {
        tokio::task::yield_now().await;
        let mut t = self.tables.lock().unwrap();
        let before = t.follows.len();
        t.follows.retain(|pair| *pair != (user_id, author_id));
        Ok(t.follows.len() < before)
    }

    async fn following(
        &self,
        user_id: UserId,
        author_ids: &[UserId],
    ) -> Result<HashSet<UserId>, RecipesServiceError> {
        let t = self.tables.lock().unwrap();
        Ok(t.follows
            .iter()
            .filter(|(u, a)| *u == user_id && author_ids.contains(a))
            .map(|(_, a)| *a)
            .collect())
    }

    async fn list_authors(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Page<User>, RecipesServiceError> {
        let t = self.tables.lock().unwrap();
        let authors: Vec<User> = t
            .follows
            .iter()
            .rev()
            .filter(|(u, _)| *u == user_id)
            .filter_map(|(_, a)| t.users.iter().find(|u| u.id == *a).cloned())
            .collect();
        Ok(Page {
            count: authors.len() as u64,
            results: authors
                .into_iter()
                .skip(page.offset() as usize)
                .take(page.limit() as usize)
                .collect(),
        })
    }
}

impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RecipesServiceError> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, RecipesServiceError> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().filter(|u| ids.contains(&u.id)).cloned().collect())
    }

    async fn create(&self, user: &User) -> Result<(), RecipesServiceError> {
        let mut t = self.tables.lock().unwrap();
        if t.users.iter().any(|u| {
            u.id == user.id || u.username == user.username || u.email == user.email
        }) {
            return Err(RecipesServiceError::UserAlreadyExists);
        }
        t.users.push(user.clone());
        Ok(())
    }
}
