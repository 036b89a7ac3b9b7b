use chrono::NaiveDate;

use foodgram_domain::id::UserId;

use crate::domain::repository::{RecipeListRepository, UserRepository};
use crate::domain::shopping_list::{ShoppingListItem, aggregate, export_filename, render_export};
use crate::error::RecipesServiceError;

// ── BuildShoppingList ────────────────────────────────────────────────────────

pub struct BuildShoppingListUseCase<L: RecipeListRepository> {
    pub lists: L,
}

impl<L: RecipeListRepository> BuildShoppingListUseCase<L> {
    pub async fn execute(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ShoppingListItem>, RecipesServiceError> {
        let lines = self.lists.cart_lines(user_id).await?;
        Ok(aggregate(lines))
    }
}

// ── ExportShoppingList ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListExport {
    pub filename: String,
    pub body: String,
}

pub struct ExportShoppingListUseCase<L: RecipeListRepository, U: UserRepository> {
    pub build: BuildShoppingListUseCase<L>,
    pub users: U,
}

impl<L: RecipeListRepository, U: UserRepository> ExportShoppingListUseCase<L, U> {
    pub async fn execute(
        &self,
        user_id: UserId,
        today: NaiveDate,
    ) -> Result<ShoppingListExport, RecipesServiceError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(RecipesServiceError::UserNotFound)?;
        let items = self.build.execute(user_id).await?;
        tracing::info!(user_id = %user_id, items = items.len(), "shopping list exported");
        Ok(ShoppingListExport {
            filename: export_filename(&user.username),
            body: render_export(&user.username, today, &items),
        })
    }
}
