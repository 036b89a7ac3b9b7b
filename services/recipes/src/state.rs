use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbCatalogRepository, DbFollowRepository, DbRecipeListRepository, DbRecipeRepository,
    DbUserRepository,
};
use crate::usecase::recipe::RecipeViewer;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn catalog_repo(&self) -> DbCatalogRepository {
        DbCatalogRepository {
            db: self.db.clone(),
        }
    }

    pub fn recipe_repo(&self) -> DbRecipeRepository {
        DbRecipeRepository {
            db: self.db.clone(),
        }
    }

    pub fn recipe_list_repo(&self) -> DbRecipeListRepository {
        DbRecipeListRepository {
            db: self.db.clone(),
        }
    }

    pub fn follow_repo(&self) -> DbFollowRepository {
        DbFollowRepository {
            db: self.db.clone(),
        }
    }

    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn recipe_viewer(
        &self,
    ) -> RecipeViewer<DbRecipeListRepository, DbFollowRepository, DbUserRepository> {
        RecipeViewer {
            lists: self.recipe_list_repo(),
            follows: self.follow_repo(),
            users: self.user_repo(),
        }
    }
}
