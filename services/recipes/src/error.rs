use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Broad failure class of a [`RecipesServiceError`]; decides the HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Conflict,
    Forbidden,
    Internal,
}

/// Recipes service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum RecipesServiceError {
    #[error("at least one ingredient required")]
    IngredientsRequired,
    #[error("duplicate ingredient")]
    DuplicateIngredient,
    #[error("amount must be ≥ 1")]
    InvalidAmount,
    #[error("cooking_time must be ≥ 1")]
    InvalidCookingTime,
    #[error("invalid username")]
    InvalidUsername,
    #[error("missing data")]
    MissingData,
    #[error("recipe not found")]
    RecipeNotFound,
    #[error("ingredient not found")]
    IngredientNotFound,
    #[error("tag not found")]
    TagNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("favorite does not exist")]
    FavoriteNotFound,
    #[error("shopping cart entry does not exist")]
    ShoppingCartEntryNotFound,
    #[error("follow does not exist")]
    FollowNotFound,
    #[error("favorite already exists")]
    FavoriteAlreadyExists,
    #[error("shopping cart entry already exists")]
    ShoppingCartEntryAlreadyExists,
    #[error("follow already exists")]
    FollowAlreadyExists,
    #[error("cannot follow yourself")]
    SelfFollow,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl RecipesServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::IngredientsRequired => "INGREDIENTS_REQUIRED",
            Self::DuplicateIngredient => "DUPLICATE_INGREDIENT",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::InvalidCookingTime => "INVALID_COOKING_TIME",
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::MissingData => "MISSING_DATA",
            Self::RecipeNotFound => "RECIPE_NOT_FOUND",
            Self::IngredientNotFound => "INGREDIENT_NOT_FOUND",
            Self::TagNotFound => "TAG_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::FavoriteNotFound => "FAVORITE_NOT_FOUND",
            Self::ShoppingCartEntryNotFound => "SHOPPING_CART_ENTRY_NOT_FOUND",
            Self::FollowNotFound => "FOLLOW_NOT_FOUND",
            Self::FavoriteAlreadyExists => "FAVORITE_ALREADY_EXISTS",
            Self::ShoppingCartEntryAlreadyExists => "SHOPPING_CART_ENTRY_ALREADY_EXISTS",
            Self::FollowAlreadyExists => "FOLLOW_ALREADY_EXISTS",
            Self::SelfFollow => "SELF_FOLLOW",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IngredientsRequired
            | Self::DuplicateIngredient
            | Self::InvalidAmount
            | Self::InvalidCookingTime
            | Self::InvalidUsername
            | Self::MissingData => ErrorCategory::Validation,
            Self::RecipeNotFound
            | Self::IngredientNotFound
            | Self::TagNotFound
            | Self::UserNotFound
            | Self::FavoriteNotFound
            | Self::ShoppingCartEntryNotFound
            | Self::FollowNotFound => ErrorCategory::NotFound,
            Self::FavoriteAlreadyExists
            | Self::ShoppingCartEntryAlreadyExists
            | Self::FollowAlreadyExists
            | Self::SelfFollow
            | Self::UserAlreadyExists => ErrorCategory::Conflict,
            Self::Forbidden => ErrorCategory::Forbidden,
            Self::Internal(_) => ErrorCategory::Internal,
        }
    }
}

impl IntoResponse for RecipesServiceError {
    fn into_response(self) -> Response {
        let status = match self.category() {
            ErrorCategory::Validation => StatusCode::BAD_REQUEST,
            ErrorCategory::NotFound => StatusCode::NOT_FOUND,
            ErrorCategory::Conflict => StatusCode::CONFLICT,
            ErrorCategory::Forbidden => StatusCode::FORBIDDEN,
            ErrorCategory::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
