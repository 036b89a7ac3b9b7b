use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use foodgram_auth_types::identity::IdentityHeaders;
use foodgram_domain::id::UserId;
use foodgram_domain::pagination::{Page, PageRequest};

use super::parse_query;
use super::recipe::RecipeSummaryResponse;
use crate::domain::types::{Subscription, User, UserView};
use crate::error::RecipesServiceError;
use crate::state::AppState;
use crate::usecase::follow::{
    FollowAuthorUseCase, ListSubscriptionsUseCase, UnfollowAuthorUseCase,
};
use crate::usecase::user::{CreateUserInput, CreateUserUseCase, GetUserUseCase};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

impl UserResponse {
    fn new(user: User, is_subscribed: bool) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        }
    }
}

impl From<UserView> for UserResponse {
    fn from(view: UserView) -> Self {
        Self::new(view.user, view.is_subscribed)
    }
}

/// A followed author: profile fields plus a recipe preview.
#[derive(Serialize)]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub author: UserResponse,
    pub recipes: Vec<RecipeSummaryResponse>,
    pub recipes_count: u64,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(sub: Subscription) -> Self {
        Self {
            author: UserResponse::new(sub.author, true),
            recipes: sub
                .recipes
                .into_iter()
                .map(RecipeSummaryResponse::from)
                .collect(),
            recipes_count: sub.recipes_count,
        }
    }
}

// ── POST /users ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

pub async fn create_user(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), RecipesServiceError> {
    if !identity.role().is_admin() {
        return Err(RecipesServiceError::Forbidden);
    }
    let usecase = CreateUserUseCase {
        users: state.user_repo(),
    };
    let user = usecase
        .execute(CreateUserInput {
            id: body.id,
            username: body.username,
            email: body.email,
            first_name: body.first_name,
            last_name: body.last_name,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(UserResponse::new(user, false))))
}

// ── GET /users/@me ───────────────────────────────────────────────────────────

pub async fn get_me(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, RecipesServiceError> {
    let usecase = GetUserUseCase {
        users: state.user_repo(),
        follows: state.follow_repo(),
    };
    let view = usecase
        .execute(Some(identity.user_id), identity.user_id)
        .await?;
    Ok(Json(view.into()))
}

// ── GET /users/{id} ──────────────────────────────────────────────────────────

pub async fn get_user(
    identity: Option<IdentityHeaders>,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<UserResponse>, RecipesServiceError> {
    let usecase = GetUserUseCase {
        users: state.user_repo(),
        follows: state.follow_repo(),
    };
    let view = usecase.execute(identity.map(|i| i.user_id), id).await?;
    Ok(Json(view.into()))
}

// ── POST /users/{id}/subscribe ───────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct SubscriptionQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    pub recipes_limit: Option<u32>,
}

impl SubscriptionQuery {
    /// `recipes-limit=0` means no limit.
    fn preview_limit(&self) -> Option<u64> {
        self.recipes_limit.filter(|&n| n > 0).map(u64::from)
    }
}

pub async fn subscribe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(author_id): Path<UserId>,
    RawQuery(raw_query): RawQuery,
) -> Result<(StatusCode, Json<SubscriptionResponse>), RecipesServiceError> {
    let query: SubscriptionQuery = parse_query(raw_query)?;
    let usecase = FollowAuthorUseCase {
        follows: state.follow_repo(),
        users: state.user_repo(),
        recipes: state.recipe_repo(),
    };
    let sub = usecase
        .execute(identity.user_id, author_id, query.preview_limit())
        .await?;
    Ok((StatusCode::CREATED, Json(sub.into())))
}

// ── DELETE /users/{id}/subscribe ─────────────────────────────────────────────

pub async fn unsubscribe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(author_id): Path<UserId>,
) -> Result<StatusCode, RecipesServiceError> {
    let usecase = UnfollowAuthorUseCase {
        follows: state.follow_repo(),
    };
    usecase.execute(identity.user_id, author_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /users/@me/subscriptions ─────────────────────────────────────────────

pub async fn list_subscriptions(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Page<SubscriptionResponse>>, RecipesServiceError> {
    let query: SubscriptionQuery = parse_query(raw_query)?;
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    };
    let usecase = ListSubscriptionsUseCase {
        follows: state.follow_repo(),
        recipes: state.recipe_repo(),
    };
    let subs = usecase
        .execute(identity.user_id, page, query.preview_limit())
        .await?;
    Ok(Json(subs.map(SubscriptionResponse::from)))
}
