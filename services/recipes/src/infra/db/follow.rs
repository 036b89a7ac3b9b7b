use std::collections::HashSet;

use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, TransactionTrait,
};
use uuid::Uuid;

use foodgram_core::sea_ext::{TransactionErrorExt, is_foreign_key_violation, is_unique_violation};
use foodgram_domain::id::UserId;
use foodgram_domain::pagination::{Page, PageRequest};
use foodgram_recipes_schema::{follows, users};

use super::user_from_model;
use crate::domain::repository::FollowRepository;
use crate::domain::types::User;
use crate::error::RecipesServiceError;

#[derive(Clone)]
pub struct DbFollowRepository {
    pub db: DatabaseConnection,
}

impl FollowRepository for DbFollowRepository {
    async fn add(&self, user_id: UserId, author_id: UserId) -> Result<bool, RecipesServiceError> {
        let now = Utc::now();
        let result = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                Box::pin(async move {
                    if follows::Entity::find_by_id((user_id.0, author_id.0))
                        .one(txn)
                        .await?
                        .is_some()
                    {
                        return Ok(false);
                    }
                    follows::Entity::insert(follows::ActiveModel {
                        user_id: Set(user_id.0),
                        author_id: Set(author_id.0),
                        created_at: Set(now),
                    })
                    .exec_without_returning(txn)
                    .await?;
                    Ok(true)
                })
            })
            .await;
        match result.map_err(TransactionErrorExt::into_db_err) {
            Ok(added) => Ok(added),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) if is_foreign_key_violation(&e) => Err(RecipesServiceError::UserNotFound),
            Err(e) => Err(anyhow::Error::new(e).context("follow author").into()),
        }
    }

    async fn remove(
        &self,
        user_id: UserId,
        author_id: UserId,
    ) -> Result<bool, RecipesServiceError> {
        let result = follows::Entity::delete_many()
            .filter(follows::Column::UserId.eq(user_id.0))
            .filter(follows::Column::AuthorId.eq(author_id.0))
            .exec(&self.db)
            .await
            .context("unfollow author")?;
        Ok(result.rows_affected > 0)
    }

    async fn following(
        &self,
        user_id: UserId,
        author_ids: &[UserId],
    ) -> Result<HashSet<UserId>, RecipesServiceError> {
        if author_ids.is_empty() {
            return Ok(HashSet::new());
        }
        let found: Vec<Uuid> = follows::Entity::find()
            .select_only()
            .column(follows::Column::AuthorId)
            .filter(follows::Column::UserId.eq(user_id.0))
            .filter(follows::Column::AuthorId.is_in(author_ids.iter().map(|id| id.0)))
            .into_tuple()
            .all(&self.db)
            .await
            .context("check follows")?;
        Ok(found.into_iter().map(UserId).collect())
    }

    async fn list_authors(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Page<User>, RecipesServiceError> {
        let count = follows::Entity::find()
            .filter(follows::Column::UserId.eq(user_id.0))
            .count(&self.db)
            .await
            .context("count follows")?;
        let models = users::Entity::find()
            .join_rev(JoinType::InnerJoin, follows::Relation::Author.def())
            .filter(follows::Column::UserId.eq(user_id.0))
            .order_by_desc(follows::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list followed authors")?;
        Ok(Page {
            count,
            results: models.into_iter().map(user_from_model).collect(),
        })
    }
}
