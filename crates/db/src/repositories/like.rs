//! Like repository.

use std::sync::Arc;

use crate::entities::{like, Like};
use crate::map_db_err;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter,
};
use socialhub_common::{AppError, AppResult};

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a like by post and user.
    pub async fn find_by_pair(
        &self,
        post_id: &str,
        user_id: &str,
    ) -> AppResult<Option<like::Model>> {
        Like::find()
            .filter(like::Column::PostId.eq(post_id))
            .filter(like::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a like.
    ///
    /// A unique-constraint violation surfaces as [`AppError::Conflict`] so the
    /// caller can treat a concurrent duplicate as already-liked.
    pub async fn create(&self, model: like::ActiveModel) -> AppResult<like::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a like.
    pub async fn delete(&self, model: like::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Number of likes on a post.
    pub async fn count_by_post(&self, post_id: &str) -> AppResult<u64> {
        Like::find()
            .filter(like::Column::PostId.eq(post_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
