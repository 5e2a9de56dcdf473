//! Block repository.

use std::sync::Arc;

use crate::entities::{block, Block};
use crate::map_db_err;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};
use socialhub_common::{AppError, AppResult};

/// Block repository for database operations.
#[derive(Clone)]
pub struct BlockRepository {
    db: Arc<DatabaseConnection>,
}

impl BlockRepository {
    /// Create a new block repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a block edge from blocker to blockee.
    pub async fn find_by_pair(
        &self,
        blocker_id: &str,
        blockee_id: &str,
    ) -> AppResult<Option<block::Model>> {
        Block::find()
            .filter(block::Column::BlockerId.eq(blocker_id))
            .filter(block::Column::BlockeeId.eq(blockee_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a block edge.
    ///
    /// A unique-constraint violation surfaces as [`AppError::Conflict`].
    pub async fn create(&self, model: block::ActiveModel) -> AppResult<block::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a block edge.
    pub async fn delete(&self, model: block::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// All edges created by a blocker, newest first.
    pub async fn find_by_blocker(&self, blocker_id: &str) -> AppResult<Vec<block::Model>> {
        Block::find()
            .filter(block::Column::BlockerId.eq(blocker_id))
            .order_by_desc(block::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_block(id: &str, blocker_id: &str, blockee_id: &str) -> block::Model {
        block::Model {
            id: id.to_string(),
            blocker_id: blocker_id.to_string(),
            blockee_id: blockee_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_pair_found() {
        let edge = create_test_block("b1", "u1", "u2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[edge]])
                .into_connection(),
        );

        let repo = BlockRepository::new(db);
        let result = repo.find_by_pair("u1", "u2").await.unwrap();

        assert!(result.is_some());
    }

    #[tokio::test]
    async fn test_find_by_blocker_empty() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<block::Model>::new()])
                .into_connection(),
        );

        let repo = BlockRepository::new(db);
        let result = repo.find_by_blocker("u1").await.unwrap();

        assert!(result.is_empty());
    }
}
