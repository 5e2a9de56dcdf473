//! Block service.

use crate::services::recover_conflict;
use sea_orm::Set;
use socialhub_common::{AppError, AppResult, IdGenerator};
use socialhub_db::entities::{block, user};
use socialhub_db::repositories::{BlockRepository, UserRepository};

/// Result of a block toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockToggle {
    /// Whether the blocker blocks the target after the toggle.
    pub blocked: bool,
}

/// Block service for business logic.
#[derive(Clone)]
pub struct BlockService {
    block_repo: BlockRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl BlockService {
    /// Create a new block service.
    #[must_use]
    pub fn new(block_repo: BlockRepository, user_repo: UserRepository) -> Self {
        Self {
            block_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Toggle a block edge from blocker to target.
    ///
    /// Blocking yourself is a silent no-op. A unique-key Conflict on the
    /// create branch is recovered as already-blocked.
    pub async fn toggle(&self, blocker_id: &str, target_id: &str) -> AppResult<BlockToggle> {
        if blocker_id == target_id {
            return Ok(BlockToggle { blocked: false });
        }

        let target = self.user_repo.get_by_id(target_id).await?;

        let blocked = if let Some(existing) =
            self.block_repo.find_by_pair(blocker_id, &target.id).await?
        {
            self.block_repo.delete(existing).await?;
            false
        } else {
            let model = block::ActiveModel {
                id: Set(self.id_gen.generate()),
                blocker_id: Set(blocker_id.to_string()),
                blockee_id: Set(target.id.clone()),
                created_at: Set(chrono::Utc::now().into()),
            };

            recover_conflict(self.block_repo.create(model).await)?;
            true
        };

        Ok(BlockToggle { blocked })
    }

    /// Remove a block edge explicitly.
    pub async fn unblock(&self, blocker_id: &str, target_id: &str) -> AppResult<()> {
        let edge = self
            .block_repo
            .find_by_pair(blocker_id, target_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Block not found".to_string()))?;

        self.block_repo.delete(edge).await
    }

    /// Users blocked by a blocker, newest block first.
    pub async fn list(&self, blocker_id: &str) -> AppResult<Vec<user::Model>> {
        let edges = self.block_repo.find_by_blocker(blocker_id).await?;

        let mut users = Vec::with_capacity(edges.len());
        for edge in edges {
            users.push(self.user_repo.get_by_id(&edge.blockee_id).await?);
        }

        Ok(users)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn service_with(db: sea_orm::DatabaseConnection) -> BlockService {
        let db = Arc::new(db);
        BlockService::new(BlockRepository::new(db.clone()), UserRepository::new(db))
    }

    fn test_user(id: &str, username: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: username.to_string(),
            username_lower: username.to_lowercase(),
            email: None,
            token: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_self_block_is_a_noop() {
        // No queries issued at all.
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let result = service.toggle("u1", "u1").await.unwrap();

        assert!(!result.blocked);
    }

    #[test]
    fn test_create_conflict_counts_as_blocked() {
        let lost: AppResult<block::Model> = Err(AppError::Conflict("duplicate key".to_string()));
        assert!(matches!(recover_conflict(lost), Ok(None)));
    }

    #[tokio::test]
    async fn test_toggle_removes_existing_edge() {
        let edge = block::Model {
            id: "b1".to_string(),
            blocker_id: "u1".to_string(),
            blockee_id: "u2".to_string(),
            created_at: Utc::now().into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_user("u2", "bob")]])
            .append_query_results([[edge]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let service = service_with(db);
        let result = service.toggle("u1", "u2").await.unwrap();

        assert!(!result.blocked);
    }

    #[tokio::test]
    async fn test_unblock_missing_edge_is_not_found() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<block::Model>::new()])
                .into_connection(),
        );

        let result = service.unblock("u1", "u2").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
