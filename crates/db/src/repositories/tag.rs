//! Tag repository.

use std::sync::Arc;

use crate::entities::{tag, Tag};
use crate::map_db_err;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use socialhub_common::{AppError, AppResult, IdGenerator};

/// Tag repository for database operations.
#[derive(Clone)]
pub struct TagRepository {
    db: Arc<DatabaseConnection>,
}

impl TagRepository {
    /// Create a new tag repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a tag by its (lowercase) name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<tag::Model>> {
        Tag::find()
            .filter(tag::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an existing tag by name or create it.
    ///
    /// A concurrent insert of the same name loses the unique-index race; the
    /// Conflict is recovered by re-reading the winner's row.
    pub async fn get_or_create(&self, name: &str) -> AppResult<tag::Model> {
        if let Some(existing) = self.find_by_name(name).await? {
            return Ok(existing);
        }

        let model = tag::ActiveModel {
            id: Set(IdGenerator::new().generate()),
            name: Set(name.to_string()),
        };

        match model.insert(self.db.as_ref()).await.map_err(map_db_err) {
            Ok(tag) => Ok(tag),
            Err(AppError::Conflict(_)) => self
                .find_by_name(name)
                .await?
                .ok_or_else(|| AppError::Internal(format!("tag vanished after conflict: {name}"))),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_find_by_name_found() {
        let tag = tag::Model {
            id: "t1".to_string(),
            name: "rust".to_string(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[tag]])
                .into_connection(),
        );

        let repo = TagRepository::new(db);
        let result = repo.find_by_name("rust").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().name, "rust");
    }

    #[tokio::test]
    async fn test_get_or_create_returns_existing() {
        let tag = tag::Model {
            id: "t1".to_string(),
            name: "rust".to_string(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[tag]])
                .into_connection(),
        );

        let repo = TagRepository::new(db);
        let result = repo.get_or_create("rust").await.unwrap();

        assert_eq!(result.id, "t1");
    }
}
