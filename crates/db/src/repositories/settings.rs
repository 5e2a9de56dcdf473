//! Settings repository.

use std::sync::Arc;

use crate::entities::{settings, Settings};
use crate::map_db_err;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};
use socialhub_common::{AppError, AppResult};

/// Settings repository for database operations.
#[derive(Clone)]
pub struct SettingsRepository {
    db: Arc<DatabaseConnection>,
}

impl SettingsRepository {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find settings by user ID.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Option<settings::Model>> {
        Settings::find_by_id(user_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a settings row.
    pub async fn create(&self, model: settings::ActiveModel) -> AppResult<settings::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a settings row.
    pub async fn update(&self, model: settings::ActiveModel) -> AppResult<settings::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
