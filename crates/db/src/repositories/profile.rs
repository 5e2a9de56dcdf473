//! Profile repository.

use std::sync::Arc;

use crate::entities::{profile, Profile};
use crate::map_db_err;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};
use socialhub_common::{AppError, AppResult};

/// Profile repository for database operations.
#[derive(Clone)]
pub struct ProfileRepository {
    db: Arc<DatabaseConnection>,
}

impl ProfileRepository {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a profile by user ID.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Option<profile::Model>> {
        Profile::find_by_id(user_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new profile.
    pub async fn create(&self, model: profile::ActiveModel) -> AppResult<profile::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a profile.
    pub async fn update(&self, model: profile::ActiveModel) -> AppResult<profile::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
