//! Report repository.

use std::sync::Arc;

use crate::entities::{report, Report};
use crate::map_db_err;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use socialhub_common::{AppError, AppResult};

/// Report repository for database operations.
#[derive(Clone)]
pub struct ReportRepository {
    db: Arc<DatabaseConnection>,
}

impl ReportRepository {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record a report.
    pub async fn create(&self, model: report::ActiveModel) -> AppResult<report::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Reports filed by a user, newest first.
    pub async fn find_by_reporter(&self, reporter_id: &str) -> AppResult<Vec<report::Model>> {
        Report::find()
            .filter(report::Column::ReporterId.eq(reporter_id))
            .order_by_desc(report::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
