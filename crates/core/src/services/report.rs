//! Report service.

use sea_orm::Set;
use socialhub_common::{AppResult, IdGenerator};
use socialhub_db::entities::report::{self, ReportReason};
use socialhub_db::repositories::{ReportRepository, UserRepository};

/// Report service for business logic.
///
/// Reports are records only; no automated moderation follows from them.
#[derive(Clone)]
pub struct ReportService {
    report_repo: ReportRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl ReportService {
    /// Create a new report service.
    #[must_use]
    pub fn new(report_repo: ReportRepository, user_repo: UserRepository) -> Self {
        Self {
            report_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// File a report against a user, optionally tied to a post.
    pub async fn create(
        &self,
        reporter_id: &str,
        reported_user_id: &str,
        post_id: Option<&str>,
        reason: ReportReason,
        description: &str,
    ) -> AppResult<report::Model> {
        let reported = self.user_repo.get_by_id(reported_user_id).await?;

        let model = report::ActiveModel {
            id: Set(self.id_gen.generate()),
            reporter_id: Set(reporter_id.to_string()),
            reported_user_id: Set(reported.id),
            post_id: Set(post_id.map(ToString::to_string)),
            reason: Set(reason),
            description: Set(description.to_string()),
            is_resolved: Set(false),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.report_repo.create(model).await
    }
}
