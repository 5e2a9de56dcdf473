//! Comment service.

use crate::services::notification::NotificationService;
use sea_orm::Set;
use socialhub_common::{AppError, AppResult, IdGenerator};
use socialhub_db::entities::{comment, user};
use socialhub_db::repositories::{CommentRepository, PostRepository};

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    post_repo: PostRepository,
    notifications: NotificationService,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub fn new(
        comment_repo: CommentRepository,
        post_repo: PostRepository,
        notifications: NotificationService,
    ) -> Self {
        Self {
            comment_repo,
            post_repo,
            notifications,
            id_gen: IdGenerator::new(),
        }
    }

    /// Add a comment to a post.
    pub async fn add(
        &self,
        user: &user::Model,
        post_id: &str,
        text: &str,
    ) -> AppResult<comment::Model> {
        let post = self.post_repo.get_by_id(post_id).await?;

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            post_id: Set(post_id.to_string()),
            user_id: Set(user.id.clone()),
            text: Set(text.to_string()),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.comment_repo.create(model).await?;

        self.notifications.notify_comment(user, &post, text).await;

        Ok(created)
    }

    /// Edit a comment. Owner-only; anyone else gets NotFound so the
    /// comment's existence does not leak.
    pub async fn edit(
        &self,
        user_id: &str,
        comment_id: &str,
        text: &str,
    ) -> AppResult<comment::Model> {
        let existing = self.get_owned(user_id, comment_id).await?;

        let mut model: comment::ActiveModel = existing.into();
        model.text = Set(text.to_string());
        model.updated_at = Set(Some(chrono::Utc::now().into()));

        self.comment_repo.update(model).await
    }

    /// Delete a comment. Owner-only, same NotFound policy as edit.
    pub async fn delete(&self, user_id: &str, comment_id: &str) -> AppResult<()> {
        let existing = self.get_owned(user_id, comment_id).await?;
        self.comment_repo.delete(existing).await
    }

    async fn get_owned(&self, user_id: &str, comment_id: &str) -> AppResult<comment::Model> {
        self.comment_repo
            .find_by_id(comment_id)
            .await?
            .filter(|c| c.user_id == user_id)
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::mailer::Mailer;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use socialhub_db::entities::post;
    use socialhub_db::repositories::{SettingsRepository, UserRepository};
    use std::sync::Arc;

    fn service_with(db: sea_orm::DatabaseConnection) -> CommentService {
        let db = Arc::new(db);
        CommentService::new(
            CommentRepository::new(db.clone()),
            PostRepository::new(db.clone()),
            NotificationService::new(
                SettingsRepository::new(db.clone()),
                UserRepository::new(db),
                Mailer::disabled(),
                "SocialHub".to_string(),
            ),
        )
    }

    fn test_user(id: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: format!("user-{id}"),
            username_lower: format!("user-{id}"),
            email: None,
            token: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_comment(id: &str, post_id: &str, user_id: &str) -> comment::Model {
        comment::Model {
            id: id.to_string(),
            post_id: post_id.to_string(),
            user_id: user_id.to_string(),
            text: "original".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_add_to_missing_post_is_not_found() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let result = service.add(&test_user("u1"), "missing", "hi").await;

        assert!(matches!(result, Err(AppError::PostNotFound(_))));
    }

    #[tokio::test]
    async fn test_edit_someone_elses_comment_is_not_found() {
        // The comment exists but belongs to u2.
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_comment("c1", "p1", "u2")]])
                .into_connection(),
        );

        let result = service.edit("u1", "c1", "edited").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_own_comment() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_comment("c1", "p1", "u1")]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let service = service_with(db);
        let result = service.delete("u1", "c1").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_comment_is_not_found() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<comment::Model>::new()])
                .into_connection(),
        );

        let result = service.delete("u1", "missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
