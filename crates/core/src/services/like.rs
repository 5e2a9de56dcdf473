//! Like service.

use crate::services::notification::NotificationService;
use crate::services::recover_conflict;
use sea_orm::Set;
use socialhub_common::{AppResult, IdGenerator};
use socialhub_db::entities::{like, user};
use socialhub_db::repositories::{LikeRepository, PostRepository};

/// Result of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeToggle {
    /// Whether the user likes the post after the toggle.
    pub liked: bool,
    /// Total likes on the post after the toggle.
    pub like_count: u64,
}

/// Like service for business logic.
#[derive(Clone)]
pub struct LikeService {
    like_repo: LikeRepository,
    post_repo: PostRepository,
    notifications: NotificationService,
    id_gen: IdGenerator,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub fn new(
        like_repo: LikeRepository,
        post_repo: PostRepository,
        notifications: NotificationService,
    ) -> Self {
        Self {
            like_repo,
            post_repo,
            notifications,
            id_gen: IdGenerator::new(),
        }
    }

    /// Toggle a like on a post.
    ///
    /// Removes the like when present, creates it otherwise. A unique-key
    /// Conflict on the create branch means a concurrent request already
    /// liked; that is reported as success, not an error.
    pub async fn toggle(&self, user: &user::Model, post_id: &str) -> AppResult<LikeToggle> {
        let post = self.post_repo.get_by_id(post_id).await?;

        let liked = if let Some(existing) = self.like_repo.find_by_pair(post_id, &user.id).await? {
            self.like_repo.delete(existing).await?;
            false
        } else {
            let model = like::ActiveModel {
                id: Set(self.id_gen.generate()),
                post_id: Set(post_id.to_string()),
                user_id: Set(user.id.clone()),
                created_at: Set(chrono::Utc::now().into()),
            };

            // A recovered Conflict means an identical concurrent request
            // already liked; only a fresh insert notifies.
            if recover_conflict(self.like_repo.create(model).await)?.is_some() {
                self.notifications.notify_like(user, &post).await;
            }
            true
        };

        let like_count = self.like_repo.count_by_post(post_id).await?;

        Ok(LikeToggle { liked, like_count })
    }
}
