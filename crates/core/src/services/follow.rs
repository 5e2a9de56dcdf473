//! Follow service.

use crate::services::notification::NotificationService;
use crate::services::recover_conflict;
use sea_orm::Set;
use socialhub_common::{AppResult, IdGenerator};
use socialhub_db::entities::{follow, user};
use socialhub_db::repositories::{FollowRepository, UserRepository};

/// Result of a follow toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowToggle {
    /// Whether the follower follows the target after the toggle.
    pub following: bool,
}

/// Follow service for business logic.
#[derive(Clone)]
pub struct FollowService {
    follow_repo: FollowRepository,
    user_repo: UserRepository,
    notifications: NotificationService,
    id_gen: IdGenerator,
}

impl FollowService {
    /// Create a new follow service.
    #[must_use]
    pub fn new(
        follow_repo: FollowRepository,
        user_repo: UserRepository,
        notifications: NotificationService,
    ) -> Self {
        Self {
            follow_repo,
            user_repo,
            notifications,
            id_gen: IdGenerator::new(),
        }
    }

    /// Toggle a follow edge from follower to target.
    ///
    /// Removes the edge when present, creates it otherwise; a unique-key
    /// Conflict on the create branch is recovered as already-following.
    /// Nothing stops a user from following themselves.
    pub async fn toggle(&self, follower: &user::Model, target_id: &str) -> AppResult<FollowToggle> {
        let target = self.user_repo.get_by_id(target_id).await?;

        let following = if let Some(existing) =
            self.follow_repo.find_by_pair(&follower.id, &target.id).await?
        {
            self.follow_repo.delete(existing).await?;
            false
        } else {
            let model = follow::ActiveModel {
                id: Set(self.id_gen.generate()),
                follower_id: Set(follower.id.clone()),
                followee_id: Set(target.id.clone()),
                created_at: Set(chrono::Utc::now().into()),
            };

            if recover_conflict(self.follow_repo.create(model).await)?.is_some() {
                self.notifications.notify_follow(follower, &target.id).await;
            }
            true
        };

        Ok(FollowToggle { following })
    }
}
