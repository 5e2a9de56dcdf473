//! Post and profile visibility rules.

use socialhub_db::entities::settings::{self, PrivacyLevel};
use socialhub_db::entities::post;
use socialhub_db::repositories::{FollowRepository, SettingsRepository};
use socialhub_common::AppResult;

/// Effective privacy settings for a user.
///
/// Users registered through the account service always have a settings row;
/// for anyone without one this falls back to the defaults (public profile,
/// notifications on) without writing anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveSettings {
    /// Post privacy level.
    pub privacy: PrivacyLevel,
    /// Whether email notifications are enabled.
    pub email_notifications: bool,
    /// Whether the profile is visible to other users.
    pub profile_visible: bool,
}

impl Default for EffectiveSettings {
    fn default() -> Self {
        Self {
            privacy: PrivacyLevel::Public,
            email_notifications: true,
            profile_visible: true,
        }
    }
}

impl From<settings::Model> for EffectiveSettings {
    fn from(model: settings::Model) -> Self {
        Self {
            privacy: model.privacy,
            email_notifications: model.email_notifications,
            profile_visible: model.profile_visible,
        }
    }
}

/// Visibility service: decides who sees which posts and profiles.
#[derive(Clone)]
pub struct VisibilityService {
    settings_repo: SettingsRepository,
    follow_repo: FollowRepository,
}

impl VisibilityService {
    /// Create a new visibility service.
    #[must_use]
    pub const fn new(settings_repo: SettingsRepository, follow_repo: FollowRepository) -> Self {
        Self {
            settings_repo,
            follow_repo,
        }
    }

    /// Effective settings for a user, defaulting when no row exists.
    pub async fn effective_settings(&self, user_id: &str) -> AppResult<EffectiveSettings> {
        Ok(self
            .settings_repo
            .find_by_user(user_id)
            .await?
            .map_or_else(EffectiveSettings::default, EffectiveSettings::from))
    }

    /// Whether a viewer may see a post.
    ///
    /// Owners always see their own posts. Otherwise the author's privacy
    /// level decides: public posts are visible to everyone including
    /// anonymous viewers, friends-only posts require a follow edge from the
    /// viewer to the author, private posts are visible to the owner alone.
    ///
    /// Blocks are intentionally not consulted; blocking only gates search
    /// discovery through `profile_visible`.
    pub async fn is_post_visible(
        &self,
        viewer_id: Option<&str>,
        post: &post::Model,
    ) -> AppResult<bool> {
        if viewer_id == Some(post.user_id.as_str()) {
            return Ok(true);
        }

        let author_settings = self.effective_settings(&post.user_id).await?;

        match author_settings.privacy {
            PrivacyLevel::Public => Ok(true),
            PrivacyLevel::Friends => match viewer_id {
                Some(viewer) => self.follow_repo.is_following(viewer, &post.user_id).await,
                None => Ok(false),
            },
            PrivacyLevel::Private => Ok(false),
        }
    }

    /// Whether a viewer may see a profile page.
    ///
    /// Owners always see their own profile; otherwise `profile_visible`
    /// decides, independent of the privacy level and the follow graph.
    pub async fn is_profile_visible(
        &self,
        viewer_id: Option<&str>,
        owner_id: &str,
    ) -> AppResult<bool> {
        if viewer_id == Some(owner_id) {
            return Ok(true);
        }

        Ok(self.effective_settings(owner_id).await?.profile_visible)
    }

    /// Retain the posts the viewer may see, newest first.
    pub async fn filter_posts(
        &self,
        viewer_id: Option<&str>,
        posts: Vec<post::Model>,
    ) -> AppResult<Vec<post::Model>> {
        let mut visible = Vec::with_capacity(posts.len());

        for post in posts {
            if self.is_post_visible(viewer_id, &post).await? {
                visible.push(post);
            }
        }

        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(visible)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use socialhub_db::entities::follow;
    use std::sync::Arc;

    fn service_with(db: sea_orm::DatabaseConnection) -> VisibilityService {
        let db = Arc::new(db);
        VisibilityService::new(
            SettingsRepository::new(db.clone()),
            FollowRepository::new(db),
        )
    }

    fn test_settings(user_id: &str, privacy: PrivacyLevel) -> settings::Model {
        settings::Model {
            user_id: user_id.to_string(),
            privacy,
            email_notifications: true,
            profile_visible: true,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_post(id: &str, user_id: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            text: "hello".to_string(),
            image_url: None,
            category_id: None,
            shared_from_id: None,
            is_shared: false,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_owner_sees_private_post() {
        // Owner short-circuit: no queries issued.
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let post = test_post("p1", "u1");
        let visible = service.is_post_visible(Some("u1"), &post).await.unwrap();

        assert!(visible);
    }

    #[tokio::test]
    async fn test_public_post_visible_to_anonymous() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_settings("u1", PrivacyLevel::Public)]])
                .into_connection(),
        );

        let post = test_post("p1", "u1");
        let visible = service.is_post_visible(None, &post).await.unwrap();

        assert!(visible);
    }

    #[tokio::test]
    async fn test_missing_settings_defaults_to_public() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<settings::Model>::new()])
                .into_connection(),
        );

        let post = test_post("p1", "u1");
        let visible = service.is_post_visible(Some("u2"), &post).await.unwrap();

        assert!(visible);
    }

    #[tokio::test]
    async fn test_friends_post_requires_follow_edge() {
        let edge = follow::Model {
            id: "f1".to_string(),
            follower_id: "u2".to_string(),
            followee_id: "u1".to_string(),
            created_at: Utc::now().into(),
        };

        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_settings("u1", PrivacyLevel::Friends)]])
                .append_query_results([[edge]])
                .into_connection(),
        );

        let post = test_post("p1", "u1");
        let visible = service.is_post_visible(Some("u2"), &post).await.unwrap();

        assert!(visible);
    }

    #[tokio::test]
    async fn test_friends_post_hidden_from_stranger() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_settings("u1", PrivacyLevel::Friends)]])
                .append_query_results([Vec::<follow::Model>::new()])
                .into_connection(),
        );

        let post = test_post("p1", "u1");
        let visible = service.is_post_visible(Some("u3"), &post).await.unwrap();

        assert!(!visible);
    }

    #[tokio::test]
    async fn test_friends_post_hidden_from_anonymous() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_settings("u1", PrivacyLevel::Friends)]])
                .into_connection(),
        );

        let post = test_post("p1", "u1");
        let visible = service.is_post_visible(None, &post).await.unwrap();

        assert!(!visible);
    }

    #[tokio::test]
    async fn test_private_post_hidden_from_follower() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_settings("u1", PrivacyLevel::Private)]])
                .into_connection(),
        );

        let post = test_post("p1", "u1");
        let visible = service.is_post_visible(Some("u2"), &post).await.unwrap();

        assert!(!visible);
    }

    #[tokio::test]
    async fn test_profile_visibility_independent_of_privacy() {
        let mut settings = test_settings("u1", PrivacyLevel::Private);
        settings.profile_visible = true;

        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[settings]])
                .into_connection(),
        );

        let visible = service.is_profile_visible(Some("u2"), "u1").await.unwrap();

        assert!(visible);
    }

    #[tokio::test]
    async fn test_hidden_profile_still_visible_to_owner() {
        // Owner short-circuit: no queries issued.
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let visible = service.is_profile_visible(Some("u1"), "u1").await.unwrap();

        assert!(visible);
    }

    #[tokio::test]
    async fn test_filter_posts_sorts_descending() {
        let now = Utc::now();
        let older = post::Model {
            created_at: (now - Duration::hours(1)).into(),
            ..test_post("p1", "u1")
        };
        let newer = post::Model {
            created_at: now.into(),
            ..test_post("p2", "u1")
        };

        // Viewer is the owner, so no settings queries are issued.
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let result = service
            .filter_posts(Some("u1"), vec![older, newer])
            .await
            .unwrap();

        assert_eq!(result[0].id, "p2");
        assert_eq!(result[1].id, "p1");
    }
}
