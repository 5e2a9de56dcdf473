//! Email notification sink for social events.

use crate::services::mailer::Mailer;
use crate::services::visibility::EffectiveSettings;
use socialhub_common::AppResult;
use socialhub_db::entities::{post, user};
use socialhub_db::repositories::{SettingsRepository, UserRepository};

/// Maximum number of post characters quoted in a notification body.
const QUOTE_LIMIT: usize = 50;

/// Notification service.
///
/// Sends fixed-template emails for likes, comments and follows. Delivery is
/// best-effort: failures are logged at warn level and never propagate to the
/// mutation that triggered the notification.
#[derive(Clone)]
pub struct NotificationService {
    settings_repo: SettingsRepository,
    user_repo: UserRepository,
    mailer: Mailer,
    site_name: String,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub fn new(
        settings_repo: SettingsRepository,
        user_repo: UserRepository,
        mailer: Mailer,
        site_name: String,
    ) -> Self {
        Self {
            settings_repo,
            user_repo,
            mailer,
            site_name,
        }
    }

    /// Notify a post author that someone liked their post.
    pub async fn notify_like(&self, actor: &user::Model, post: &post::Model) {
        let subject = format!("{} liked your post on {}", actor.username, self.site_name);
        let body = format!(
            "{} liked your post:\n\n\"{}\"",
            actor.username,
            quote(&post.text)
        );

        self.deliver(&actor.id, &post.user_id, &subject, &body).await;
    }

    /// Notify a post author that someone commented on their post.
    pub async fn notify_comment(
        &self,
        actor: &user::Model,
        post: &post::Model,
        comment_text: &str,
    ) {
        let subject = format!(
            "{} commented on your post on {}",
            actor.username, self.site_name
        );
        let body = format!(
            "{} commented on your post \"{}\":\n\n{}",
            actor.username,
            quote(&post.text),
            comment_text
        );

        self.deliver(&actor.id, &post.user_id, &subject, &body).await;
    }

    /// Notify a user that someone started following them.
    pub async fn notify_follow(&self, actor: &user::Model, followee_id: &str) {
        let subject = format!(
            "{} started following you on {}",
            actor.username, self.site_name
        );
        let body = format!("{} is now following you.", actor.username);

        self.deliver(&actor.id, followee_id, &subject, &body).await;
    }

    /// Send a welcome email to a new user. Best-effort, like the rest.
    pub async fn notify_welcome(&self, user: &user::Model) {
        let Some(email) = user.email.as_deref() else {
            return;
        };

        let subject = format!("Welcome to {}!", self.site_name);
        let body = format!(
            "Hi {},\n\nWelcome to {}! Your account is ready.",
            user.username, self.site_name
        );

        if let Err(e) = self.mailer.send(email, &subject, &body).await {
            tracing::warn!(error = %e, user_id = %user.id, "Failed to send welcome email");
        }
    }

    async fn deliver(&self, actor_id: &str, recipient_id: &str, subject: &str, body: &str) {
        if actor_id == recipient_id {
            return;
        }

        if let Err(e) = self.try_deliver(recipient_id, subject, body).await {
            tracing::warn!(
                error = %e,
                recipient_id,
                "Failed to send notification email"
            );
        }
    }

    async fn try_deliver(&self, recipient_id: &str, subject: &str, body: &str) -> AppResult<()> {
        let settings = self
            .settings_repo
            .find_by_user(recipient_id)
            .await?
            .map_or_else(EffectiveSettings::default, EffectiveSettings::from);

        if !settings.email_notifications {
            return Ok(());
        }

        let recipient = self.user_repo.get_by_id(recipient_id).await?;

        let Some(email) = recipient.email.as_deref() else {
            return Ok(());
        };

        self.mailer.send(email, subject, body).await
    }
}

/// Quote post text in a notification, truncated with an ellipsis.
fn quote(text: &str) -> String {
    if text.chars().count() <= QUOTE_LIMIT {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(QUOTE_LIMIT).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use socialhub_db::entities::settings;
    use std::sync::Arc;

    fn service_with(db: sea_orm::DatabaseConnection) -> NotificationService {
        let db = Arc::new(db);
        NotificationService::new(
            SettingsRepository::new(db.clone()),
            UserRepository::new(db),
            Mailer::disabled(),
            "SocialHub".to_string(),
        )
    }

    fn test_user(id: &str, username: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: username.to_string(),
            username_lower: username.to_lowercase(),
            email: Some(format!("{username}@example.com")),
            token: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_post(id: &str, user_id: &str, text: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            text: text.to_string(),
            image_url: None,
            category_id: None,
            shared_from_id: None,
            is_shared: false,
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_quote_short_text_unchanged() {
        assert_eq!(quote("hello"), "hello");
    }

    #[test]
    fn test_quote_long_text_truncated() {
        let long = "a".repeat(80);
        let quoted = quote(&long);

        assert_eq!(quoted.chars().count(), 53);
        assert!(quoted.ends_with("..."));
    }

    #[test]
    fn test_quote_exact_limit_unchanged() {
        let text = "b".repeat(50);
        assert_eq!(quote(&text), text);
    }

    #[tokio::test]
    async fn test_self_like_is_suppressed() {
        // Actor == recipient: returns before any query.
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let actor = test_user("u1", "alice");
        let post = test_post("p1", "u1", "my own post");

        service.notify_like(&actor, &post).await;
    }

    #[tokio::test]
    async fn test_notifications_off_is_suppressed() {
        let settings = settings::Model {
            user_id: "u2".to_string(),
            privacy: settings::PrivacyLevel::Public,
            email_notifications: false,
            profile_visible: true,
            created_at: Utc::now().into(),
            updated_at: None,
        };

        // Only the settings lookup runs; the user lookup would fail if reached.
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[settings]])
                .into_connection(),
        );

        let actor = test_user("u1", "alice");
        let post = test_post("p1", "u2", "another post");

        service.notify_like(&actor, &post).await;
    }

    #[tokio::test]
    async fn test_delivery_failure_is_swallowed() {
        // No query results queued: the settings lookup errors, and the
        // notification must still complete.
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let actor = test_user("u1", "alice");
        service.notify_follow(&actor, "u2").await;
    }
}
