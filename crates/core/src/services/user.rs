//! User account service: registration, authentication, profiles, settings
//! and discovery.

use crate::services::notification::NotificationService;
use crate::services::visibility::{EffectiveSettings, VisibilityService};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use sea_orm::Set;
use socialhub_common::{AppError, AppResult, IdGenerator};
use socialhub_db::entities::settings::PrivacyLevel;
use socialhub_db::entities::{post, profile, settings, user};
use socialhub_db::repositories::{
    BlockRepository, FollowRepository, PostRepository, ProfileRepository, SettingsRepository,
    UserRepository,
};

/// Everything the profile page shows.
#[derive(Debug, Clone)]
pub struct ProfilePage {
    /// The profile owner.
    pub user: user::Model,
    /// Whether the viewer may see the profile at all. When false the other
    /// fields are empty.
    pub visible: bool,
    /// Bio text.
    pub bio: String,
    /// Avatar URL.
    pub avatar_url: Option<String>,
    /// The owner's posts the viewer may see, newest first.
    pub posts: Vec<post::Model>,
    /// Number of listed posts; hidden posts are not counted.
    pub post_count: u64,
    /// How many users follow the owner.
    pub follower_count: u64,
    /// How many users the owner follows.
    pub following_count: u64,
    /// Users the owner has blocked. Present only when the viewer is the
    /// owner.
    pub blocked_users: Option<Vec<user::Model>>,
}

/// Settings fields that can be changed. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    /// New post privacy level.
    pub privacy: Option<PrivacyLevel>,
    /// New email-notification flag.
    pub email_notifications: Option<bool>,
    /// New profile-visibility flag.
    pub profile_visible: Option<bool>,
}

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    profile_repo: ProfileRepository,
    settings_repo: SettingsRepository,
    post_repo: PostRepository,
    follow_repo: FollowRepository,
    block_repo: BlockRepository,
    visibility: VisibilityService,
    notifications: NotificationService,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_repo: UserRepository,
        profile_repo: ProfileRepository,
        settings_repo: SettingsRepository,
        post_repo: PostRepository,
        follow_repo: FollowRepository,
        block_repo: BlockRepository,
        visibility: VisibilityService,
        notifications: NotificationService,
    ) -> Self {
        Self {
            user_repo,
            profile_repo,
            settings_repo,
            post_repo,
            follow_repo,
            block_repo,
            visibility,
            notifications,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new account.
    ///
    /// Creates the user together with its profile and settings rows, issues
    /// a bearer token, and sends a best-effort welcome email.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> AppResult<user::Model> {
        validate_username(username)?;
        validate_password(password)?;

        if self.user_repo.find_by_username(username).await?.is_some() {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }

        let user_id = self.id_gen.generate();
        let token = self.id_gen.generate_token();
        let now = chrono::Utc::now();

        let user_model = user::ActiveModel {
            id: Set(user_id.clone()),
            username: Set(username.to_string()),
            username_lower: Set(username.to_lowercase()),
            email: Set(Some(email.to_string())),
            token: Set(Some(token)),
            created_at: Set(now.into()),
            updated_at: Set(None),
        };

        let created = self.user_repo.create(user_model).await?;

        let password_hash = hash_password(password)?;

        self.profile_repo
            .create(profile::ActiveModel {
                user_id: Set(user_id.clone()),
                bio: Set(String::new()),
                avatar_url: Set(None),
                password: Set(Some(password_hash)),
                created_at: Set(now.into()),
                updated_at: Set(None),
            })
            .await?;

        self.settings_repo
            .create(settings::ActiveModel {
                user_id: Set(user_id),
                privacy: Set(PrivacyLevel::Public),
                email_notifications: Set(true),
                profile_visible: Set(true),
                created_at: Set(now.into()),
                updated_at: Set(None),
            })
            .await?;

        self.notifications.notify_welcome(&created).await;

        Ok(created)
    }

    /// Authenticate by username and password.
    ///
    /// Issues a token if the account has none yet. The same Unauthorized is
    /// returned for an unknown username and a wrong password.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let profile = self
            .profile_repo
            .find_by_user(&user.id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let hash = profile.password.as_deref().ok_or(AppError::Unauthorized)?;

        if !verify_password(password, hash) {
            return Err(AppError::Unauthorized);
        }

        if user.token.is_some() {
            return Ok(user);
        }

        let mut model: user::ActiveModel = user.into();
        model.token = Set(Some(self.id_gen.generate_token()));
        self.user_repo.update(model).await
    }

    /// Resolve a bearer token to its user. Used by the auth middleware.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Update bio and avatar. `None` leaves a field untouched.
    pub async fn update_profile(
        &self,
        user_id: &str,
        bio: Option<&str>,
        avatar_url: Option<&str>,
    ) -> AppResult<profile::Model> {
        let existing = self
            .profile_repo
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(user_id.to_string()))?;

        let mut model: profile::ActiveModel = existing.into();
        if let Some(bio) = bio {
            model.bio = Set(bio.to_string());
        }
        if let Some(avatar_url) = avatar_url {
            model.avatar_url = Set(Some(avatar_url.to_string()));
        }
        model.updated_at = Set(Some(chrono::Utc::now().into()));

        self.profile_repo.update(model).await
    }

    /// The user's effective settings (defaults when no row exists).
    pub async fn get_settings(&self, user_id: &str) -> AppResult<EffectiveSettings> {
        self.visibility.effective_settings(user_id).await
    }

    /// Apply a settings update, creating the row if a legacy account lacks
    /// one.
    pub async fn update_settings(
        &self,
        user_id: &str,
        update: SettingsUpdate,
    ) -> AppResult<settings::Model> {
        let now = chrono::Utc::now();

        match self.settings_repo.find_by_user(user_id).await? {
            Some(existing) => {
                let mut model: settings::ActiveModel = existing.into();
                if let Some(privacy) = update.privacy {
                    model.privacy = Set(privacy);
                }
                if let Some(flag) = update.email_notifications {
                    model.email_notifications = Set(flag);
                }
                if let Some(flag) = update.profile_visible {
                    model.profile_visible = Set(flag);
                }
                model.updated_at = Set(Some(now.into()));

                self.settings_repo.update(model).await
            }
            None => {
                let defaults = EffectiveSettings::default();

                self.settings_repo
                    .create(settings::ActiveModel {
                        user_id: Set(user_id.to_string()),
                        privacy: Set(update.privacy.unwrap_or(defaults.privacy)),
                        email_notifications: Set(update
                            .email_notifications
                            .unwrap_or(defaults.email_notifications)),
                        profile_visible: Set(update
                            .profile_visible
                            .unwrap_or(defaults.profile_visible)),
                        created_at: Set(now.into()),
                        updated_at: Set(None),
                    })
                    .await
            }
        }
    }

    /// Search users by username substring.
    ///
    /// Excludes the requester and anyone whose profile is hidden. Blocks are
    /// not consulted. Empty queries return nothing.
    pub async fn search(&self, query: &str, requester_id: &str) -> AppResult<Vec<user::Model>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let candidates = self
            .user_repo
            .search_by_username(query.trim(), requester_id)
            .await?;

        let mut visible = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if self
                .visibility
                .effective_settings(&candidate.id)
                .await?
                .profile_visible
            {
                visible.push(candidate);
            }
        }

        Ok(visible)
    }

    /// Assemble a profile page for a viewer.
    pub async fn profile_page(
        &self,
        viewer_id: Option<&str>,
        username: &str,
    ) -> AppResult<ProfilePage> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::UserNotFound(username.to_string()))?;

        if !self
            .visibility
            .is_profile_visible(viewer_id, &user.id)
            .await?
        {
            return Ok(ProfilePage {
                user,
                visible: false,
                bio: String::new(),
                avatar_url: None,
                posts: Vec::new(),
                post_count: 0,
                follower_count: 0,
                following_count: 0,
                blocked_users: None,
            });
        }

        let profile = self.profile_repo.find_by_user(&user.id).await?;
        let all_posts = self.post_repo.find_by_user(&user.id).await?;
        let posts = self.visibility.filter_posts(viewer_id, all_posts).await?;
        let post_count = posts.len() as u64;
        let follower_count = self.follow_repo.count_followers(&user.id).await?;
        let following_count = self.follow_repo.count_following(&user.id).await?;

        let blocked_users = if viewer_id == Some(user.id.as_str()) {
            let edges = self.block_repo.find_by_blocker(&user.id).await?;
            let mut blocked = Vec::with_capacity(edges.len());
            for edge in edges {
                blocked.push(self.user_repo.get_by_id(&edge.blockee_id).await?);
            }
            Some(blocked)
        } else {
            None
        };

        Ok(ProfilePage {
            visible: true,
            bio: profile.as_ref().map(|p| p.bio.clone()).unwrap_or_default(),
            avatar_url: profile.and_then(|p| p.avatar_url),
            posts,
            post_count,
            follower_count,
            following_count,
            blocked_users,
            user,
        })
    }
}

fn validate_username(username: &str) -> AppResult<()> {
    if username.len() < 3 || username.len() > 30 {
        return Err(AppError::Validation(
            "Username must be 3-30 characters".to_string(),
        ));
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(AppError::Validation(
            "Username may only contain letters, digits and underscores".to_string(),
        ));
    }

    Ok(())
}

fn validate_password(password: &str) -> AppResult<()> {
    if password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    Ok(())
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("failed to hash password: {e}")))
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::mailer::Mailer;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service_with(db: sea_orm::DatabaseConnection) -> UserService {
        let db = Arc::new(db);
        UserService::new(
            UserRepository::new(db.clone()),
            ProfileRepository::new(db.clone()),
            SettingsRepository::new(db.clone()),
            PostRepository::new(db.clone()),
            FollowRepository::new(db.clone()),
            BlockRepository::new(db.clone()),
            VisibilityService::new(
                SettingsRepository::new(db.clone()),
                FollowRepository::new(db.clone()),
            ),
            NotificationService::new(
                SettingsRepository::new(db.clone()),
                UserRepository::new(db),
                Mailer::disabled(),
                "SocialHub".to_string(),
            ),
        )
    }

    fn test_user(id: &str, username: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: username.to_string(),
            username_lower: username.to_lowercase(),
            email: Some(format!("{username}@example.com")),
            token: Some("token".to_string()),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_settings(user_id: &str, profile_visible: bool) -> settings::Model {
        settings::Model {
            user_id: user_id.to_string(),
            privacy: PrivacyLevel::Public,
            email_notifications: true,
            profile_visible,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_validate_username_rules() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("al").is_err());
        assert!(validate_username("bad name").is_err());
        assert!(validate_username("snake_case_99").is_ok());
    }

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("longenough").is_ok());
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[tokio::test]
    async fn test_register_duplicate_username_is_conflict() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_user("u1", "alice")]])
                .into_connection(),
        );

        let result = service
            .register("alice", "alice@example.com", "password123")
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_short_password() {
        // Validation fails before any query.
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let result = service.register("alice", "a@example.com", "short").await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_username() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let result = service.authenticate("ghost", "whatever1").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_authenticate_by_token_unknown() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let result = service.authenticate_by_token("bogus").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_search_empty_query_returns_nothing() {
        // No queries issued.
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let result = service.search("  ", "u1").await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_search_filters_hidden_profiles() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // username scan
            .append_query_results([vec![test_user("u2", "bob"), test_user("u3", "bobby")]])
            // settings for u2: hidden
            .append_query_results([[test_settings("u2", false)]])
            // settings for u3: visible
            .append_query_results([[test_settings("u3", true)]])
            .into_connection();

        let service = service_with(db);
        let result = service.search("bob", "u1").await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "u3");
    }

    #[tokio::test]
    async fn test_profile_page_unknown_username() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let result = service.profile_page(Some("u1"), "ghost").await;

        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_profile_page_post_count_matches_visible_posts() {
        use socialhub_db::entities::follow;

        // Friends-only owner viewed by a stranger: the posts are hidden and
        // the count must not reveal how many exist.
        let friends_settings = settings::Model {
            user_id: "u2".to_string(),
            privacy: PrivacyLevel::Friends,
            email_notifications: true,
            profile_visible: true,
            created_at: Utc::now().into(),
            updated_at: None,
        };

        let test_post = |id: &str| post::Model {
            id: id.to_string(),
            user_id: "u2".to_string(),
            text: "hidden".to_string(),
            image_url: None,
            category_id: None,
            shared_from_id: None,
            is_shared: false,
            created_at: Utc::now().into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // username lookup
            .append_query_results([[test_user("u2", "bob")]])
            // settings for the profile-visibility check
            .append_query_results([[friends_settings.clone()]])
            // profile row absent
            .append_query_results([Vec::<profile::Model>::new()])
            // the owner's posts
            .append_query_results([vec![test_post("p1"), test_post("p2")]])
            // per-post visibility: settings then (empty) follow edge, twice
            .append_query_results([[friends_settings.clone()]])
            .append_query_results([Vec::<follow::Model>::new()])
            .append_query_results([[friends_settings]])
            .append_query_results([Vec::<follow::Model>::new()])
            // follower and following counts
            .append_query_results([vec![maplit::btreemap! {
                "num_items" => Into::<sea_orm::Value>::into(0i64)
            }]])
            .append_query_results([vec![maplit::btreemap! {
                "num_items" => Into::<sea_orm::Value>::into(0i64)
            }]])
            .into_connection();

        let service = service_with(db);
        let page = service.profile_page(Some("u1"), "bob").await.unwrap();

        assert!(page.visible);
        assert!(page.posts.is_empty());
        assert_eq!(page.post_count, 0);
    }

    #[tokio::test]
    async fn test_profile_page_hidden_for_stranger() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // username lookup
            .append_query_results([[test_user("u2", "bob")]])
            // settings: hidden profile
            .append_query_results([[test_settings("u2", false)]])
            .into_connection();

        let service = service_with(db);
        let page = service.profile_page(Some("u1"), "bob").await.unwrap();

        assert!(!page.visible);
        assert!(page.posts.is_empty());
        assert!(page.blocked_users.is_none());
    }
}
