//! Post service.

use crate::services::visibility::VisibilityService;
use sea_orm::Set;
use socialhub_common::{AppError, AppResult, IdGenerator};
use socialhub_db::entities::{comment, post, user};
use socialhub_db::repositories::{
    CategoryRepository, CommentRepository, LikeRepository, PostRepository, TagRepository,
    UserRepository,
};

pub use socialhub_db::repositories::post::PostFilter;

/// A post with the context shown on its detail page.
#[derive(Debug, Clone)]
pub struct PostDetail {
    /// The post itself.
    pub post: post::Model,
    /// The author.
    pub author: user::Model,
    /// Comments, oldest first.
    pub comments: Vec<comment::Model>,
    /// Total likes.
    pub like_count: u64,
    /// Attached tag names.
    pub tags: Vec<String>,
}

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    comment_repo: CommentRepository,
    like_repo: LikeRepository,
    tag_repo: TagRepository,
    category_repo: CategoryRepository,
    user_repo: UserRepository,
    visibility: VisibilityService,
    id_gen: IdGenerator,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub fn new(
        post_repo: PostRepository,
        comment_repo: CommentRepository,
        like_repo: LikeRepository,
        tag_repo: TagRepository,
        category_repo: CategoryRepository,
        user_repo: UserRepository,
        visibility: VisibilityService,
    ) -> Self {
        Self {
            post_repo,
            comment_repo,
            like_repo,
            tag_repo,
            category_repo,
            user_repo,
            visibility,
            id_gen: IdGenerator::new(),
        }
    }

    /// The home timeline: filtered candidates reduced to what the viewer may
    /// see, newest first.
    pub async fn home_feed(
        &self,
        viewer_id: Option<&str>,
        filter: &PostFilter,
    ) -> AppResult<Vec<post::Model>> {
        let candidates = self.post_repo.find_filtered(filter).await?;
        self.visibility.filter_posts(viewer_id, candidates).await
    }

    /// A single post, or NotFound.
    pub async fn get_post(&self, post_id: &str) -> AppResult<post::Model> {
        self.post_repo.get_by_id(post_id).await
    }

    /// A post with its comments, like count and tags.
    pub async fn post_detail(&self, post_id: &str) -> AppResult<PostDetail> {
        let post = self.post_repo.get_by_id(post_id).await?;
        let author = self.user_repo.get_by_id(&post.user_id).await?;
        let comments = self.comment_repo.find_by_post(post_id).await?;
        let like_count = self.like_repo.count_by_post(post_id).await?;
        let tags = self
            .post_repo
            .find_tags(&post)
            .await?
            .into_iter()
            .map(|t| t.name)
            .collect();

        Ok(PostDetail {
            post,
            author,
            comments,
            like_count,
            tags,
        })
    }

    /// Create a post with optional image, category and comma-separated tags.
    pub async fn create_post(
        &self,
        author: &user::Model,
        text: &str,
        image_url: Option<&str>,
        category_id: Option<&str>,
        tags_csv: &str,
    ) -> AppResult<post::Model> {
        if let Some(category_id) = category_id {
            self.category_repo
                .find_by_id(category_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;
        }

        let model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(author.id.clone()),
            text: Set(text.to_string()),
            image_url: Set(image_url.map(ToString::to_string)),
            category_id: Set(category_id.map(ToString::to_string)),
            shared_from_id: Set(None),
            is_shared: Set(false),
            created_at: Set(chrono::Utc::now().into()),
        };

        let created = self.post_repo.create(model).await?;

        for name in parse_tag_names(tags_csv) {
            let tag = self.tag_repo.get_or_create(&name).await?;
            self.post_repo.attach_tag(&created.id, &tag.id).await?;
        }

        Ok(created)
    }

    /// Share an existing post as a new post with its own text and timestamp.
    pub async fn share_post(
        &self,
        author: &user::Model,
        original_post_id: &str,
        text: &str,
    ) -> AppResult<post::Model> {
        let original = self.post_repo.get_by_id(original_post_id).await?;

        let model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(author.id.clone()),
            text: Set(text.to_string()),
            image_url: Set(None),
            category_id: Set(None),
            shared_from_id: Set(Some(original.id)),
            is_shared: Set(true),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.post_repo.create(model).await
    }
}

/// Normalize a comma-separated tag list: trim, lowercase, drop empties,
/// deduplicate preserving first occurrence.
fn parse_tag_names(tags_csv: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags_csv
        .split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use socialhub_db::repositories::{FollowRepository, SettingsRepository};
    use std::sync::Arc;

    fn service_with(db: sea_orm::DatabaseConnection) -> PostService {
        let db = Arc::new(db);
        PostService::new(
            PostRepository::new(db.clone()),
            CommentRepository::new(db.clone()),
            LikeRepository::new(db.clone()),
            TagRepository::new(db.clone()),
            CategoryRepository::new(db.clone()),
            UserRepository::new(db.clone()),
            VisibilityService::new(
                SettingsRepository::new(db.clone()),
                FollowRepository::new(db),
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

    #[test]
    fn test_parse_tag_names_normalizes() {
        let tags = parse_tag_names(" Rust, web , RUST ,, async");
        assert_eq!(tags, vec!["rust", "web", "async"]);
    }

    #[test]
    fn test_parse_tag_names_empty_input() {
        assert!(parse_tag_names("").is_empty());
        assert!(parse_tag_names(" , , ").is_empty());
    }

    #[tokio::test]
    async fn test_share_missing_post_is_not_found() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let result = service.share_post(&test_user("u1"), "missing", "look").await;

        assert!(matches!(result, Err(AppError::PostNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_post_with_unknown_category() {
        use socialhub_db::entities::category;

        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<category::Model>::new()])
                .into_connection(),
        );

        let result = service
            .create_post(&test_user("u1"), "hi", None, Some("missing"), "")
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_share_post_marks_share() {
        let original = post::Model {
            id: "p1".to_string(),
            user_id: "u2".to_string(),
            text: "original".to_string(),
            image_url: None,
            category_id: None,
            shared_from_id: None,
            is_shared: false,
            created_at: Utc::now().into(),
        };
        let shared = post::Model {
            id: "p2".to_string(),
            user_id: "u1".to_string(),
            text: "look at this".to_string(),
            image_url: None,
            category_id: None,
            shared_from_id: Some("p1".to_string()),
            is_shared: true,
            created_at: Utc::now().into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // original lookup
            .append_query_results([[original]])
            // insert returning
            .append_query_results([[shared]])
            .into_connection();

        let service = service_with(db);
        let result = service
            .share_post(&test_user("u1"), "p1", "look at this")
            .await
            .unwrap();

        assert!(result.is_shared);
        assert_eq!(result.shared_from_id.as_deref(), Some("p1"));
        assert_eq!(result.text, "look at this");
    }
}
