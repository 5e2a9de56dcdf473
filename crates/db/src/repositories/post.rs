//! Post repository.

use std::sync::Arc;

use crate::entities::{post, post_tag, tag, user, Post};
use crate::map_db_err;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, JoinType,
    ModelTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use socialhub_common::{AppError, AppResult};

/// Optional filters for timeline queries.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    /// Case-insensitive substring of post text or author username.
    pub query: Option<String>,
    /// Exact category ID.
    pub category_id: Option<String>,
    /// Exact (lowercase) tag name.
    pub tag_name: Option<String>,
}

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a post by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a post by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<post::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PostNotFound(id.to_string()))
    }

    /// Create a post.
    pub async fn create(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Delete a post.
    pub async fn delete(&self, model: post::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Posts by one author, newest first.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<post::Model>> {
        Post::find()
            .filter(post::Column::UserId.eq(user_id))
            .order_by_desc(post::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Candidate posts for the home timeline, newest first.
    ///
    /// Applies the storage-level filters only; privacy gating happens in the
    /// visibility layer above.
    pub async fn find_filtered(&self, filter: &PostFilter) -> AppResult<Vec<post::Model>> {
        let mut select = Post::find();
        let mut tag_joined = false;

        if let Some(query) = filter.query.as_deref().filter(|q| !q.is_empty()) {
            let pattern = format!(
                "%{}%",
                query.to_lowercase().replace('%', "\\%").replace('_', "\\_")
            );
            // Left joins so posts without tags still match on text or author.
            select = select
                .join(JoinType::InnerJoin, post::Relation::User.def())
                .join(JoinType::LeftJoin, post::Relation::PostTags.def())
                .join(JoinType::LeftJoin, post_tag::Relation::Tag.def())
                .filter(
                    Condition::any()
                        .add(sea_orm::sea_query::Expr::expr(sea_orm::sea_query::Func::lower(
                            sea_orm::sea_query::Expr::col((post::Entity, post::Column::Text)),
                        ))
                        .like(&pattern))
                        .add(user::Column::UsernameLower.like(&pattern))
                        .add(tag::Column::Name.like(&pattern)),
                );
            tag_joined = true;
        }

        if let Some(category_id) = filter.category_id.as_deref() {
            select = select.filter(post::Column::CategoryId.eq(category_id));
        }

        if let Some(tag_name) = filter.tag_name.as_deref() {
            if !tag_joined {
                select = select
                    .join(JoinType::InnerJoin, post::Relation::PostTags.def())
                    .join(JoinType::InnerJoin, post_tag::Relation::Tag.def());
            }
            select = select.filter(tag::Column::Name.eq(tag_name.to_lowercase()));
        }

        select
            .distinct()
            .order_by_desc(post::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Attach a tag to a post.
    ///
    /// Re-attaching the same tag is a no-op; the composite-key Conflict is
    /// recovered here.
    pub async fn attach_tag(&self, post_id: &str, tag_id: &str) -> AppResult<()> {
        let model = post_tag::ActiveModel {
            post_id: sea_orm::Set(post_id.to_string()),
            tag_id: sea_orm::Set(tag_id.to_string()),
        };

        match model.insert(self.db.as_ref()).await.map_err(map_db_err) {
            Ok(_) | Err(AppError::Conflict(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Tags attached to a post.
    pub async fn find_tags(&self, post: &post::Model) -> AppResult<Vec<tag::Model>> {
        post.find_related(tag::Entity)
            .order_by_asc(tag::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
