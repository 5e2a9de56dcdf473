//! Database entities.

pub mod block;
pub mod category;
pub mod comment;
pub mod follow;
pub mod like;
pub mod post;
pub mod post_tag;
pub mod profile;
pub mod report;
pub mod settings;
pub mod tag;
pub mod user;

pub use block::Entity as Block;
pub use category::Entity as Category;
pub use comment::Entity as Comment;
pub use follow::Entity as Follow;
pub use like::Entity as Like;
pub use post::Entity as Post;
pub use post_tag::Entity as PostTag;
pub use profile::Entity as Profile;
pub use report::Entity as Report;
pub use settings::Entity as Settings;
pub use tag::Entity as Tag;
pub use user::Entity as User;
