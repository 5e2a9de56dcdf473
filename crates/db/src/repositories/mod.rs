//! Repository layer: typed database access for each entity.

pub mod block;
pub mod category;
pub mod comment;
pub mod follow;
pub mod like;
pub mod post;
pub mod profile;
pub mod report;
pub mod settings;
pub mod tag;
pub mod user;

pub use block::BlockRepository;
pub use category::CategoryRepository;
pub use comment::CommentRepository;
pub use follow::FollowRepository;
pub use like::LikeRepository;
pub use post::PostRepository;
pub use profile::ProfileRepository;
pub use report::ReportRepository;
pub use settings::SettingsRepository;
pub use tag::TagRepository;
pub use user::UserRepository;
