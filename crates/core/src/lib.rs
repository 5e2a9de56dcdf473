//! Business logic layer for socialhub.

pub mod services;

pub use services::block::{BlockService, BlockToggle};
pub use services::comment::CommentService;
pub use services::follow::{FollowService, FollowToggle};
pub use services::like::{LikeService, LikeToggle};
pub use services::mailer::Mailer;
pub use services::notification::NotificationService;
pub use services::post::{PostDetail, PostFilter, PostService};
pub use services::report::ReportService;
pub use services::user::{ProfilePage, SettingsUpdate, UserService};
pub use services::visibility::{EffectiveSettings, VisibilityService};
