//! Account endpoints: registration, login, profile and settings management.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use socialhub_common::{AppError, AppResult};
use socialhub_core::{EffectiveSettings, SettingsUpdate};
use socialhub_db::entities::settings::PrivacyLevel;
use validator::Validate;

use crate::extractors::AuthUser;
use crate::middleware::AppState;
use crate::response::ApiResponse;

use super::users::UserResponse;

/// Registration request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 30))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Authenticated session response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: UserResponse,
    pub token: String,
}

/// Settings response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub privacy: PrivacyLevel,
    pub email_notifications: bool,
    pub profile_visible: bool,
}

impl From<EffectiveSettings> for SettingsResponse {
    fn from(s: EffectiveSettings) -> Self {
        Self {
            privacy: s.privacy,
            email_notifications: s.email_notifications,
            profile_visible: s.profile_visible,
        }
    }
}

/// Settings update request. Absent fields are left untouched.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub privacy: Option<PrivacyLevel>,
    pub email_notifications: Option<bool>,
    pub profile_visible: Option<bool>,
}

/// Profile update request. Absent fields are left untouched.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(max = 500))]
    pub bio: Option<String>,
    #[validate(url)]
    pub avatar_url: Option<String>,
}

/// Register a new account.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<ApiResponse<SessionResponse>> {
    req.validate()?;

    let user = state
        .user_service
        .register(&req.username, &req.email, &req.password)
        .await?;

    let token = user
        .token
        .clone()
        .ok_or_else(|| AppError::Internal("registered user has no token".to_string()))?;

    Ok(ApiResponse::ok(SessionResponse {
        user: user.into(),
        token,
    }))
}

/// Log in with username and password.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<SessionResponse>> {
    let user = state
        .user_service
        .authenticate(&req.username, &req.password)
        .await?;

    let token = user.token.clone().ok_or(AppError::Unauthorized)?;

    Ok(ApiResponse::ok(SessionResponse {
        user: user.into(),
        token,
    }))
}

/// Current settings.
async fn settings(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<SettingsResponse>> {
    let settings = state.user_service.get_settings(&user.id).await?;
    Ok(ApiResponse::ok(settings.into()))
}

/// Update settings.
async fn update_settings(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateSettingsRequest>,
) -> AppResult<ApiResponse<SettingsResponse>> {
    let updated = state
        .user_service
        .update_settings(
            &user.id,
            SettingsUpdate {
                privacy: req.privacy,
                email_notifications: req.email_notifications,
                profile_visible: req.profile_visible,
            },
        )
        .await?;

    Ok(ApiResponse::ok(SettingsResponse {
        privacy: updated.privacy,
        email_notifications: updated.email_notifications,
        profile_visible: updated.profile_visible,
    }))
}

/// Update bio and avatar.
async fn update_profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> AppResult<ApiResponse<()>> {
    req.validate()?;

    state
        .user_service
        .update_profile(&user.id, req.bio.as_deref(), req.avatar_url.as_deref())
        .await?;
    Ok(ApiResponse::ok(()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/settings", post(settings))
        .route("/settings/update", post(update_settings))
        .route("/profile/update", post(update_profile))
}
