use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use validator::Validate;

use crate::{
    error::{AppError, Result},
    middleware::AuthUser,
    state::AppState,
    user::user_dto::{ChangePasswordRequest, DarkModeResponse, UpdateProfileRequest, UploadResponse},
};

/// Get current user profile
#[utoipa::path(
    get,
    path = "/user/profile",
    tag = "user",
    responses(
        (status = 200, description = "User profile retrieved successfully", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse> {
    let user = state.user_service.get_profile(user_id).await?;

    Ok((StatusCode::OK, Json(user)))
}

/// Update current user profile
#[utoipa::path(
    put,
    path = "/user/profile",
    tag = "user",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated successfully", body = UserResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let user = state.user_service.update_profile(user_id, payload).await?;

    Ok((StatusCode::OK, Json(user)))
}

/// Upload a profile photo (multipart field `file`)
#[utoipa::path(
    post,
    path = "/user/profile/upload",
    tag = "user",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "No file uploaded or unsupported type"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_profile_photo(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let file_url = state.user_service.store_photo(&filename, &bytes).await?;
        return Ok((StatusCode::OK, Json(UploadResponse { file_url })));
    }

    Err(AppError::BadRequest("No file uploaded".to_string()))
}

/// Change the caller's password
#[utoipa::path(
    post,
    path = "/user/change-password",
    tag = "user",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed successfully"),
        (status = 400, description = "Current password is incorrect"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    state.user_service.change_password(user_id, payload).await?;

    Ok(Json(json!({ "message": "Password changed successfully" })))
}

/// Delete the caller's account together with their tasks and categories
#[utoipa::path(
    delete,
    path = "/user/delete-account",
    tag = "user",
    responses(
        (status = 200, description = "User account deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_account(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse> {
    state.user_service.delete_account(user_id).await?;

    Ok(Json(json!({ "message": "User account deleted successfully" })))
}

/// Flip the dark-mode preference
#[utoipa::path(
    patch,
    path = "/user/toggle-mode",
    tag = "user",
    responses(
        (status = 200, description = "New preference", body = DarkModeResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn toggle_dark_mode(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse> {
    let dark_mode = state.user_service.toggle_dark_mode(user_id).await?;

    Ok(Json(DarkModeResponse { dark_mode }))
}
