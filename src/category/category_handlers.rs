use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use validator::Validate;

use crate::{
    error::{parse_id, Result},
    middleware::AuthUser,
    state::AppState,
};
use super::{
    category_dto::{CreateCategoryRequest, UpdateCategoryRequest},
    category_models::Category,
};

/// Create a category
#[utoipa::path(
    post,
    path = "/category",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Missing name, invalid color or duplicate name")
    ),
    tag = "category",
    security(("bearer_auth" = []))
)]
pub async fn create_category(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let category = state.category_service.create(user_id, payload).await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// List the caller's categories, newest first
#[utoipa::path(
    get,
    path = "/category",
    responses(
        (status = 200, description = "Categories", body = [Category]),
        (status = 401, description = "Unauthorized")
    ),
    tag = "category",
    security(("bearer_auth" = []))
)]
pub async fn get_categories(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Category>>> {
    let categories = state.category_service.list(user_id).await?;
    Ok(Json(categories))
}

/// Get a single category
#[utoipa::path(
    get,
    path = "/category/{id}",
    params(("id" = String, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category", body = Category),
        (status = 400, description = "Invalid category ID"),
        (status = 404, description = "Category not found")
    ),
    tag = "category",
    security(("bearer_auth" = []))
)]
pub async fn get_category(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Category>> {
    let category_id = parse_id(&id, "category")?;
    let category = state.category_service.get(user_id, category_id).await?;
    Ok(Json(category))
}

/// Update a category
#[utoipa::path(
    put,
    path = "/category/{id}/update",
    params(("id" = String, Path, description = "Category id")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 400, description = "Validation error or duplicate name"),
        (status = 404, description = "Category not found")
    ),
    tag = "category",
    security(("bearer_auth" = []))
)]
pub async fn update_category(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> Result<Json<Category>> {
    let category_id = parse_id(&id, "category")?;
    payload.validate()?;

    let category = state
        .category_service
        .update(user_id, category_id, payload)
        .await?;

    Ok(Json(category))
}

/// Delete a category; its tasks become uncategorized
#[utoipa::path(
    delete,
    path = "/category/{id}/delete",
    params(("id" = String, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted successfully"),
        (status = 400, description = "Invalid category ID"),
        (status = 404, description = "Category not found")
    ),
    tag = "category",
    security(("bearer_auth" = []))
)]
pub async fn delete_category(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let category_id = parse_id(&id, "category")?;
    state.category_service.delete(user_id, category_id).await?;

    Ok(Json(json!({ "message": "Category deleted successfully" })))
}
