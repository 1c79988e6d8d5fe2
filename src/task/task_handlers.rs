use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
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
    task_dto::{CreateTaskRequest, UpdateTaskRequest, UpdateTaskStatusRequest},
    task_export::CSV_FILENAME,
    task_models::Task,
    task_query::TaskQueryParams,
};

/// Get all tasks for the authenticated user
#[utoipa::path(
    get,
    path = "/tasks",
    params(TaskQueryParams),
    responses(
        (status = 200, description = "Filtered and sorted tasks", body = [Task]),
        (status = 400, description = "Invalid date, category id or sort field"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn get_tasks(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<TaskQueryParams>,
) -> Result<Json<Vec<Task>>> {
    let tasks = state.task_service.list_tasks(user_id, &params).await?;
    Ok(Json(tasks))
}

/// Get a single task
#[utoipa::path(
    get,
    path = "/tasks/{id}",
    params(("id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task", body = Task),
        (status = 400, description = "Invalid task ID"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn get_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Task>> {
    let task_id = parse_id(&id, "task")?;
    let task = state.task_service.get_task(user_id, task_id).await?;
    Ok(Json(task))
}

/// Create a task
#[utoipa::path(
    post,
    path = "/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Category not found")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn create_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let task = state.task_service.create_task(user_id, payload).await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Update any subset of a task's fields
#[utoipa::path(
    put,
    path = "/tasks/{id}/update",
    params(("id" = String, Path, description = "Task id")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = Task),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn update_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<Task>> {
    let task_id = parse_id(&id, "task")?;
    payload.validate()?;

    let task = state.task_service.update_task(user_id, task_id, payload).await?;

    Ok(Json(task))
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/tasks/{id}/delete",
    params(("id" = String, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task deleted successfully"),
        (status = 400, description = "Invalid task ID"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn delete_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let task_id = parse_id(&id, "task")?;
    state.task_service.delete_task(user_id, task_id).await?;

    Ok(Json(json!({ "message": "Task deleted successfully" })))
}

/// Set a task's status, or advance it Todo -> In Progress -> Completed -> Todo
#[utoipa::path(
    patch,
    path = "/tasks/{id}/status",
    params(("id" = String, Path, description = "Task id")),
    request_body = UpdateTaskStatusRequest,
    responses(
        (status = 200, description = "Task with its new status", body = Task),
        (status = 400, description = "Invalid task ID, status or request body"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn update_task_status(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Task>> {
    let task_id = parse_id(&id, "task")?;
    let payload = UpdateTaskStatusRequest::from_body(&body)?;

    let task = state.task_service.update_status(user_id, task_id, payload).await?;

    Ok(Json(task))
}

/// Export the filtered tasks as CSV
#[utoipa::path(
    get,
    path = "/tasks/export/csv",
    params(TaskQueryParams),
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv", body = String),
        (status = 404, description = "No tasks found to export")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn export_tasks_csv(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<TaskQueryParams>,
) -> Result<impl IntoResponse> {
    let csv = state.task_service.export_csv(user_id, &params).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={CSV_FILENAME}"),
            ),
        ],
        csv,
    ))
}
