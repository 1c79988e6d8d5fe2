use crate::category::category_repository::CategoryRepository;
use crate::error::{AppError, Result};
use crate::task::task_dto::{CreateTaskRequest, UpdateTaskRequest, UpdateTaskStatusRequest};
use crate::task::task_export::tasks_to_csv;
use crate::task::task_models::{Task, TaskPriority, TaskStatus};
use crate::task::task_query::{parse_date, TaskQuery, TaskQueryParams};
use crate::task::task_repository::{NewTask, TaskChanges, TaskRepository};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Service layer for task‑related business logic.
#[derive(Clone)]
pub struct TaskService {
    repo: TaskRepository,
    categories: CategoryRepository,
}

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

fn parse_status(raw: &str) -> Result<TaskStatus> {
    raw.parse().map_err(AppError::Validation)
}

fn parse_priority(raw: &str) -> Result<TaskPriority> {
    raw.parse().map_err(AppError::Validation)
}

/// An empty string means "no due date".
fn parse_due_date(raw: &str) -> Result<Option<DateTime<Utc>>> {
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        parse_date(raw).map(Some)
    }
}

impl TaskService {
    pub fn new(repo: TaskRepository, categories: CategoryRepository) -> Self {
        Self { repo, categories }
    }

    /// Resolves a category reference, which must belong to `user_id`.
    async fn owned_category(&self, user_id: Uuid, raw: &str) -> Result<Option<Uuid>> {
        if raw.is_empty() || raw == "null" {
            return Ok(None);
        }
        let id = Uuid::parse_str(raw)
            .map_err(|_| AppError::Validation("Invalid category ID".into()))?;

        self.categories
            .find_by_id(id, user_id)
            .await?
            .map(|c| Some(c.id))
            .ok_or_else(|| AppError::NotFound("Category not found".into()))
    }

    pub async fn list_tasks(&self, user_id: Uuid, params: &TaskQueryParams) -> Result<Vec<Task>> {
        let query = TaskQuery::parse(user_id, params, Utc::now())?;
        self.repo.find_all(&query).await
    }

    /// CSV of the filtered tasks. An empty selection is reported as `NotFound`.
    pub async fn export_csv(&self, user_id: Uuid, params: &TaskQueryParams) -> Result<String> {
        let tasks = self.list_tasks(user_id, params).await?;

        if tasks.is_empty() {
            return Err(AppError::NotFound("No tasks found to export".into()));
        }

        tracing::debug!(%user_id, rows = tasks.len(), "exporting tasks");
        tasks_to_csv(&tasks)
    }

    pub async fn get_task(&self, user_id: Uuid, task_id: Uuid) -> Result<Task> {
        self.repo
            .find_by_id(task_id, user_id)
            .await?
            .ok_or_else(task_not_found)
    }

    pub async fn create_task(&self, user_id: Uuid, payload: CreateTaskRequest) -> Result<Task> {
        let title = payload.title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("Title is required".into()));
        }

        let category_id = match payload.category.as_deref() {
            Some(raw) => self.owned_category(user_id, raw).await?,
            None => None,
        };

        let new_task = NewTask {
            title: title.to_string(),
            description: payload.description.unwrap_or_default(),
            status: payload.status.as_deref().map(parse_status).transpose()?.unwrap_or_default(),
            priority: payload.priority.as_deref().map(parse_priority).transpose()?.unwrap_or_default(),
            due_date: payload.due_date.as_deref().map(parse_due_date).transpose()?.flatten(),
            category_id,
        };

        let task = self.repo.create(user_id, new_task).await?;
        tracing::debug!(%user_id, task_id = %task.id, "task created");
        Ok(task)
    }

    pub async fn update_task(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        payload: UpdateTaskRequest,
    ) -> Result<Task> {
        let title = match payload.title {
            Some(title) if title.trim().is_empty() => {
                return Err(AppError::Validation("Title cannot be empty".into()));
            }
            Some(title) => Some(title.trim().to_string()),
            None => None,
        };

        let category_id = match payload.category {
            Some(Some(raw)) => Some(self.owned_category(user_id, &raw).await?),
            Some(None) => Some(None),
            None => None,
        };

        let due_date = match payload.due_date {
            Some(Some(raw)) => Some(parse_due_date(&raw)?),
            Some(None) => Some(None),
            None => None,
        };

        let changes = TaskChanges {
            title,
            description: payload.description,
            status: payload.status.as_deref().map(parse_status).transpose()?,
            priority: payload.priority.as_deref().map(parse_priority).transpose()?,
            due_date,
            category_id,
        };

        self.repo
            .update(task_id, user_id, changes)
            .await?
            .ok_or_else(task_not_found)
    }

    pub async fn delete_task(&self, user_id: Uuid, task_id: Uuid) -> Result<()> {
        if self.repo.delete(task_id, user_id).await? == 0 {
            return Err(task_not_found());
        }
        Ok(())
    }

    /// Sets the requested status, or advances the status cycle when none is given.
    pub async fn update_status(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        payload: UpdateTaskStatusRequest,
    ) -> Result<Task> {
        let status = match payload.status.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => parse_status(raw)?,
            None => self.get_task(user_id, task_id).await?.status.next(),
        };

        self.repo
            .update_status(task_id, user_id, status)
            .await?
            .ok_or_else(task_not_found)
    }
}
