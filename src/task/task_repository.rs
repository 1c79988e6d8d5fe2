use crate::error::Result;
use crate::task::task_models::{Task, TaskPriority, TaskStatus};
use crate::task::task_query::TaskQuery;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub category_id: Option<Uuid>,
}

/// Partial update; `None` leaves a column untouched, `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub category_id: Option<Option<Uuid>>,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self, query: &TaskQuery) -> Result<Vec<Task>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM tasks");
        query.push_sql(&mut qb);

        let tasks = qb.build_query_as::<Task>().fetch_all(&self.pool).await?;
        Ok(tasks)
    }

    pub async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    pub async fn create(&self, user_id: Uuid, task: NewTask) -> Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (user_id, title, description, status, priority, due_date, category_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *"
        )
        .bind(user_id)
        .bind(task.title)
        .bind(task.description)
        .bind(task.status)
        .bind(task.priority)
        .bind(task.due_date)
        .bind(task.category_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    pub async fn update(&self, id: Uuid, user_id: Uuid, changes: TaskChanges) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                status = COALESCE($3, status),
                priority = COALESCE($4, priority),
                due_date = CASE WHEN $5 THEN $6 ELSE due_date END,
                category_id = CASE WHEN $7 THEN $8 ELSE category_id END,
                updated_at = NOW()
             WHERE id = $9 AND user_id = $10
             RETURNING *"
        )
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.status)
        .bind(changes.priority)
        .bind(changes.due_date.is_some())
        .bind(changes.due_date.flatten())
        .bind(changes.category_id.is_some())
        .bind(changes.category_id.flatten())
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn update_status(&self, id: Uuid, user_id: Uuid, status: TaskStatus) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET status = $1, updated_at = NOW()
             WHERE id = $2 AND user_id = $3
             RETURNING *"
        )
        .bind(status)
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    /// Detaches every task of `user_id` from `category_id`.
    pub async fn clear_category_with_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        category_id: Uuid,
        user_id: Uuid,
    ) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE tasks SET category_id = NULL, updated_at = NOW()
             WHERE category_id = $1 AND user_id = $2"
        )
        .bind(category_id)
        .bind(user_id)
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected())
    }
}
