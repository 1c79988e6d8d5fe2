//! Translation of the task listing query string into a typed filter and sort.
//!
//! [`TaskQuery::parse`] is a pure function of the owner, the raw parameters
//! and the evaluation instant. The result is rendered into SQL with
//! [`TaskQuery::push_sql`], every user supplied value travelling as a bind
//! parameter.
//!
//! Precedence rules:
//! - unknown `status` / `priority` values are not errors, they match nothing;
//! - `overdue=true` wins over every due-date range parameter and never
//!   selects completed tasks;
//! - `dueAfter` wins over `dueFrom`, `dueBefore` wins over `dueTo`;
//! - any due-date predicate excludes tasks without a due date.

use crate::error::{AppError, Result};
use crate::task::task_models::{TaskPriority, TaskStatus};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};
use std::str::FromStr;
use utoipa::IntoParams;
use uuid::Uuid;

/// Query string of `GET /tasks` and `GET /tasks/export/csv`, as received.
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase", parameter_in = Query)]
pub struct TaskQueryParams {
    /// Exact status: `Todo`, `In Progress` or `Completed`
    pub status: Option<String>,
    /// Exact priority: `Low`, `Medium` or `High`
    pub priority: Option<String>,
    /// Case-insensitive substring of the title
    pub search: Option<String>,
    /// Category id, or `null` for tasks without a category
    pub category: Option<String>,
    /// `true` restricts to tasks without a category
    pub uncategorized: Option<String>,
    /// `true` restricts to tasks due in the past; range parameters are then ignored
    pub overdue: Option<String>,
    /// Inclusive lower bound on the due date (wins over `dueFrom`)
    pub due_after: Option<String>,
    pub due_from: Option<String>,
    /// Inclusive upper bound on the due date (wins over `dueTo`)
    pub due_before: Option<String>,
    pub due_to: Option<String>,
    /// Field to sort by; defaults to `createdAt`
    pub sort_by: Option<String>,
    /// `asc` for ascending, anything else is descending
    pub order: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Equality predicate on an enumerated column. A value outside the enum
/// is kept as `Nothing` so the query selects no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match<T> {
    Is(T),
    Nothing,
}

impl<T: FromStr> Match<T> {
    fn parse(raw: &str) -> Self {
        raw.parse().map(Match::Is).unwrap_or(Match::Nothing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    Is(Uuid),
    Uncategorized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueFilter {
    Any,
    /// Due strictly before `now`, not completed. Combined with
    /// `status=Completed` it therefore selects nothing.
    Overdue { now: DateTime<Utc> },
    /// Has a due date within the inclusive bounds; a missing bound is open.
    Between {
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFilter {
    pub owner: Uuid,
    pub status: Option<Match<TaskStatus>>,
    pub priority: Option<Match<TaskPriority>>,
    pub search: Option<String>,
    pub category: Option<CategoryFilter>,
    pub due: DueFilter,
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` and `YYYY-MM-DD`; the last two
/// are read as UTC.
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| AppError::Validation(format!("Invalid date: {raw}")))
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl TaskFilter {
    pub fn from_params(owner: Uuid, params: &TaskQueryParams, now: DateTime<Utc>) -> Result<Self> {
        let category = if present(&params.uncategorized) == Some("true") {
            Some(CategoryFilter::Uncategorized)
        } else {
            match present(&params.category) {
                None => None,
                Some("null") => Some(CategoryFilter::Uncategorized),
                Some(raw) => Some(CategoryFilter::Is(
                    Uuid::parse_str(raw)
                        .map_err(|_| AppError::Validation("Invalid category ID".to_string()))?,
                )),
            }
        };

        let due = if present(&params.overdue) == Some("true") {
            DueFilter::Overdue { now }
        } else {
            let lower = present(&params.due_after).or(present(&params.due_from));
            let upper = present(&params.due_before).or(present(&params.due_to));

            if lower.is_some() || upper.is_some() {
                DueFilter::Between {
                    from: lower.map(parse_date).transpose()?,
                    to: upper.map(parse_date).transpose()?,
                }
            } else {
                DueFilter::Any
            }
        };

        Ok(Self {
            owner,
            status: present(&params.status).map(Match::parse),
            priority: present(&params.priority).map(Match::parse),
            search: present(&params.search).map(str::to_string),
            category,
            due,
        })
    }

    /// Appends ` WHERE ...` for this filter.
    pub fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" WHERE user_id = ").push_bind(self.owner);

        match self.status {
            Some(Match::Is(status)) => {
                qb.push(" AND status = ").push_bind(status);
            }
            Some(Match::Nothing) => {
                qb.push(" AND FALSE");
            }
            None => {}
        }

        match self.priority {
            Some(Match::Is(priority)) => {
                qb.push(" AND priority = ").push_bind(priority);
            }
            Some(Match::Nothing) => {
                qb.push(" AND FALSE");
            }
            None => {}
        }

        if let Some(search) = &self.search {
            qb.push(" AND title ILIKE ")
                .push_bind(format!("%{}%", escape_like(search)));
        }

        match self.category {
            Some(CategoryFilter::Is(id)) => {
                qb.push(" AND category_id = ").push_bind(id);
            }
            Some(CategoryFilter::Uncategorized) => {
                qb.push(" AND category_id IS NULL");
            }
            None => {}
        }

        match self.due {
            DueFilter::Any => {}
            DueFilter::Overdue { now } => {
                qb.push(" AND due_date IS NOT NULL AND due_date < ")
                    .push_bind(now)
                    .push(" AND status <> ")
                    .push_bind(TaskStatus::Completed);
            }
            DueFilter::Between { from, to } => {
                qb.push(" AND due_date IS NOT NULL");
                if let Some(from) = from {
                    qb.push(" AND due_date >= ").push_bind(from);
                }
                if let Some(to) = to {
                    qb.push(" AND due_date <= ").push_bind(to);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    Description,
    Status,
    Priority,
    DueDate,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "title" => Some(SortField::Title),
            "description" => Some(SortField::Description),
            "status" => Some(SortField::Status),
            "priority" => Some(SortField::Priority),
            "dueDate" | "due_date" => Some(SortField::DueDate),
            "createdAt" | "created_at" => Some(SortField::CreatedAt),
            "updatedAt" | "updated_at" => Some(SortField::UpdatedAt),
            _ => None,
        }
    }

    fn column(self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Description => "description",
            SortField::Status => "status",
            SortField::Priority => "priority",
            SortField::DueDate => "due_date",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for TaskSort {
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            order: SortOrder::Desc,
        }
    }
}

impl TaskSort {
    pub fn from_params(params: &TaskQueryParams) -> Result<Self> {
        let Some(raw) = present(&params.sort_by) else {
            return Ok(Self::default());
        };

        let field = SortField::parse(raw)
            .ok_or_else(|| AppError::Validation(format!("Invalid sort field: {raw}")))?;
        let order = if params.order.as_deref() == Some("asc") {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        };

        Ok(Self { field, order })
    }

    pub fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        let direction = match self.order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        // Column names come from a closed set, never from the request.
        qb.push(format!(" ORDER BY {} {}, id {}", self.field.column(), direction, direction));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    pub filter: TaskFilter,
    pub sort: TaskSort,
}

impl TaskQuery {
    pub fn parse(owner: Uuid, params: &TaskQueryParams, now: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            filter: TaskFilter::from_params(owner, params, now)?,
            sort: TaskSort::from_params(params)?,
        })
    }

    pub fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        self.filter.push_sql(qb);
        self.sort.push_sql(qb);
    }
}

#[cfg(test)]
impl TaskFilter {
    /// In-memory evaluation with the same semantics as the SQL rendering.
    pub fn matches(&self, task: &crate::task::task_models::Task) -> bool {
        if task.user_id != self.owner {
            return false;
        }
        match self.status {
            Some(Match::Is(status)) if task.status != status => return false,
            Some(Match::Nothing) => return false,
            _ => {}
        }
        match self.priority {
            Some(Match::Is(priority)) if task.priority != priority => return false,
            Some(Match::Nothing) => return false,
            _ => {}
        }
        if let Some(search) = &self.search {
            if !task.title.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }
        match self.category {
            Some(CategoryFilter::Is(id)) if task.category_id != Some(id) => return false,
            Some(CategoryFilter::Uncategorized) if task.category_id.is_some() => return false,
            _ => {}
        }
        match (self.due, task.due_date) {
            (DueFilter::Any, _) => true,
            (_, None) => false,
            (DueFilter::Overdue { now }, Some(due)) => {
                due < now && task.status != TaskStatus::Completed
            }
            (DueFilter::Between { from, to }, Some(due)) => {
                from.map_or(true, |f| due >= f) && to.map_or(true, |t| due <= t)
            }
        }
    }
}

#[cfg(test)]
impl TaskSort {
    pub fn compare(
        &self,
        a: &crate::task::task_models::Task,
        b: &crate::task::task_models::Task,
    ) -> std::cmp::Ordering {
        let ordering = match self.field {
            SortField::Title => a.title.cmp(&b.title),
            SortField::Description => a.description.cmp(&b.description),
            SortField::Status => a.status.as_str().cmp(b.status.as_str()),
            SortField::Priority => a.priority.as_str().cmp(b.priority.as_str()),
            SortField::DueDate => a.due_date.cmp(&b.due_date),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
        .then_with(|| a.id.cmp(&b.id));

        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}
