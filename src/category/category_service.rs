use crate::{
    category::{
        category_dto::{CreateCategoryRequest, UpdateCategoryRequest},
        category_models::{Category, CategoryColor},
        category_repository::CategoryRepository,
    },
    db::DbPool,
    error::{AppError, Result},
    task::task_repository::TaskRepository,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct CategoryService {
    db: DbPool,
    repo: CategoryRepository,
    tasks: TaskRepository,
}

fn category_not_found() -> AppError {
    AppError::NotFound("Category not found".into())
}

fn duplicate_name(e: AppError) -> AppError {
    match e {
        AppError::Conflict(_) => AppError::Conflict("Category already exists".into()),
        other => other,
    }
}

fn parse_color(raw: &str) -> Result<CategoryColor> {
    raw.parse().map_err(AppError::Validation)
}

impl CategoryService {
    pub fn new(db: DbPool, repo: CategoryRepository, tasks: TaskRepository) -> Self {
        Self { db, repo, tasks }
    }

    pub async fn create(&self, user_id: Uuid, payload: CreateCategoryRequest) -> Result<Category> {
        let name = payload.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Category name is required".into()));
        }

        if self.repo.find_by_name(user_id, name).await?.is_some() {
            return Err(AppError::Conflict("Category already exists".into()));
        }

        let color = payload
            .color
            .as_deref()
            .map(parse_color)
            .transpose()?
            .unwrap_or_default();

        self.repo
            .create(user_id, name, payload.description.as_deref().unwrap_or_default(), color)
            .await
            .map_err(duplicate_name)
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Category>> {
        self.repo.find_all(user_id).await
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Category> {
        self.repo
            .find_by_id(id, user_id)
            .await?
            .ok_or_else(category_not_found)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        payload: UpdateCategoryRequest,
    ) -> Result<Category> {
        let name = match payload.name.as_deref().map(str::trim) {
            Some("") => return Err(AppError::Validation("Category name cannot be empty".into())),
            other => other,
        };

        if let Some(name) = name {
            if let Some(existing) = self.repo.find_by_name(user_id, name).await? {
                if existing.id != id {
                    return Err(AppError::Conflict("Category already exists".into()));
                }
            }
        }

        let color = payload.color.as_deref().map(parse_color).transpose()?;

        self.repo
            .update(id, user_id, name, payload.description.as_deref(), color)
            .await
            .map_err(duplicate_name)?
            .ok_or_else(category_not_found)
    }

    /// Detaches the category from the owner's tasks, then deletes it, in one
    /// transaction. The tasks themselves are kept.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        if self.repo.find_by_id(id, user_id).await?.is_none() {
            return Err(category_not_found());
        }

        let mut tx = self.db.begin().await?;

        let detached = self.tasks.clear_category_with_tx(&mut tx, id, user_id).await?;

        if self.repo.delete_with_tx(&mut tx, id, user_id).await? == 0 {
            // Deleted concurrently; dropping `tx` rolls the detach back.
            return Err(category_not_found());
        }

        tx.commit().await?;

        tracing::info!(%user_id, category_id = %id, detached, "category deleted");
        Ok(())
    }
}
