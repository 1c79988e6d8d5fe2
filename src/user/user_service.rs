use crate::{
    auth::{hash_password, verify_password},
    error::{AppError, Result},
    user::{
        upload,
        user_dto::{ChangePasswordRequest, UpdateProfileRequest},
        user_models::UserResponse,
        user_repository::UserRepository,
    },
};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Clone)]
pub struct UserService {
    user_repository: UserRepository,
    upload_dir: PathBuf,
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

impl UserService {
    pub fn new(user_repository: UserRepository, upload_dir: PathBuf) -> Self {
        Self {
            user_repository,
            upload_dir,
        }
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<UserResponse> {
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(user_not_found)?;

        Ok(user.into())
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        payload: UpdateProfileRequest,
    ) -> Result<UserResponse> {
        let current = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(user_not_found)?;

        let name = payload.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
        let profile_photo = payload.profile_photo.as_deref().filter(|p| !p.is_empty());

        let user = self
            .user_repository
            .update_profile(user_id, name, profile_photo, payload.dark_mode)
            .await?
            .ok_or_else(user_not_found)?;

        if profile_photo.is_some() && current.profile_photo != user.profile_photo {
            upload::remove_image(&self.upload_dir, &current.profile_photo).await;
        }

        Ok(user.into())
    }

    pub async fn store_photo(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        upload::store_image(&self.upload_dir, filename, bytes).await
    }

    pub async fn change_password(&self, user_id: Uuid, payload: ChangePasswordRequest) -> Result<()> {
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(user_not_found)?;

        if !verify_password(&payload.current_password, &user.password_hash)? {
            return Err(AppError::Authentication("Current password is incorrect".to_string()));
        }

        let password_hash = hash_password(&payload.new_password)?;
        self.user_repository.update_password(user_id, &password_hash).await?;

        tracing::info!(%user_id, "password changed");
        Ok(())
    }

    pub async fn delete_account(&self, user_id: Uuid) -> Result<()> {
        let user = self
            .user_repository
            .delete(user_id)
            .await?
            .ok_or_else(user_not_found)?;

        upload::remove_image(&self.upload_dir, &user.profile_photo).await;

        tracing::info!(%user_id, "account deleted");
        Ok(())
    }

    pub async fn toggle_dark_mode(&self, user_id: Uuid) -> Result<bool> {
        self.user_repository
            .toggle_dark_mode(user_id)
            .await?
            .ok_or_else(user_not_found)
    }
}
