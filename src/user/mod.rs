pub mod user_models;
pub mod user_dto;
pub mod user_repository;
pub mod user_handlers;
pub mod user_service;
pub mod upload;

pub use user_models::UserResponse;
pub use user_dto::{ChangePasswordRequest, DarkModeResponse, UpdateProfileRequest, UploadResponse};
pub use user_handlers::{
    change_password, delete_account, get_profile, toggle_dark_mode, update_profile, upload_profile_photo,
};
