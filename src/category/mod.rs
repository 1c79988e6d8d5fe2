pub mod category_models;
pub mod category_dto;
pub mod category_repository;
pub mod category_handlers;
pub mod category_service;

pub use category_models::{Category, CategoryColor};
pub use category_dto::{CreateCategoryRequest, UpdateCategoryRequest};
pub use category_handlers::{
    create_category, delete_category, get_categories, get_category, update_category,
};
