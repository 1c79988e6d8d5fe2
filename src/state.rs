use crate::auth::auth_service::AuthService;
use crate::category::category_service::CategoryService;
use crate::db::DbPool;
use crate::task::task_service::TaskService;
use crate::user::user_service::UserService;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub task_service: TaskService,
    pub category_service: CategoryService,
}

impl AppState {
    pub fn new(db: DbPool, config: Arc<Config>) -> Self {
        let user_repository = crate::user::user_repository::UserRepository::new(db.clone());
        let task_repository = crate::task::task_repository::TaskRepository::new(db.clone());
        let category_repository =
            crate::category::category_repository::CategoryRepository::new(db.clone());

        let auth_service = AuthService::new(
            user_repository.clone(),
            config.jwt_secret.clone(),
            config.jwt_expiration_hours,
        );
        let user_service = UserService::new(user_repository, config.upload_dir.clone());
        let task_service = TaskService::new(task_repository.clone(), category_repository.clone());
        let category_service =
            CategoryService::new(db, category_repository, task_repository);

        Self {
            config,
            auth_service,
            user_service,
            task_service,
            category_service,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            jwt_secret: std::env::var("JWT_SECRET")
                .expect("JWT_SECRET must be set"),
            jwt_expiration_hours: std::env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .expect("JWT_EXPIRATION_HOURS must be a number"),
            upload_dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "uploads".to_string())
                .into(),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| (5 * 1024 * 1024).to_string())
                .parse()
                .expect("MAX_UPLOAD_BYTES must be a number"),
        }
    }
}
