use crate::{
    auth, category,
    middleware::auth_middleware,
    state::AppState,
    task, user,
};
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        auth::auth_handlers::register,
        auth::auth_handlers::login,
        user::user_handlers::get_profile,
        user::user_handlers::update_profile,
        user::user_handlers::upload_profile_photo,
        user::user_handlers::change_password,
        user::user_handlers::delete_account,
        user::user_handlers::toggle_dark_mode,
        task::task_handlers::get_tasks,
        task::task_handlers::create_task,
        task::task_handlers::get_task,
        task::task_handlers::update_task,
        task::task_handlers::delete_task,
        task::task_handlers::update_task_status,
        task::task_handlers::export_tasks_csv,
        category::category_handlers::create_category,
        category::category_handlers::get_categories,
        category::category_handlers::get_category,
        category::category_handlers::update_category,
        category::category_handlers::delete_category,
    ),
    components(
        schemas(
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::AuthResponse,
            user::UserResponse,
            user::UpdateProfileRequest,
            user::ChangePasswordRequest,
            user::DarkModeResponse,
            user::UploadResponse,
            user::user_dto::UploadForm,
            task::Task,
            task::TaskStatus,
            task::TaskPriority,
            task::CreateTaskRequest,
            task::UpdateTaskRequest,
            task::UpdateTaskStatusRequest,
            category::Category,
            category::CategoryColor,
            category::CreateCategoryRequest,
            category::UpdateCategoryRequest,
        )
    ),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "user", description = "Profile management"),
        (name = "tasks", description = "Task management, filtering and CSV export"),
        (name = "category", description = "Task categories")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            )
        }
    }
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up")),
    tag = "health"
)]
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "QuickTask API alive..." }))
}

async fn welcome() -> &'static str {
    "Welcome to the QuickTask API"
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    // Protected routes (auth required)
    let user_routes = Router::new()
        .route(
            "/user/profile",
            get(user::get_profile).put(user::update_profile),
        )
        .route(
            "/user/profile/upload",
            post(user::upload_profile_photo)
                .layer(DefaultBodyLimit::max(state.config.max_upload_bytes)),
        )
        .route("/user/change-password", post(user::change_password))
        .route("/user/delete-account", delete(user::delete_account))
        .route("/user/toggle-mode", patch(user::toggle_dark_mode));

    let task_routes = Router::new()
        .route("/tasks", get(task::get_tasks).post(task::create_task))
        .route("/tasks/", get(task::get_tasks).post(task::create_task))
        .route("/tasks/export/csv", get(task::export_tasks_csv))
        .route("/tasks/:id", get(task::get_task))
        .route("/tasks/:id/update", put(task::update_task))
        .route("/tasks/:id/delete", delete(task::delete_task))
        .route("/tasks/:id/status", patch(task::update_task_status));

    let category_routes = Router::new()
        .route(
            "/category",
            get(category::get_categories).post(category::create_category),
        )
        .route(
            "/category/",
            get(category::get_categories).post(category::create_category),
        )
        .route("/category/:id", get(category::get_category))
        .route("/category/:id/update", put(category::update_category))
        .route("/category/:id/delete", delete(category::delete_category));

    let protected_routes = Router::new()
        .merge(user_routes)
        .merge(task_routes)
        .merge(category_routes)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public_routes)
        .merge(protected_routes)
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
