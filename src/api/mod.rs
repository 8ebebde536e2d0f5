mod error;
mod handlers;

pub use error::{ApiJson, ErrorBody};

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::service::ProjectService;

/// Router with permissive CORS.
pub fn create_router(service: ProjectService) -> Router {
    create_router_with_cors(service, CorsLayer::permissive())
}

pub fn create_router_with_cors(service: ProjectService, cors: CorsLayer) -> Router {
    let api = Router::new()
        // Projects
        .route("/projects", get(handlers::list_projects))
        .route("/projects", post(handlers::create_project))
        .route("/projects/{id}", get(handlers::get_project))
        .route("/projects/{id}", put(handlers::update_project))
        .route("/projects/{id}", delete(handlers::delete_project))
        // Tasks
        .route("/projects/{id}/tasks", post(handlers::add_task))
        .route(
            "/projects/{id}/tasks/{task_id}/status",
            put(handlers::set_task_status),
        )
        .route(
            "/projects/{id}/tasks/{task_id}",
            delete(handlers::remove_task),
        )
        // Members
        .route("/projects/{id}/members", post(handlers::add_member))
        // Finders
        .route("/projects/status/{status}", get(handlers::projects_by_status))
        .route("/projects/member/{member}", get(handlers::projects_by_member))
        .route("/projects/subject/{subject}", get(handlers::projects_by_subject))
        .route("/projects/search", get(handlers::search_projects))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(service)
}
