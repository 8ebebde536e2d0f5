use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use super::ApiJson;
use crate::error::Result;
use crate::models::*;
use crate::service::ProjectService;

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Projects
// ============================================================

pub async fn list_projects(State(service): State<ProjectService>) -> Result<Json<Vec<Project>>> {
    service.list().map(Json)
}

pub async fn get_project(
    State(service): State<ProjectService>,
    Path(id): Path<String>,
) -> Result<Json<Project>> {
    service.get(&id).map(Json)
}

pub async fn create_project(
    State(service): State<ProjectService>,
    ApiJson(input): ApiJson<ProjectInput>,
) -> Result<(StatusCode, Json<Project>)> {
    service
        .create(input)
        .map(|p| (StatusCode::CREATED, Json(p)))
}

pub async fn update_project(
    State(service): State<ProjectService>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<ProjectInput>,
) -> Result<Json<Project>> {
    service.update(&id, input).map(Json)
}

pub async fn delete_project(
    State(service): State<ProjectService>,
    Path(id): Path<String>,
) -> Result<Json<DeleteConfirmation>> {
    service.delete(&id)?;
    Ok(Json(DeleteConfirmation {
        deleted: true,
        message: "Project deleted".to_string(),
    }))
}

// ============================================================
// Tasks
// ============================================================

pub async fn add_task(
    State(service): State<ProjectService>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<TaskInput>,
) -> Result<(StatusCode, Json<Project>)> {
    service
        .add_task(&id, input)
        .map(|p| (StatusCode::CREATED, Json(p)))
}

pub async fn set_task_status(
    State(service): State<ProjectService>,
    Path((id, task_id)): Path<(String, String)>,
    ApiJson(input): ApiJson<TaskStatusInput>,
) -> Result<Json<Project>> {
    service
        .set_task_status(&id, &task_id, &input.status)
        .map(Json)
}

pub async fn remove_task(
    State(service): State<ProjectService>,
    Path((id, task_id)): Path<(String, String)>,
) -> Result<Json<Project>> {
    service.remove_task(&id, &task_id).map(Json)
}

// ============================================================
// Members
// ============================================================

pub async fn add_member(
    State(service): State<ProjectService>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<MemberInput>,
) -> Result<Json<Project>> {
    service.add_member(&id, &input.member).map(Json)
}

// ============================================================
// Finders
// ============================================================

/// Projects by stored status. An unrecognised status matches nothing.
pub async fn projects_by_status(
    State(service): State<ProjectService>,
    Path(status): Path<String>,
) -> Result<Json<Vec<Project>>> {
    match ProjectStatus::from_str(&status) {
        Some(status) => service.filter_by_status(status).map(Json),
        None => Ok(Json(Vec::new())),
    }
}

pub async fn projects_by_member(
    State(service): State<ProjectService>,
    Path(member): Path<String>,
) -> Result<Json<Vec<Project>>> {
    service.find_by_member(&member).map(Json)
}

pub async fn projects_by_subject(
    State(service): State<ProjectService>,
    Path(subject): Path<String>,
) -> Result<Json<Vec<Project>>> {
    service.find_by_subject(&subject).map(Json)
}

/// Query parameters for searching projects by title.
#[derive(Debug, Deserialize)]
pub struct SearchProjectsQuery {
    /// Fragment matched case-insensitively against the title.
    #[serde(default)]
    pub title: String,
}

pub async fn search_projects(
    State(service): State<ProjectService>,
    Query(query): Query<SearchProjectsQuery>,
) -> Result<Json<Vec<Project>>> {
    service.search_by_title(&query.title).map(Json)
}
