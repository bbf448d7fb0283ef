use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::Value;

use super::{WorkspaceQuery, success};
use crate::{
    api::models::Project, error::AppError, session::Session, state::AppState, utils::required,
};

#[derive(Debug, Deserialize)]
pub struct NewProjectPayload {
    name: Option<String>,
    #[serde(alias = "workspaceId")]
    workspace_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectQuery {
    #[serde(alias = "workspaceId")]
    workspace_id: Option<String>,
    #[serde(alias = "projectId")]
    project_id: Option<String>,
}

pub async fn get_projects_handler(
    State(state): State<Arc<AppState>>,
    session: Session,
    WithRejection(Query(query), _): WithRejection<Query<WorkspaceQuery>, AppError>,
) -> Result<Json<Vec<Project>>, AppError> {
    let workspace_id = required("workspace_id", query.workspace_id.as_deref())?;

    let projects = state.api.projects(session.token(), workspace_id).await?;

    Ok(Json(projects))
}

pub async fn create_project_handler(
    State(state): State<Arc<AppState>>,
    session: Session,
    WithRejection(Json(payload), _): WithRejection<Json<NewProjectPayload>, AppError>,
) -> Result<Json<Value>, AppError> {
    let name = required("name", payload.name.as_deref())?;
    let workspace_id = required("workspace_id", payload.workspace_id.as_deref())?;

    let created = state
        .api
        .create_project(session.token(), workspace_id, name)
        .await?;

    Ok(Json(success(created)))
}

pub async fn delete_project_handler(
    State(state): State<Arc<AppState>>,
    session: Session,
    WithRejection(Query(query), _): WithRejection<Query<ProjectQuery>, AppError>,
) -> Result<Json<Value>, AppError> {
    let workspace_id = required("workspace_id", query.workspace_id.as_deref())?;
    let project_id = required("project_id", query.project_id.as_deref())?;

    let deleted = state
        .api
        .delete_project(session.token(), workspace_id, project_id)
        .await?;

    Ok(Json(success(deleted)))
}
