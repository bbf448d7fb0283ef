use std::sync::Arc;

use axum::{Json, extract::State};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::Value;

use super::success;
use crate::{
    api::models::Workspace,
    error::AppError,
    session::Session,
    state::AppState,
    utils::{required, valid_email},
};

const DEFAULT_MEMBER_ROLE: &str = "read";

#[derive(Debug, Deserialize)]
pub struct NewWorkspacePayload {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewMemberPayload {
    #[serde(alias = "workspaceId")]
    workspace_id: Option<String>,
    email: Option<String>,
    role: Option<String>,
}

pub async fn workspaces_handler(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<Vec<Workspace>>, AppError> {
    let workspaces = state.api.workspaces(session.token()).await?;

    Ok(Json(workspaces))
}

pub async fn new_workspace_handler(
    State(state): State<Arc<AppState>>,
    session: Session,
    WithRejection(Json(payload), _): WithRejection<Json<NewWorkspacePayload>, AppError>,
) -> Result<Json<Value>, AppError> {
    let name = required("name", payload.name.as_deref())?;

    let created = state.api.create_workspace(session.token(), name).await?;

    Ok(Json(success(created)))
}

pub async fn add_member_handler(
    State(state): State<Arc<AppState>>,
    session: Session,
    WithRejection(Json(payload), _): WithRejection<Json<NewMemberPayload>, AppError>,
) -> Result<Json<Value>, AppError> {
    let workspace_id = required("workspace_id", payload.workspace_id.as_deref())?;
    let email = valid_email(payload.email.as_deref())?;
    let role = payload
        .role
        .as_deref()
        .map(str::trim)
        .filter(|role| !role.is_empty())
        .unwrap_or(DEFAULT_MEMBER_ROLE);

    let added = state
        .api
        .add_member(session.token(), workspace_id, email, role)
        .await?;

    Ok(Json(success(added)))
}
