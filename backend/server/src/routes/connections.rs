use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use axum_extra::extract::WithRejection;

use super::WorkspaceQuery;
use crate::{
    api::{
        connections::flatten_sources,
        models::{ConnectionSource, WorkspaceConnection},
    },
    error::AppError,
    session::Session,
    state::AppState,
    utils::required,
};

pub async fn connections_handler(
    State(state): State<Arc<AppState>>,
    session: Session,
    WithRejection(Query(query), _): WithRejection<Query<WorkspaceQuery>, AppError>,
) -> Result<Json<Vec<WorkspaceConnection>>, AppError> {
    let workspace_id = required("workspace_id", query.workspace_id.as_deref())?;

    let connections = state.api.connections(session.token(), workspace_id).await?;

    Ok(Json(connections))
}

/// Same upstream call, one row per source for the layer picker.
pub async fn connections_modal_handler(
    State(state): State<Arc<AppState>>,
    session: Session,
    WithRejection(Query(query), _): WithRejection<Query<WorkspaceQuery>, AppError>,
) -> Result<Json<Vec<ConnectionSource>>, AppError> {
    let workspace_id = required("workspace_id", query.workspace_id.as_deref())?;

    let connections = state.api.connections(session.token(), workspace_id).await?;

    Ok(Json(flatten_sources(connections)))
}
