use super::{
    ApiClient,
    models::{ConnectionSource, WorkspaceConnection},
};
use crate::error::AppError;

impl ApiClient {
    pub async fn connections(
        &self,
        token: &str,
        workspace_id: &str,
    ) -> Result<Vec<WorkspaceConnection>, AppError> {
        let path = format!("/workspaces/{workspace_id}/connections");

        self.send(self.get(&path, token), "Failed to fetch connections")
            .await
    }
}

/// Flattens connections into one row per source, keeping connection order.
pub fn flatten_sources(connections: Vec<WorkspaceConnection>) -> Vec<ConnectionSource> {
    connections
        .into_iter()
        .flat_map(|connection| {
            let WorkspaceConnection { id, layer, sources } = connection;

            sources.into_iter().map(move |source| ConnectionSource {
                connection_id: id.clone(),
                layer: layer.clone(),
                name: source.name,
            })
        })
        .collect()
}
