use serde_json::Value;

use super::{
    ApiClient,
    models::{NamedPayload, Project},
};
use crate::error::AppError;

impl ApiClient {
    pub async fn projects(&self, token: &str, workspace_id: &str) -> Result<Vec<Project>, AppError> {
        let path = format!("/workspaces/{workspace_id}/projects");

        self.send(self.get(&path, token), "Failed to fetch projects")
            .await
    }

    pub async fn create_project(
        &self,
        token: &str,
        workspace_id: &str,
        name: &str,
    ) -> Result<Value, AppError> {
        let path = format!("/workspaces/{workspace_id}/projects");
        let request = self.post(&path, token).json(&NamedPayload { name });

        self.send(request, "Failed to create project").await
    }

    pub async fn delete_project(
        &self,
        token: &str,
        workspace_id: &str,
        project_id: &str,
    ) -> Result<Value, AppError> {
        let path = format!("/workspaces/{workspace_id}/projects/{project_id}");

        self.send(self.delete(&path, token), "Failed to delete project")
            .await
    }
}
