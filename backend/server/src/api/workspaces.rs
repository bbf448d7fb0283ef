use serde_json::Value;

use super::{
    ApiClient,
    models::{MemberPayload, NamedPayload, Workspace},
};
use crate::error::AppError;

impl ApiClient {
    pub async fn workspaces(&self, token: &str) -> Result<Vec<Workspace>, AppError> {
        self.send(self.get("/workspaces", token), "Failed to fetch workspaces")
            .await
    }

    pub async fn create_workspace(&self, token: &str, name: &str) -> Result<Value, AppError> {
        let request = self
            .post("/workspaces", token)
            .json(&NamedPayload { name });

        self.send(request, "Failed to create workspace").await
    }

    pub async fn add_member(
        &self,
        token: &str,
        workspace_id: &str,
        email: &str,
        role: &str,
    ) -> Result<Value, AppError> {
        let request = self
            .post(&format!("/workspaces/{workspace_id}/members"), token)
            .json(&MemberPayload { email, role });

        self.send(request, "Failed to add workspace member").await
    }
}
