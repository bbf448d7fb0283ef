use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Workspace {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(alias = "workspaceId")]
    pub workspace_id: String,
    #[serde(alias = "uploadedBy", default)]
    pub uploaded_by: String,
    #[serde(alias = "createdAt", default)]
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Source {
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkspaceConnection {
    pub id: String,
    pub layer: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}

/// One row of the connections picker: a source plus the connection it lives in.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ConnectionSource {
    pub connection_id: String,
    pub layer: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: String,
    pub email: String,
    #[serde(alias = "firstName", default)]
    pub first_name: String,
    #[serde(alias = "lastName", default)]
    pub last_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkspaceMember {
    #[serde(alias = "userId", default)]
    pub user_id: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(rename = "apiKey", alias = "api_key", alias = "token")]
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct NamedPayload<'a> {
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct MemberPayload<'a> {
    pub email: &'a str,
    pub role: &'a str,
}
