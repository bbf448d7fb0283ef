pub mod auth;
pub mod connections;
pub mod leads;
pub mod os_map;
pub mod projects;
pub mod storage;
pub mod tiles;
pub mod workspaces;

use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Default, Deserialize)]
pub struct WorkspaceQuery {
    #[serde(alias = "workspaceId")]
    pub workspace_id: Option<String>,
}

/// Success body for mutations: `{ "success": true, "data": ... }`.
pub fn success(data: Value) -> Value {
    if data.is_null() {
        json!({ "success": true })
    } else {
        json!({ "success": true, "data": data })
    }
}
