//! Ordnance Survey basemap token.
//!
//! OAuth2 client credentials against the OS token endpoint using the project
//! key and secret. The token goes back to the browser untouched, it is never
//! cached here.
use std::sync::Arc;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::{api::read_json, error::AppError, state::AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct OsToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Value,
    #[serde(default)]
    pub issued_at: Value,
    #[serde(default)]
    pub token_type: Value,
}

pub async fn os_map_auth_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<OsToken>, AppError> {
    let config = &state.config;

    let (Some(key), Some(secret)) = (&config.os_project_api_key, &config.os_project_api_secret)
    else {
        return Err(AppError::Misconfigured(
            "OS_PROJECT_API_KEY and OS_PROJECT_API_SECRET must be set".to_string(),
        ));
    };

    let response = state
        .http
        .post(&config.os_token_url)
        .basic_auth(key, Some(secret))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await?;

    let token: OsToken = read_json(response, "Failed to fetch OS map token").await?;
    info!("Issued OS map token");

    Ok(Json(token))
}
