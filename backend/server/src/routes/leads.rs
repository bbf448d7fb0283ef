use std::sync::Arc;

use axum::{Json, extract::State};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::{
    database::{ContactMessage, Lead},
    error::AppError,
    state::AppState,
    utils::{required, valid_email},
};

const MAX_MESSAGE_CHARS: usize = 5000;

#[derive(Debug, Deserialize)]
pub struct EarlyAccessPayload {
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContactPayload {
    name: Option<String>,
    email: Option<String>,
    message: Option<String>,
}

pub async fn early_access_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(payload), _): WithRejection<Json<EarlyAccessPayload>, AppError>,
) -> Result<Json<Value>, AppError> {
    let email = valid_email(payload.email.as_deref())?;

    state.leads.put_lead(Lead::new(email)).await?;
    info!("Early access sign up stored");

    Ok(Json(json!({ "success": true })))
}

pub async fn contact_handler(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(payload), _): WithRejection<Json<ContactPayload>, AppError>,
) -> Result<Json<Value>, AppError> {
    let name = required("name", payload.name.as_deref())?;
    let email = valid_email(payload.email.as_deref())?;
    let message = required("message", payload.message.as_deref())?;

    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AppError::malformed(format!(
            "message must be at most {MAX_MESSAGE_CHARS} characters"
        )));
    }

    state
        .leads
        .put_contact(ContactMessage::new(name, email, message))
        .await?;
    info!("Contact message stored");

    Ok(Json(json!({ "success": true })))
}
