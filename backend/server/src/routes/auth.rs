use std::sync::Arc;

use axum::{Json, extract::State};
use axum_extra::extract::{CookieJar, WithRejection};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::{
    api::models::{Credentials, Profile, Registration},
    error::AppError,
    session::{Session, removal_cookie, session_cookie, session_token},
    state::AppState,
    utils::{required, valid_email},
};

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    email: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    email: Option<String>,
    password: Option<String>,
    #[serde(alias = "firstName")]
    first_name: Option<String>,
    #[serde(alias = "lastName")]
    last_name: Option<String>,
}

pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    WithRejection(Json(payload), _): WithRejection<Json<LoginPayload>, AppError>,
) -> Result<(CookieJar, Json<Value>), AppError> {
    let credentials = Credentials {
        email: valid_email(payload.email.as_deref())?.to_string(),
        password: required("password", payload.password.as_deref())?.to_string(),
    };

    let token = state.api.login(&credentials).await?;
    info!("User logged in");

    let cookie = session_cookie(token.api_key, state.config.secure_cookies());

    Ok((jar.add(cookie), Json(json!({ "success": true }))))
}

pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    WithRejection(Json(payload), _): WithRejection<Json<RegisterPayload>, AppError>,
) -> Result<(CookieJar, Json<Value>), AppError> {
    let registration = Registration {
        email: valid_email(payload.email.as_deref())?.to_string(),
        password: required("password", payload.password.as_deref())?.to_string(),
        first_name: required("first_name", payload.first_name.as_deref())?.to_string(),
        last_name: required("last_name", payload.last_name.as_deref())?.to_string(),
    };

    let token = state.api.register(&registration).await?;
    info!("User registered");

    let cookie = session_cookie(token.api_key, state.config.secure_cookies());

    Ok((jar.add(cookie), Json(json!({ "success": true }))))
}

/// Clears the cookie even when the upstream logout fails.
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<Value>) {
    if let Ok(token) = session_token(&jar) {
        if let Err(e) = state.api.logout(&token).await {
            warn!("Upstream logout failed: {e}");
        }
    }

    (jar.remove(removal_cookie()), Json(json!({ "success": true })))
}

pub async fn profile_handler(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<Profile>, AppError> {
    let profile = state.api.profile(session.token()).await?;

    Ok(Json(profile))
}
