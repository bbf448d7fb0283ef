//! # GridWalk API
//!
//! Thin client over the upstream REST service at `GRIDWALK_API`. The upstream
//! owns every workspace, project and connection; we only attach the bearer
//! token, forward, and turn failures into [`AppError`].
//!
//! ## Failures
//! - network error: [`AppError::Request`]
//! - non-2xx: [`AppError::Upstream`] with the upstream status and a message from
//!   the body (`error` / `message` field, raw text, or the call's fallback)
//! - 2xx with a body we cannot read: [`AppError::Upstream`] as a 502
use axum::http::StatusCode;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{error::AppError, utils::message_from_body};

pub mod auth;
pub mod connections;
pub mod layers;
pub mod models;
pub mod projects;
pub mod workspaces;

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base: String,
}

impl ApiClient {
    pub fn new(http: Client, base: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn get(&self, path: &str, token: &str) -> RequestBuilder {
        self.http.get(self.url(path)).bearer_auth(token)
    }

    fn post(&self, path: &str, token: &str) -> RequestBuilder {
        self.http.post(self.url(path)).bearer_auth(token)
    }

    fn delete(&self, path: &str, token: &str) -> RequestBuilder {
        self.http.delete(self.url(path)).bearer_auth(token)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T, AppError> {
        let response = request.send().await?;

        read_json(response, fallback).await
    }
}

/// Reads a JSON body from a 2xx response, or builds the upstream error.
///
/// An empty 2xx body reads as JSON `null`.
pub async fn read_json<T: DeserializeOwned>(
    response: Response,
    fallback: &str,
) -> Result<T, AppError> {
    let status = response.status();
    let url = response.url().path().to_string();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        debug!(%status, url, "upstream error body: {body}");

        return Err(AppError::Upstream {
            status,
            message: message_from_body(&body, fallback),
        });
    }

    let bytes = response.bytes().await?;
    let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        &bytes
    };

    serde_json::from_slice(body).map_err(|e| AppError::Upstream {
        status: StatusCode::BAD_GATEWAY,
        message: format!("{fallback}: unreadable response ({e})"),
    })
}
