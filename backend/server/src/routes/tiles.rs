//! # Tile proxy
//!
//! `GET /api/tiles/{*path}?layers=x` becomes `GET {TILE_SERVER_URL}/x/{path}`.
//! The body is streamed through untouched. Status, content type and content
//! encoding are relayed as is, and every response gets a one hour cache header.
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{
        HeaderMap, HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONNECTION, CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE, COOKIE,
            HOST, VARY,
        },
    },
    response::Response,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use tracing::debug;

use crate::{error::AppError, state::AppState, utils::required};

pub const TILE_CACHE_CONTROL: &str = "public, max-age=3600";

/// Response headers copied back to the browser. The body stays encoded.
const RELAYED: [HeaderName; 3] = [CONTENT_TYPE, CONTENT_ENCODING, VARY];

const HOP_BY_HOP: [&str; 6] = [
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "upgrade",
];

#[derive(Debug, Deserialize)]
pub struct TileQuery {
    layers: Option<String>,
}

pub fn tile_url(base: &str, layers: &str, path: &str) -> String {
    format!(
        "{}/{}/{}",
        base.trim_end_matches('/'),
        layers.trim_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Request headers worth passing to the tile server.
///
/// Drops `host`, the session cookie, the body length and hop-by-hop headers.
pub fn forwarded_headers(headers: &HeaderMap) -> HeaderMap {
    let mut forwarded = headers.clone();

    for name in [HOST, COOKIE, CONNECTION, CONTENT_LENGTH] {
        forwarded.remove(name);
    }
    for name in HOP_BY_HOP {
        forwarded.remove(name);
    }

    forwarded
}

pub async fn tiles_handler(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    WithRejection(Query(query), _): WithRejection<Query<TileQuery>, AppError>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let layers = required("layers", query.layers.as_deref())?;
    let url = tile_url(&state.config.tile_server_url, layers, &path);
    debug!("Proxying tile request to {url}");

    let upstream = state
        .http
        .get(&url)
        .headers(forwarded_headers(&headers))
        .send()
        .await?;

    let status = upstream.status();
    let relayed: Vec<(HeaderName, HeaderValue)> = RELAYED
        .into_iter()
        .filter_map(|name| {
            let value = upstream.headers().get(&name)?.clone();
            Some((name, value))
        })
        .collect();

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;

    let response_headers = response.headers_mut();
    response_headers.insert(CACHE_CONTROL, HeaderValue::from_static(TILE_CACHE_CONTROL));
    for (name, value) in relayed {
        response_headers.insert(name, value);
    }

    Ok(response)
}
