//! Documentation of the GridWalk back end.
//!
//! GridWalk is a geospatial collaboration tool. This crate is the server side of
//! its web front end: session cookie plumbing plus thin routes that forward to
//! the GridWalk API, the tile server, S3 and DynamoDB.
//!
//!
//!
//! # General Infrastructure
//! - Browser talks to this server only, never to the upstreams directly
//! - Every authenticated route reads the `sid` cookie and forwards it as a bearer token
//! - The GridWalk API owns all business data, nothing is stored or cached here
//! - S3 and DynamoDB are reached through the AWS SDK using the default credential chain
//!
//!
//!
//! # Routes
//!
//! Auth
//! - `POST /api/auth/login`, `POST /api/auth/register`: set the `sid` cookie
//! - `POST /api/auth/logout`: clear it
//! - `GET /api/profile`
//!
//! Workspaces and projects
//! - `GET /api/workspaces`, `POST /api/new_workspace`, `POST /api/workspaces/members`
//! - `GET /api/get_projects`, `POST /api/project`, `DELETE /api/project`
//! - `GET /api/connections`, `GET /api/connections-modal`
//!
//! Files and maps
//! - `POST /api/upload-layer`: target of the chunk uploader
//! - `POST /api/remote-file-s3-upload`, `POST /api/remote-file-s3-upload/stream`
//! - `GET /api/tiles/{*path}`
//! - `POST /api/os-map-auth`
//!
//! Landing page
//! - `POST /api/early-access`, `POST /api/contact`
//!
//!
//!
//! # Errors
//!
//! Every failure leaves a handler as [`error::AppError`] and reaches the client
//! as `{"success": false, "error": "..."}`.
//! - bad input: 400
//! - no session, or the upstream rejected it: 401
//! - other upstream 4xx: passed through
//! - everything else: 500
//!
//! Nothing is retried.
//!
//!
//!
//! # Setup
//!
//! Run locally.
//! ```sh
//! GRIDWALK_API=http://localhost:3000 RUST_LOG=info cargo run -p gridwalk
//! ```
//!
//! Upload a layer through a running server.
//! ```sh
//! cargo run -p gridwalk-upload -- ./parcels.geojson <workspace id> --sid <token>
//! ```
use std::{io, sync::Arc, time::Duration};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{get, post},
};
use tokio::{net::TcpListener, signal::ctrl_c};
#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod routes;
pub mod session;
pub mod state;
pub mod storage;
pub mod utils;

use routes::{
    auth::{login_handler, logout_handler, profile_handler, register_handler},
    connections::{connections_handler, connections_modal_handler},
    leads::{contact_handler, early_access_handler},
    os_map::os_map_auth_handler,
    projects::{create_project_handler, delete_project_handler, get_projects_handler},
    storage::{
        CHUNK_BODY_LIMIT, S3_BODY_LIMIT, s3_stream_upload_handler, s3_upload_handler,
        upload_layer_handler,
    },
    tiles::tiles_handler,
    workspaces::{add_member_handler, new_workspace_handler, workspaces_handler},
};
use state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/logout", post(logout_handler))
        .route("/api/profile", get(profile_handler))
        .route("/api/workspaces", get(workspaces_handler))
        .route("/api/new_workspace", post(new_workspace_handler))
        .route("/api/workspaces/members", post(add_member_handler))
        .route("/api/get_projects", get(get_projects_handler))
        .route(
            "/api/project",
            post(create_project_handler).delete(delete_project_handler),
        )
        .route("/api/connections", get(connections_handler))
        .route("/api/connections-modal", get(connections_modal_handler))
        .route(
            "/api/upload-layer",
            post(upload_layer_handler).layer(DefaultBodyLimit::max(CHUNK_BODY_LIMIT)),
        )
        .route(
            "/api/remote-file-s3-upload",
            post(s3_upload_handler).layer(DefaultBodyLimit::max(S3_BODY_LIMIT)),
        )
        .route(
            "/api/remote-file-s3-upload/stream",
            post(s3_stream_upload_handler).layer(DefaultBodyLimit::max(S3_BODY_LIMIT)),
        )
        .route("/api/tiles/{*path}", get(tiles_handler))
        .route("/api/os-map-auth", post(os_map_auth_handler))
        .route("/api/early-access", post(early_access_handler))
        .route("/api/contact", post(contact_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() -> io::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    let app = build_router(state);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
