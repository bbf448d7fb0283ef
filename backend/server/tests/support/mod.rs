#![allow(dead_code)]

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Multipart, Path, State},
    http::{
        HeaderMap, StatusCode,
        header::{ACCEPT_ENCODING, AUTHORIZATION},
    },
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use gridwalk_server::{
    build_router,
    config::{Config, Environment},
    database::{ContactMessage, Lead, LeadStore},
    error::AppError,
    state::AppState,
    storage::ObjectStore,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const TOKEN: &str = "tok-1";

/// Leading bytes of a gzip stream.
pub const GZIP_TILE: [u8; 4] = [31, 139, 8, 0];

#[derive(Default)]
pub struct FakeObjects {
    pub puts: Mutex<Vec<(String, String, Bytes)>>,
}

#[async_trait]
impl ObjectStore for FakeObjects {
    fn bucket(&self) -> &str {
        "test-bucket"
    }

    async fn put_object(&self, key: &str, content_type: &str, body: Bytes) -> Result<(), AppError> {
        self.puts
            .lock()
            .unwrap()
            .push((key.to_string(), content_type.to_string(), body));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeLeads {
    pub leads: Mutex<Vec<Lead>>,
    pub contacts: Mutex<Vec<ContactMessage>>,
}

#[async_trait]
impl LeadStore for FakeLeads {
    async fn put_lead(&self, lead: Lead) -> Result<(), AppError> {
        self.leads.lock().unwrap().push(lead);
        Ok(())
    }

    async fn put_contact(&self, contact: ContactMessage) -> Result<(), AppError> {
        self.contacts.lock().unwrap().push(contact);
        Ok(())
    }
}

/// What the fake upstream saw.
#[derive(Clone, Default)]
pub struct Seen {
    pub authorizations: Arc<Mutex<Vec<String>>>,
    pub paths: Arc<Mutex<Vec<String>>>,
    pub chunks: Arc<Mutex<Vec<Value>>>,
}

impl Seen {
    fn record(&self, headers: &HeaderMap, path: String) {
        if let Some(value) = headers.get(AUTHORIZATION) {
            self.authorizations
                .lock()
                .unwrap()
                .push(value.to_str().unwrap().to_string());
        }
        self.paths.lock().unwrap().push(path);
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }

    pub fn authorizations(&self) -> Vec<String> {
        self.authorizations.lock().unwrap().clone()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some(format!("Bearer {TOKEN}").as_str())
}

fn denied() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Authentication failed" })),
    )
        .into_response()
}

async fn login(State(seen): State<Seen>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    seen.record(&headers, "/login".to_string());

    if body["password"] == "secret" {
        Json(json!({ "apiKey": TOKEN })).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid credentials" })),
        )
            .into_response()
    }
}

async fn register(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    seen.record(&headers, "/register".to_string());

    if body["first_name"] != "Grace" || body["last_name"] != "Hopper" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Name is required" })),
        )
            .into_response();
    }

    Json(json!({ "apiKey": TOKEN })).into_response()
}

async fn logout(State(seen): State<Seen>, headers: HeaderMap) -> StatusCode {
    seen.record(&headers, "/logout".to_string());
    StatusCode::NO_CONTENT
}

async fn profile(State(seen): State<Seen>, headers: HeaderMap) -> Response {
    seen.record(&headers, "/profile".to_string());

    if !authorized(&headers) {
        return denied();
    }

    Json(json!({
        "id": "u1",
        "email": "ada@example.com",
        "firstName": "Ada",
        "lastName": "Lovelace"
    }))
    .into_response()
}

async fn workspaces(State(seen): State<Seen>, headers: HeaderMap) -> Response {
    seen.record(&headers, "/workspaces".to_string());

    if !authorized(&headers) {
        return denied();
    }

    Json(json!([
        { "id": "w1", "name": "Coastal survey" },
        { "id": "w2", "name": "Rail corridor" }
    ]))
    .into_response()
}

async fn add_member(
    State(seen): State<Seen>,
    Path(workspace_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    seen.record(&headers, format!("/workspaces/{workspace_id}/members"));

    if !authorized(&headers) {
        return denied();
    }

    Json(json!({
        "workspace_id": workspace_id,
        "email": body["email"],
        "role": body["role"]
    }))
    .into_response()
}

async fn create_workspace(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    seen.record(&headers, "/workspaces".to_string());

    if !authorized(&headers) {
        return denied();
    }

    Json(json!({ "id": "w2", "name": body["name"] })).into_response()
}

async fn projects(
    State(seen): State<Seen>,
    Path(workspace_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    seen.record(&headers, format!("/workspaces/{workspace_id}/projects"));

    if !authorized(&headers) {
        return denied();
    }
    if workspace_id == "gone" {
        return (StatusCode::NOT_FOUND, "Workspace not found").into_response();
    }

    Json(json!([{
        "id": "p1",
        "name": "Flood zones",
        "workspace_id": workspace_id,
        "uploaded_by": "u1",
        "created_at": "2024-05-01T10:00:00Z"
    }]))
    .into_response()
}

async fn delete_project(
    State(seen): State<Seen>,
    Path((workspace_id, project_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    seen.record(
        &headers,
        format!("/workspaces/{workspace_id}/projects/{project_id}"),
    );

    if !authorized(&headers) {
        return denied();
    }

    StatusCode::NO_CONTENT.into_response()
}

async fn connections(
    State(seen): State<Seen>,
    Path(workspace_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    seen.record(&headers, format!("/workspaces/{workspace_id}/connections"));

    if !authorized(&headers) {
        return denied();
    }

    Json(json!([
        { "id": "c1", "layer": "roads", "sources": [{ "name": "a_roads" }, { "name": "b_roads" }] },
        { "id": "c2", "layer": "parcels", "sources": [{ "name": "titles" }] }
    ]))
    .into_response()
}

async fn upload_layer(
    State(seen): State<Seen>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    seen.record(&headers, "/upload_layer".to_string());

    if !authorized(&headers) {
        return denied();
    }

    let mut fields = serde_json::Map::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap().to_string();
        if name == "file" {
            let len = field.bytes().await.unwrap().len();
            fields.insert("file_len".to_string(), json!(len));
        } else {
            fields.insert(name, json!(field.text().await.unwrap()));
        }
    }

    let chunk = Value::Object(fields);
    seen.chunks.lock().unwrap().push(chunk.clone());

    Json(json!({ "success": true, "received": chunk })).into_response()
}

async fn tiles(State(seen): State<Seen>, Path(rest): Path<String>, headers: HeaderMap) -> Response {
    seen.record(&headers, format!("/tiles/{rest}"));

    let gzip = headers
        .get(ACCEPT_ENCODING)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("gzip"));

    if rest.contains("compressed") && gzip {
        return (
            StatusCode::OK,
            [
                ("content-type", "application/x-protobuf"),
                ("content-encoding", "gzip"),
                ("vary", "accept-encoding"),
            ],
            GZIP_TILE.to_vec(),
        )
            .into_response();
    }

    if rest.contains("missing") {
        return (
            StatusCode::NOT_FOUND,
            [("content-type", "text/plain")],
            "no such tile",
        )
            .into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "application/x-protobuf")],
        vec![1u8, 2, 3, 4],
    )
        .into_response()
}

async fn os_token(State(seen): State<Seen>, headers: HeaderMap, body: String) -> Response {
    seen.record(&headers, "/oauth/token".to_string());

    let basic = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if !basic.starts_with("Basic ") || body != "grant_type=client_credentials" {
        return (StatusCode::BAD_REQUEST, "bad token request").into_response();
    }

    Json(json!({
        "access_token": "os-token",
        "expires_in": "299",
        "issued_at": "1700000000000",
        "token_type": "BearerToken"
    }))
    .into_response()
}

async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

pub async fn spawn_upstream() -> (String, Seen) {
    let seen = Seen::default();

    let app = Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/logout", post(logout))
        .route("/profile", get(profile))
        .route("/workspaces", get(workspaces).post(create_workspace))
        .route("/workspaces/{id}/members", post(add_member))
        .route("/workspaces/{id}/projects", get(projects))
        .route(
            "/workspaces/{id}/projects/{project_id}",
            delete(delete_project),
        )
        .route("/workspaces/{id}/connections", get(connections))
        .route("/upload_layer", post(upload_layer))
        .route("/tiles/{*rest}", get(tiles))
        .route("/oauth/token", post(os_token))
        .with_state(seen.clone());

    (format!("http://{}", spawn(app).await), seen)
}

pub fn test_config(upstream: &str) -> Config {
    Config {
        port: 0,
        environment: Environment::Development,
        gridwalk_api: upstream.to_string(),
        tile_server_url: format!("{upstream}/tiles"),
        aws_region: "eu-west-2".to_string(),
        s3_bucket: "test-bucket".to_string(),
        dynamodb_landing_table: "landing".to_string(),
        dynamodb_table: "contact".to_string(),
        os_token_url: format!("{upstream}/oauth/token"),
        os_project_api_key: Some("key".to_string()),
        os_project_api_secret: Some("secret".to_string()),
    }
}

pub struct TestApp {
    pub base: String,
    pub client: reqwest::Client,
    pub seen: Seen,
    pub objects: Arc<FakeObjects>,
    pub leads: Arc<FakeLeads>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.post(self.url(path))
    }

    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.delete(self.url(path))
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

pub async fn spawn_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let (upstream, seen) = spawn_upstream().await;
    let mut config = test_config(&upstream);
    configure(&mut config);

    let objects = Arc::new(FakeObjects::default());
    let leads = Arc::new(FakeLeads::default());
    let state = AppState::with_stores(config, objects.clone(), leads.clone());

    let address = spawn(build_router(state)).await;

    TestApp {
        base: format!("http://{address}"),
        client: reqwest::Client::new(),
        seen,
        objects,
        leads,
    }
}

pub fn session() -> String {
    format!("sid={TOKEN}")
}
