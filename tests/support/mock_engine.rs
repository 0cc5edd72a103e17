// ABOUTME: In-process mock engine serving config and system endpoints over TCP.
// ABOUTME: Records every request so tests can compare exactly what was sent.

use axum::Json;
use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::{Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use futures::StreamExt;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

pub const API_PREFIX: &str = "/v1.41";
const TIMESTAMP: &str = "2024-01-01T00:00:00.000000000Z";
const OUT_OF_SEQUENCE: &str = "rpc error: code = Unknown desc = update out of sequence";

/// One request as the engine saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Recorded {
    /// Method, path and query: what identifies the API call.
    pub fn call(&self) -> (String, String, Option<String>) {
        (self.method.clone(), self.path.clone(), self.query.clone())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json_body(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body should be JSON")
    }
}

#[derive(Default)]
struct Store {
    configs: BTreeMap<String, Value>,
    next_id: u64,
    index: u64,
    events: Vec<Value>,
}

#[derive(Clone, Default)]
struct MockState {
    store: Arc<Mutex<Store>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

/// A running mock engine bound to a random local port.
pub struct MockEngine {
    addr: SocketAddr,
    state: MockState,
}

impl MockEngine {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock engine");
        let addr = listener.local_addr().expect("mock engine address");
        let state = MockState::default();
        let app = router(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock engine server");
        });

        Self { addr, state }
    }

    /// Base URL including the API version prefix.
    pub fn base_url(&self) -> String {
        format!("http://{}{}", self.addr, API_PREFIX)
    }

    /// Base URL without a version prefix.
    pub fn root_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests()
            .pop()
            .expect("mock engine received no requests")
    }

    pub fn clear_requests(&self) {
        self.state.requests.lock().clear();
    }

    pub fn config_count(&self) -> usize {
        self.state.store.lock().configs.len()
    }
}

fn router(state: MockState) -> Router {
    let api = Router::new()
        .route("/configs", get(list_configs))
        .route("/configs/create", post(create_config))
        .route("/configs/{id}", get(inspect_config).delete(delete_config))
        .route("/configs/{id}/update", post(update_config))
        .route("/_ping", get(ping))
        .route("/version", get(version))
        .route("/info", get(info))
        .route("/events", get(events))
        .route("/broken", get(broken));

    Router::new()
        .nest(API_PREFIX, api.clone())
        .merge(api)
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

async fn record(State(state): State<MockState>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    state.requests.lock().push(Recorded {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        headers: parts.headers.clone(),
        body: body.clone(),
    });

    next.run(Request::from_parts(parts, Body::from(body))).await
}

fn engine_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn config_event(action: &str, id: &str, name: &str) -> Value {
    json!({
        "Type": "config",
        "Action": action,
        "Actor": { "ID": id, "Attributes": { "name": name } },
        "scope": "swarm",
        "time": 1_700_000_000,
        "timeNano": 1_700_000_000_000_000_000i64,
    })
}

fn matches_filters(config: &Value, filters: &BTreeMap<String, Vec<String>>) -> bool {
    filters.iter().all(|(key, values)| match key.as_str() {
        "id" => values.iter().any(|v| config["ID"] == v.as_str()),
        "name" | "names" => values.iter().any(|v| config["Spec"]["Name"] == v.as_str()),
        "label" => values.iter().all(|v| {
            let labels = &config["Spec"]["Labels"];
            match v.split_once('=') {
                Some((k, expected)) => labels[k] == expected,
                None => !labels[v.as_str()].is_null(),
            }
        }),
        _ => false,
    })
}

async fn list_configs(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let filters: BTreeMap<String, Vec<String>> = match params.get("filters") {
        Some(raw) => match serde_json::from_str(raw) {
            Ok(filters) => filters,
            Err(_) => return engine_error(StatusCode::BAD_REQUEST, "invalid filters"),
        },
        None => BTreeMap::new(),
    };

    let store = state.store.lock();
    let configs: Vec<Value> = store
        .configs
        .values()
        .filter(|c| matches_filters(c, &filters))
        .cloned()
        .collect();
    Json(configs).into_response()
}

async fn create_config(State(state): State<MockState>, Json(spec): Json<Value>) -> Response {
    let Some(name) = spec.get("Name").and_then(Value::as_str).map(str::to_string) else {
        return engine_error(StatusCode::BAD_REQUEST, "config name is required");
    };

    let mut store = state.store.lock();
    if store
        .configs
        .values()
        .any(|c| c["Spec"]["Name"] == name.as_str())
    {
        return engine_error(
            StatusCode::CONFLICT,
            &format!("config {} already exists", name),
        );
    }

    store.next_id += 1;
    store.index += 1;
    let id = format!("cfg{:022}", store.next_id);
    let index = store.index;

    store.configs.insert(
        id.clone(),
        json!({
            "ID": id,
            "Version": { "Index": index },
            "CreatedAt": TIMESTAMP,
            "UpdatedAt": TIMESTAMP,
            "Spec": spec,
        }),
    );
    store.events.push(config_event("create", &id, &name));

    (
        StatusCode::CREATED,
        Json(json!({ "ID": id, "Version": { "Index": index } })),
    )
        .into_response()
}

async fn inspect_config(State(state): State<MockState>, Path(id): Path<String>) -> Response {
    match state.store.lock().configs.get(&id) {
        Some(config) => Json(config.clone()).into_response(),
        None => engine_error(
            StatusCode::NOT_FOUND,
            &format!("config {} not found", id),
        ),
    }
}

async fn delete_config(State(state): State<MockState>, Path(id): Path<String>) -> Response {
    let mut store = state.store.lock();
    match store.configs.remove(&id) {
        Some(config) => {
            let name = config["Spec"]["Name"].as_str().unwrap_or_default().to_string();
            store.events.push(config_event("remove", &id, &name));
            StatusCode::NO_CONTENT.into_response()
        }
        None => engine_error(
            StatusCode::NOT_FOUND,
            &format!("config {} not found", id),
        ),
    }
}

async fn update_config(
    State(state): State<MockState>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    Json(spec): Json<Value>,
) -> Response {
    let Some(version) = params.get("version").and_then(|v| v.parse::<u64>().ok()) else {
        return engine_error(StatusCode::BAD_REQUEST, "invalid or missing version");
    };

    let mut store = state.store.lock();
    let current = match store.configs.get(&id) {
        Some(config) => config["Version"]["Index"].as_u64().unwrap_or_default(),
        None => {
            return engine_error(
                StatusCode::NOT_FOUND,
                &format!("config {} not found", id),
            );
        }
    };

    // The engine reports a stale version as a 500, not a 409.
    if version != current {
        return engine_error(StatusCode::INTERNAL_SERVER_ERROR, OUT_OF_SEQUENCE);
    }

    store.index += 1;
    let index = store.index;
    let name = spec["Name"].as_str().unwrap_or_default().to_string();
    if let Some(config) = store.configs.get_mut(&id) {
        config["Version"] = json!({ "Index": index });
        config["Spec"] = spec;
        config["UpdatedAt"] = json!(TIMESTAMP);
    }
    store.events.push(config_event("update", &id, &name));

    StatusCode::OK.into_response()
}

async fn ping() -> &'static str {
    "OK"
}

async fn version() -> Json<Value> {
    Json(json!({
        "Version": "20.10.24",
        "ApiVersion": "1.41",
        "MinAPIVersion": "1.12",
        "GitCommit": "5d6db84",
        "GoVersion": "go1.19.7",
        "Os": "linux",
        "Arch": "amd64",
        "KernelVersion": "6.1.0",
    }))
}

async fn info() -> Json<Value> {
    Json(json!({
        "ID": "7TRN:IPZB:QYBB:VPBQ:UWYJ:KDDP:6ZEW:YUQH:4VEQ:MMBU:SQRK:MBEY",
        "Name": "mock-engine",
        "ServerVersion": "20.10.24",
        "Containers": 3,
        "ContainersRunning": 1,
        "Images": 7,
        "OperatingSystem": "Debian GNU/Linux 12 (bookworm)",
        "Architecture": "x86_64",
        "NCPU": 4,
        "MemTotal": 8_589_934_592u64,
        "Swarm": { "LocalNodeState": "active", "ControlAvailable": true },
        "Plugins": { "Volume": ["local"] },
    }))
}

/// Replays recorded events, then holds the connection open unless `until` is set.
async fn events(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let lines: Vec<Result<Bytes, std::io::Error>> = state
        .store
        .lock()
        .events
        .iter()
        .map(|event| Ok(Bytes::from(format!("{}\n", event))))
        .collect();

    let replay = futures::stream::iter(lines);
    let body = if params.contains_key("until") {
        Body::from_stream(replay)
    } else {
        Body::from_stream(replay.chain(futures::stream::pending()))
    };

    (StatusCode::OK, [("content-type", "application/json")], body).into_response()
}

async fn broken() -> Response {
    (
        StatusCode::OK,
        [("content-type", "application/json")],
        "{not json",
    )
        .into_response()
}
