//! In-process stand-in for the clinic backend.
#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use clinic_dashboard::session::ChannelNavigator;
use clinic_dashboard::storage::{MemoryTokenStore, TokenStore};
use clinic_dashboard::{AppConfig, AppContext, Route};
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::UnboundedReceiver;

pub const ADMIN_EMAIL: &str = "admin@ia.com";
pub const ADMIN_PASSWORD: &str = "123456789";

#[derive(Default)]
pub struct Backend {
    hits: AtomicUsize,
    valid_tokens: Mutex<HashSet<String>>,
    pub seen_tokens: Mutex<Vec<Option<String>>>,
    active: Mutex<bool>,
    conversations: Mutex<HashMap<String, Value>>,
    gateway_down: AtomicBool,
}

impl Backend {
    pub fn new() -> Arc<Self> {
        let backend = Backend::default();
        backend.accept_token("abc");
        {
            let mut convs = backend.conversations.lock().unwrap();
            for (id, name) in [("1", "Maria"), ("2", "João")] {
                convs.insert(
                    id.to_string(),
                    json!({
                        "id": id,
                        "name": name,
                        "reviewed": false,
                        "messages": [
                            {"id": format!("{id}-a"), "content": "Bom dia, quero remarcar", "timestamp": "08:00", "sender": "user"},
                            {"id": format!("{id}-b"), "content": "Claro! Qual horário?", "timestamp": "08:01", "sender": "clinic"}
                        ]
                    }),
                );
            }
        }
        Arc::new(backend)
    }

    pub fn accept_token(&self, token: &str) {
        self.valid_tokens.lock().unwrap().insert(token.to_string());
    }

    /// Auth endpoints answer like a proxy whose upstream is gone.
    pub fn break_gateway(&self) {
        self.gateway_down.store(true, Ordering::SeqCst);
    }

    fn gateway_reply(&self) -> Option<Response> {
        self.gateway_down.load(Ordering::SeqCst).then(|| {
            (StatusCode::BAD_GATEWAY, [(header::CONTENT_TYPE, "text/html")], "<html>502 Bad Gateway</html>")
                .into_response()
        })
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn is_active(&self) -> bool {
        *self.active.lock().unwrap()
    }

    fn hit(&self) {
        self.hits.fetch_add(1, Ordering::SeqCst);
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), Response> {
        self.hit();
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_string);
        self.seen_tokens.lock().unwrap().push(token.clone());
        match token {
            Some(t) if self.valid_tokens.lock().unwrap().contains(&t) => Ok(()),
            _ => Err((StatusCode::UNAUTHORIZED, Json(json!({"message": "Unauthorized"}))).into_response()),
        }
    }
}

type Shared = State<Arc<Backend>>;

async fn login(State(b): Shared, Json(body): Json<Value>) -> Response {
    b.hit();
    if let Some(resp) = b.gateway_reply() {
        return resp;
    }
    if body["email"] == ADMIN_EMAIL && body["password"] == ADMIN_PASSWORD {
        Json(json!({"accessToken": "abc"})).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"error": "Email ou senha incorretos"}))).into_response()
    }
}

async fn register(State(b): Shared, Json(body): Json<Value>) -> Response {
    b.hit();
    if let Some(resp) = b.gateway_reply() {
        return resp;
    }
    if body["email"] == "taken@ia.com" {
        return (StatusCode::CONFLICT, Json(json!({"error": "EMAIL_EXISTS"}))).into_response();
    }
    let user = json!({"id": "u1", "name": body["name"], "email": body["email"], "role": "staff"});
    (StatusCode::CREATED, Json(json!({"user": user}))).into_response()
}

async fn all_messages(State(b): Shared, headers: HeaderMap) -> Response {
    if let Err(resp) = b.authorize(&headers) {
        return resp;
    }
    let convs = b.conversations.lock().unwrap();
    let mut list: Vec<Value> = convs.values().cloned().collect();
    list.sort_by(|x, y| x["id"].as_str().cmp(&y["id"].as_str()));
    let pending = list.iter().filter(|c| c["reviewed"] == false).count();
    Json(json!({
        "metrics": {"totalRecebidas": 2, "totalEnviadas": 2, "taxaResposta": 100, "pendentes": pending},
        "conversations": list
    }))
    .into_response()
}

async fn one_message(State(b): Shared, Path(id): Path<String>, headers: HeaderMap) -> Response {
    if let Err(resp) = b.authorize(&headers) {
        return resp;
    }
    match b.conversations.lock().unwrap().get(&id) {
        Some(conv) => Json(conv.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"message": "Conversa não encontrada"}))).into_response(),
    }
}

async fn system_status(State(b): Shared, headers: HeaderMap) -> Response {
    if let Err(resp) = b.authorize(&headers) {
        return resp;
    }
    Json(json!({"active": b.is_active()})).into_response()
}

async fn set_system(State(b): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(resp) = b.authorize(&headers) {
        return resp;
    }
    let state = body["state"].as_bool().unwrap_or(false);
    *b.active.lock().unwrap() = state;
    Json(json!({"success": true, "active": state})).into_response()
}

async fn mark_reviewed(State(b): Shared, Path(id): Path<String>, headers: HeaderMap) -> Response {
    if let Err(resp) = b.authorize(&headers) {
        return resp;
    }
    let mut convs = b.conversations.lock().unwrap();
    match convs.get_mut(&id) {
        Some(conv) => {
            conv["reviewed"] = json!(true);
            Json(conv.clone()).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({"message": "Conversa não encontrada"}))).into_response(),
    }
}

/// Serve `backend` on an ephemeral port and return its base URL.
pub async fn serve(backend: Arc<Backend>) -> String {
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/api/webhooks/getAllMessages", get(all_messages))
        .route("/api/webhooks/getMessage/{id}", post(one_message))
        .route("/api/webhooks/systemStatus", get(system_status))
        .route("/api/webhooks/system", post(set_system))
        .route("/api/webhooks/markAsReviewed/{id}", patch(mark_reviewed))
        .with_state(backend);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A server that promises a 500 body longer than what it sends, then hangs up.
pub async fn serve_truncated_error() -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut sock, _)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let _ = sock.read(&mut buf).await;
            let _ = sock
                .write_all(b"HTTP/1.1 500 Internal Server Error\r\ncontent-type: application/json\r\ncontent-length: 200\r\n\r\n{\"message\":")
                .await;
            let _ = sock.shutdown().await;
        }
    });
    format!("http://{addr}")
}

pub struct Harness {
    pub ctx: AppContext,
    pub store: Arc<dyn TokenStore>,
    pub routes: UnboundedReceiver<Route>,
}

impl Harness {
    pub fn new(backend_url: &str, store: Arc<dyn TokenStore>) -> Self {
        let (nav, routes) = ChannelNavigator::channel();
        let config = AppConfig { backend_url: backend_url.to_string(), ..AppConfig::default() };
        let ctx = AppContext::new(config, store.clone(), Arc::new(nav)).unwrap();
        Self { ctx, store, routes }
    }

    pub fn with_token(backend_url: &str, token: Option<&str>) -> Self {
        let store: Arc<dyn TokenStore> = match token {
            Some(t) => Arc::new(MemoryTokenStore::with_token(t)),
            None => Arc::new(MemoryTokenStore::default()),
        };
        Self::new(backend_url, store)
    }

    pub fn next_route(&mut self) -> Option<Route> {
        self.routes.try_recv().ok()
    }
}
