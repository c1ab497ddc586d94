//! A small in-memory amoCRM account for integration tests and local runs.
//!
//! Implements the parts of the vendor API the client exercises end to end:
//! the OAuth token endpoint, the legacy `auth.php` session login, v2/v4
//! account info, v4 leads and v4 webhooks. Requests must carry the current
//! bearer token or a session cookie from `auth.php`; anything else gets the
//! vendor's 401 problem body.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const ACCOUNT_ID: u64 = 1231414;
pub const SUBDOMAIN: &str = "mock";
const MAX_LIMIT: usize = 250;
const SESSION_COOKIE: &str = "session_id";

/// Integration settings and user credentials the mock accepts.
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Access token valid at startup.
    pub access_token: String,
    pub refresh_token: String,
    pub login: String,
    pub api_hash: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            client_id: "mock-client".to_string(),
            client_secret: "mock-secret".to_string(),
            redirect_uri: "https://example.com/oauth".to_string(),
            access_token: "access-0".to_string(),
            refresh_token: "refresh-0".to_string(),
            login: "manager@example.com".to_string(),
            api_hash: "mock-hash".to_string(),
        }
    }
}

struct Tokens {
    access: String,
    refresh: String,
}

#[derive(Default)]
struct Store {
    leads: BTreeMap<u64, Value>,
    next_lead_id: u64,
    webhooks: Vec<Value>,
    next_webhook_id: u64,
    sessions: Vec<String>,
}

struct Shared {
    config: MockConfig,
    tokens: RwLock<Tokens>,
    store: RwLock<Store>,
    refresh_calls: AtomicUsize,
}

/// Handle to the account state. Clones share the same account, so a test
/// can keep one while the server runs with another.
#[derive(Clone)]
pub struct MockState {
    shared: Arc<Shared>,
}

impl Default for MockState {
    fn default() -> Self {
        Self::new(MockConfig::default())
    }
}

impl MockState {
    pub fn new(config: MockConfig) -> Self {
        let tokens = Tokens {
            access: config.access_token.clone(),
            refresh: config.refresh_token.clone(),
        };
        Self {
            shared: Arc::new(Shared {
                config,
                tokens: RwLock::new(tokens),
                store: RwLock::new(Store::default()),
                refresh_calls: AtomicUsize::new(0),
            }),
        }
    }

    pub fn config(&self) -> &MockConfig {
        &self.shared.config
    }

    /// Successful refresh-token exchanges so far.
    pub fn refresh_calls(&self) -> usize {
        self.shared.refresh_calls.load(Ordering::SeqCst)
    }

    pub async fn access_token(&self) -> String {
        self.shared.tokens.read().await.access.clone()
    }

    pub async fn refresh_token(&self) -> String {
        self.shared.tokens.read().await.refresh.clone()
    }

    /// Invalidate the current access token; the refresh token stays valid.
    pub async fn expire_access_token(&self) {
        self.shared.tokens.write().await.access = format!("expired-{}", Uuid::new_v4());
    }

    pub async fn lead_count(&self) -> usize {
        self.shared.store.read().await.leads.len()
    }
}

pub fn app() -> Router {
    router(MockState::default())
}

pub fn router(state: MockState) -> Router {
    Router::new()
        .route("/oauth2/access_token", post(exchange_token))
        .route("/private/api/auth.php", post(legacy_login))
        .route("/api/v2/account", get(legacy_account))
        .route("/api/v4/account", get(account))
        .route("/api/v4/leads", get(list_leads).post(create_leads).patch(update_leads))
        .route("/api/v4/leads/{id}", get(get_lead))
        .route(
            "/api/v4/webhooks",
            get(list_webhooks).post(subscribe_webhook).delete(unsubscribe_webhook),
        )
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, MockState::default()).await
}

pub async fn serve(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, router(state)).await
}

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

fn problem(status: StatusCode, title: &str, detail: &str) -> Response {
    let body = json!({
        "title": title,
        "type": format!("https://httpstatus.es/{}", status.as_u16()),
        "status": status.as_u16(),
        "detail": detail,
    });
    (status, Json(body)).into_response()
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn session_id(headers: &HeaderMap) -> Option<&str> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
}

async fn authorize(state: &MockState, headers: &HeaderMap) -> Result<(), Response> {
    let authorized = match (bearer(headers), session_id(headers)) {
        (Some(token), _) => state.shared.tokens.read().await.access == token,
        (None, Some(session)) => state
            .shared
            .store
            .read()
            .await
            .sessions
            .iter()
            .any(|s| s == session),
        (None, None) => false,
    };
    if authorized {
        Ok(())
    } else {
        Err(problem(StatusCode::UNAUTHORIZED, "Unauthorized", "Access token or session is invalid"))
    }
}

#[derive(Deserialize)]
struct TokenRequest {
    client_id: String,
    client_secret: String,
    grant_type: String,
    refresh_token: Option<String>,
    redirect_uri: String,
}

async fn exchange_token(
    State(state): State<MockState>,
    Json(input): Json<TokenRequest>,
) -> Response {
    let config = &state.shared.config;
    if input.client_id != config.client_id
        || input.client_secret != config.client_secret
        || input.redirect_uri != config.redirect_uri
    {
        return problem(StatusCode::BAD_REQUEST, "Invalid client", "Client authentication failed");
    }

    let mut tokens = state.shared.tokens.write().await;
    if input.grant_type != "refresh_token"
        || input.refresh_token.as_deref() != Some(tokens.refresh.as_str())
    {
        return problem(StatusCode::BAD_REQUEST, "Invalid grant", "Token has been revoked");
    }

    tokens.access = format!("access-{}", Uuid::new_v4());
    tokens.refresh = format!("refresh-{}", Uuid::new_v4());
    state.shared.refresh_calls.fetch_add(1, Ordering::SeqCst);
    tracing::info!(client_id = %input.client_id, "issued new token pair");

    Json(json!({
        "token_type": "Bearer",
        "expires_in": 86400,
        "access_token": tokens.access,
        "refresh_token": tokens.refresh,
    }))
    .into_response()
}

#[derive(Deserialize)]
struct LegacyAuth {
    #[serde(rename = "USER_LOGIN")]
    login: String,
    #[serde(rename = "USER_HASH")]
    api_hash: String,
}

async fn legacy_login(State(state): State<MockState>, Json(input): Json<LegacyAuth>) -> Response {
    let config = &state.shared.config;
    if input.login != config.login || input.api_hash != config.api_hash {
        tracing::warn!(login = %input.login, "rejected legacy login");
        let body = json!({
            "response": { "auth": false, "error": "Wrong login or password", "error_code": "110" }
        });
        return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
    }

    let session = Uuid::new_v4().to_string();
    state.shared.store.write().await.sessions.push(session.clone());
    tracing::info!(login = %input.login, "legacy session opened");

    let cookies = AppendHeaders([
        (header::SET_COOKIE, format!("{SESSION_COOKIE}={session}; path=/; HttpOnly")),
        (header::SET_COOKIE, "user_lang=ru; path=/".to_string()),
    ]);
    let body = json!({
        "response": {
            "auth": true,
            "accounts": [{ "id": ACCOUNT_ID, "subdomain": SUBDOMAIN }],
            "server_time": now(),
        }
    });
    (cookies, Json(body)).into_response()
}

fn account_body() -> Value {
    json!({
        "id": ACCOUNT_ID,
        "name": "Mock account",
        "subdomain": SUBDOMAIN,
        "currency": "RUB",
        "country": "RU",
    })
}

async fn legacy_account(State(state): State<MockState>, headers: HeaderMap) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    Json(json!({ "response": { "account": account_body(), "server_time": now() } })).into_response()
}

async fn account(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    let mut body = account_body();
    let with = params.get("with").map(String::as_str).unwrap_or_default();
    if with.split(',').any(|w| w == "amojo_id") {
        body["amojo_id"] = json!(Uuid::new_v4());
    }
    Json(body).into_response()
}

fn default_limit() -> usize {
    MAX_LIMIT
}

fn first_page() -> usize {
    1
}

#[derive(Deserialize)]
struct PageParams {
    #[serde(default = "default_limit")]
    limit: usize,
    #[serde(default = "first_page")]
    page: usize,
}

async fn list_leads(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    let limit = params.limit.clamp(1, MAX_LIMIT);
    let page = params.page.max(1);

    let store = state.shared.store.read().await;
    let leads: Vec<Value> = store
        .leads
        .values()
        .skip((page - 1) * limit)
        .take(limit)
        .cloned()
        .collect();
    if leads.is_empty() {
        return StatusCode::NO_CONTENT.into_response();
    }
    Json(json!({
        "_page": page,
        "_links": { "self": { "href": format!("/api/v4/leads?limit={limit}&page={page}") } },
        "_embedded": { "leads": leads },
    }))
    .into_response()
}

async fn get_lead(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    match state.shared.store.read().await.leads.get(&id) {
        Some(lead) => Json(lead.clone()).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn create_leads(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(input): Json<Vec<Value>>,
) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    let mut store = state.shared.store.write().await;
    let mut created = Vec::with_capacity(input.len());
    for (index, lead) in input.into_iter().enumerate() {
        let Value::Object(mut fields) = lead else {
            return problem(StatusCode::BAD_REQUEST, "Bad Request", "each lead must be an object");
        };
        store.next_lead_id += 1;
        let id = store.next_lead_id;
        let request_id = fields
            .remove("request_id")
            .unwrap_or_else(|| Value::String(index.to_string()));
        fields.insert("id".to_string(), json!(id));
        fields.insert("created_at".to_string(), json!(now()));
        store.leads.insert(id, Value::Object(fields));
        created.push(json!({ "id": id, "request_id": request_id }));
    }
    tracing::debug!(count = created.len(), "created leads");
    Json(json!({ "_embedded": { "leads": created } })).into_response()
}

async fn update_leads(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(input): Json<Vec<Value>>,
) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    let mut store = state.shared.store.write().await;
    let mut updated = Vec::with_capacity(input.len());
    for lead in input {
        let Some(changes) = lead.as_object() else {
            return problem(StatusCode::BAD_REQUEST, "Bad Request", "each lead must be an object");
        };
        let Some(existing) = changes
            .get("id")
            .and_then(Value::as_u64)
            .and_then(|id| store.leads.get_mut(&id))
            .and_then(Value::as_object_mut)
        else {
            return problem(StatusCode::BAD_REQUEST, "Bad Request", "lead id is missing or unknown");
        };
        merge(existing, changes);
        existing.insert("updated_at".to_string(), json!(now()));
        updated.push(json!({ "id": existing["id"], "updated_at": existing["updated_at"] }));
    }
    Json(json!({ "_embedded": { "leads": updated } })).into_response()
}

fn merge(target: &mut Map<String, Value>, changes: &Map<String, Value>) {
    for (key, value) in changes {
        target.insert(key.clone(), value.clone());
    }
}

async fn list_webhooks(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    let destination = params.get("filter[destination]");
    let store = state.shared.store.read().await;
    let hooks: Vec<Value> = store
        .webhooks
        .iter()
        .filter(|hook| destination.map_or(true, |d| hook["destination"] == d.as_str()))
        .cloned()
        .collect();
    if hooks.is_empty() {
        return StatusCode::NO_CONTENT.into_response();
    }
    Json(json!({ "_total_items": hooks.len(), "_embedded": { "webhooks": hooks } })).into_response()
}

#[derive(Deserialize)]
struct WebhookInput {
    destination: String,
    #[serde(default)]
    settings: Vec<String>,
}

async fn subscribe_webhook(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(input): Json<WebhookInput>,
) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    let mut store = state.shared.store.write().await;
    store.next_webhook_id += 1;
    let hook = json!({
        "id": store.next_webhook_id,
        "destination": input.destination,
        "created_at": now(),
        "account_id": ACCOUNT_ID,
        "sort": store.webhooks.len() + 1,
        "disabled": false,
        "settings": input.settings,
    });
    store.webhooks.push(hook.clone());
    Json(hook).into_response()
}

#[derive(Deserialize)]
struct WebhookTarget {
    destination: String,
}

async fn unsubscribe_webhook(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(input): Json<WebhookTarget>,
) -> Response {
    if let Err(denied) = authorize(&state, &headers).await {
        return denied;
    }
    state
        .shared
        .store
        .write()
        .await
        .webhooks
        .retain(|hook| hook["destination"] != input.destination.as_str());
    StatusCode::NO_CONTENT.into_response()
}
