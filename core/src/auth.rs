//! Authentication state held by a client instance.
//!
//! # Design
//! Each variant owns its credentials outright. The OAuth pair sits behind a
//! mutex and is only ever replaced as a whole by `OAuthSession::refresh`.
//! The mutex is held for the whole token exchange, so concurrent callers that
//! hit a 401 at the same time produce one exchange: the second caller sees
//! that the token it was rejected with is already gone and just retries.

use parking_lot::{Mutex, RwLock};
use serde_json::Value;

use crate::credentials::{LegacyCredentials, OAuthCredentials, RefreshResponse, TokenPair};
use crate::dispatch::{decode_body, parse_response};
use crate::error::{AmoError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;

/// Called with the new pair after every successful token exchange.
pub type RefreshListener = Box<dyn Fn(&TokenPair) + Send + Sync>;

/// How a client authenticates.
#[derive(Clone)]
pub enum Auth {
    /// OAuth bearer token with refresh-on-401.
    OAuth(OAuthCredentials),
    /// Static long-lived bearer token. A 401 is returned as is.
    LongLivedToken(String),
    /// Login + API hash against the legacy session endpoint.
    Legacy(LegacyCredentials),
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Auth::OAuth(credentials) => f.debug_tuple("OAuth").field(credentials).finish(),
            Auth::LongLivedToken(_) => f
                .debug_tuple("LongLivedToken")
                .field(&"<redacted>")
                .finish(),
            Auth::Legacy(credentials) => f.debug_tuple("Legacy").field(credentials).finish(),
        }
    }
}

pub(crate) enum AuthState {
    OAuth(OAuthSession),
    Bearer(String),
    Legacy(LegacySession),
}

impl AuthState {
    pub(crate) fn new(auth: Auth) -> Self {
        match auth {
            Auth::OAuth(credentials) => AuthState::OAuth(OAuthSession::new(credentials)),
            Auth::LongLivedToken(token) => AuthState::Bearer(token),
            Auth::Legacy(credentials) => AuthState::Legacy(LegacySession::new(credentials)),
        }
    }

    /// Add the auth headers for one request. Returns the access token used,
    /// if any, so a 401 can be matched against it later.
    pub(crate) fn apply(&self, headers: &mut Vec<(String, String)>) -> Option<String> {
        match self {
            AuthState::OAuth(session) => {
                let access_token = session.access_token();
                headers.push(bearer(&access_token));
                Some(access_token)
            }
            AuthState::Bearer(token) => {
                headers.push(bearer(token));
                None
            }
            AuthState::Legacy(session) => {
                if let Some(cookie) = session.cookie.read().as_ref() {
                    headers.push(("Cookie".to_string(), cookie.clone()));
                }
                None
            }
        }
    }
}

fn bearer(token: &str) -> (String, String) {
    ("Authorization".to_string(), format!("Bearer {token}"))
}

pub(crate) struct OAuthSession {
    credentials: Mutex<OAuthCredentials>,
    listener: Option<RefreshListener>,
}

impl OAuthSession {
    fn new(credentials: OAuthCredentials) -> Self {
        Self {
            credentials: Mutex::new(credentials),
            listener: None,
        }
    }

    pub(crate) fn set_listener(&mut self, listener: RefreshListener) {
        self.listener = Some(listener);
    }

    pub(crate) fn access_token(&self) -> String {
        self.credentials.lock().tokens.access_token.clone()
    }

    pub(crate) fn tokens(&self) -> TokenPair {
        self.credentials.lock().tokens.clone()
    }

    /// Exchange the refresh token for a new pair, unless `rejected_token` has
    /// already been replaced by another caller.
    pub(crate) fn refresh(
        &self,
        transport: &dyn Transport,
        base_url: &str,
        base_headers: Vec<(String, String)>,
        rejected_token: &str,
    ) -> Result<TokenPair> {
        let mut credentials = self.credentials.lock();
        if credentials.tokens.access_token != rejected_token {
            tracing::debug!("access token already refreshed by another caller");
            return Ok(credentials.tokens.clone());
        }

        let body = serde_json::to_string(&credentials.refresh_request())
            .map_err(AmoError::transport)?;
        let request = HttpRequest {
            method: HttpMethod::Post,
            url: format!("{base_url}/oauth2/access_token"),
            headers: base_headers,
            body: Some(body),
        };

        let tokens = match transport.execute(&request).and_then(parse_token_response) {
            Ok(tokens) => tokens,
            Err(err) => {
                tracing::error!(code = err.code(), "token refresh failed");
                return Err(err);
            }
        };
        credentials.tokens = tokens.clone();
        drop(credentials);

        tracing::info!("access token refreshed");
        if let Some(listener) = &self.listener {
            listener(&tokens);
        }
        Ok(tokens)
    }
}

fn parse_token_response(response: HttpResponse) -> Result<TokenPair> {
    let status = response.status;
    let data = decode_body(&response.body)?;
    if !(200..300).contains(&status) {
        return Err(AmoError::new(data, status));
    }
    let parsed: RefreshResponse = serde_json::from_value(data).map_err(AmoError::transport)?;
    Ok(parsed.into())
}

pub(crate) struct LegacySession {
    credentials: LegacyCredentials,
    cookie: RwLock<Option<String>>,
}

impl LegacySession {
    fn new(credentials: LegacyCredentials) -> Self {
        Self {
            credentials,
            cookie: RwLock::new(None),
        }
    }

    /// Authenticate against `/private/api/auth.php` and keep the session
    /// cookie for later requests.
    pub(crate) fn login(
        &self,
        transport: &dyn Transport,
        base_url: &str,
        base_headers: Vec<(String, String)>,
    ) -> Result<()> {
        let body =
            serde_json::to_string(&self.credentials.auth_request()).map_err(AmoError::transport)?;
        let request = HttpRequest {
            method: HttpMethod::Post,
            url: format!("{base_url}/private/api/auth.php?type=json"),
            headers: base_headers,
            body: Some(body),
        };

        let response = transport.execute(&request)?;
        let cookie = session_cookie(&response);
        let payload = match parse_response(response) {
            Ok(payload) => payload,
            // rejected logins come back as 200 with an error in the envelope
            Err(err) if err.code() < 400 => err.into_data(),
            Err(err) => return Err(err),
        };
        if !payload.get("auth").is_some_and(is_truthy) {
            tracing::error!(login = %self.credentials.login, "legacy login rejected");
            return Err(AmoError::new(payload, 401));
        }

        tracing::info!(login = %self.credentials.login, "legacy session established");
        *self.cookie.write() = cookie;
        Ok(())
    }
}

/// Collapse every `Set-Cookie` into one `Cookie` header value.
fn session_cookie(response: &HttpResponse) -> Option<String> {
    let pairs: Vec<&str> = response
        .header_values("set-cookie")
        .filter_map(|raw| raw.split(';').next())
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .collect();
    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("; "))
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Null => false,
    }
}
