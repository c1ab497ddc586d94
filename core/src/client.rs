//! Blocking amoCRM client.
//!
//! # Design
//! `AmoClient` owns its configuration, its authentication state and a
//! `Transport`. Every endpoint method funnels into `send`, which:
//! 1. builds an `HttpRequest` with the base headers and the auth headers,
//! 2. executes it and interprets the response with `parse_response`,
//! 3. on a 401 with OAuth credentials, refreshes the token pair once and
//!    re-issues the same request once. A second 401 is returned as is.
//!
//! Endpoint methods live in `crate::api` and `crate::legacy`; they only
//! build paths, query strings and bodies.

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;

use crate::auth::{Auth, AuthState, RefreshListener};
use crate::config::ClientConfig;
use crate::credentials::{LegacyCredentials, OAuthCredentials, TokenPair};
use crate::dispatch::parse_response;
use crate::error::{AmoError, Result};
use crate::http::{HttpMethod, HttpRequest};
use crate::query::Query;
use crate::transport::{Transport, UreqTransport};

pub struct AmoClient<T = UreqTransport> {
    crm_url: String,
    user_agent: String,
    session_headers: RwLock<Vec<(String, String)>>,
    auth: AuthState,
    transport: T,
}

impl AmoClient<UreqTransport> {
    /// Client for the current API with OAuth tokens that refresh on 401.
    pub fn oauth(crm_url: &str, credentials: OAuthCredentials) -> Self {
        Self::from_parts(
            ClientConfig::new(crm_url),
            AuthState::new(Auth::OAuth(credentials)),
            UreqTransport::default(),
        )
    }

    /// Client for the current API with a long-lived token.
    pub fn long_lived(crm_url: &str, token: impl Into<String>) -> Self {
        Self::from_parts(
            ClientConfig::new(crm_url),
            AuthState::new(Auth::LongLivedToken(token.into())),
            UreqTransport::default(),
        )
    }

    /// Client authenticated with login and API hash. Logs in immediately.
    pub fn legacy(crm_url: &str, credentials: LegacyCredentials) -> Result<Self> {
        Self::new(ClientConfig::new(crm_url), Auth::Legacy(credentials))
    }

    pub fn new(config: ClientConfig, auth: Auth) -> Result<Self> {
        let transport = UreqTransport::new(config.timeout);
        Self::with_transport(config, auth, transport)
    }
}

impl<T: Transport> AmoClient<T> {
    /// Build a client on an arbitrary transport. Legacy credentials are
    /// exchanged for a session before this returns.
    pub fn with_transport(config: ClientConfig, auth: Auth, transport: T) -> Result<Self> {
        let client = Self::from_parts(config, AuthState::new(auth), transport);
        client.login()?;
        Ok(client)
    }

    fn from_parts(config: ClientConfig, auth: AuthState, transport: T) -> Self {
        Self {
            crm_url: config.crm_url,
            user_agent: config.user_agent,
            session_headers: RwLock::new(config.headers),
            auth,
            transport,
        }
    }

    /// Register a callback that receives every refreshed token pair, e.g. to
    /// persist it. Has no effect on non-OAuth clients.
    pub fn on_token_refresh(
        mut self,
        listener: impl Fn(&TokenPair) + Send + Sync + 'static,
    ) -> Self {
        if let AuthState::OAuth(session) = &mut self.auth {
            let listener: RefreshListener = Box::new(listener);
            session.set_listener(listener);
        }
        self
    }

    pub fn crm_url(&self) -> &str {
        &self.crm_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Current OAuth token pair, `None` for other variants.
    pub fn tokens(&self) -> Option<TokenPair> {
        match &self.auth {
            AuthState::OAuth(session) => Some(session.tokens()),
            _ => None,
        }
    }

    /// Exchange the refresh token now, regardless of the access token state.
    ///
    /// On a client without OAuth credentials this fails with code 400 before
    /// any request is sent.
    pub fn refresh_tokens(&self) -> Result<TokenPair> {
        let AuthState::OAuth(session) = &self.auth else {
            return Err(AmoError::new(
                serde_json::json!({ "error": "client is not configured for OAuth" }),
                400,
            ));
        };
        let current = session.access_token();
        session.refresh(&self.transport, &self.crm_url, self.base_headers(), &current)
    }

    /// Replace the extra headers sent with every request. Legacy clients
    /// re-authenticate with the new headers; if that login fails the previous
    /// headers and session stay in place.
    pub fn update_session_params(&self, headers: Vec<(String, String)>) -> Result<()> {
        let previous = std::mem::replace(&mut *self.session_headers.write(), headers);
        if let Err(err) = self.login() {
            *self.session_headers.write() = previous;
            return Err(err);
        }
        Ok(())
    }

    /// Send a request to any path under the account URL, e.g.
    /// `/api/v4/leads/loss_reasons`.
    pub fn request(&self, method: HttpMethod, path: &str, body: Option<&Value>) -> Result<Value> {
        let body = body.map(encode_body).transpose()?;
        self.send(method, path, body)
    }

    pub(crate) fn get(&self, path: &str) -> Result<Value> {
        self.send(HttpMethod::Get, path, None)
    }

    pub(crate) fn get_query(&self, path: &str, query: &Query) -> Result<Value> {
        self.send(HttpMethod::Get, &query.append_to(path), None)
    }

    pub(crate) fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        self.send(HttpMethod::Post, path, Some(encode_body(body)?))
    }

    pub(crate) fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        self.send(HttpMethod::Patch, path, Some(encode_body(body)?))
    }

    pub(crate) fn delete(&self, path: &str) -> Result<Value> {
        self.send(HttpMethod::Delete, path, None)
    }

    pub(crate) fn delete_with<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        self.send(HttpMethod::Delete, path, Some(encode_body(body)?))
    }

    fn send(&self, method: HttpMethod, path: &str, body: Option<String>) -> Result<Value> {
        let url = format!("{}{}", self.crm_url, path);
        let (request, used_token) = self.build_request(method, url, body);

        match self.dispatch(&request) {
            Err(err) if err.is_unauthorized() => {
                let (AuthState::OAuth(session), Some(used_token)) = (&self.auth, used_token) else {
                    return Err(err);
                };
                tracing::warn!(
                    method = %request.method,
                    url = %request.url,
                    "401 received, refreshing access token"
                );
                session.refresh(&self.transport, &self.crm_url, self.base_headers(), &used_token)?;

                let (retry, _) = self.build_request(request.method, request.url, request.body);
                self.dispatch(&retry)
            }
            result => result,
        }
    }

    fn build_request(
        &self,
        method: HttpMethod,
        url: String,
        body: Option<String>,
    ) -> (HttpRequest, Option<String>) {
        let mut headers = self.base_headers();
        let used_token = self.auth.apply(&mut headers);
        let request = HttpRequest {
            method,
            url,
            headers,
            body,
        };
        (request, used_token)
    }

    fn dispatch(&self, request: &HttpRequest) -> Result<Value> {
        tracing::debug!(method = %request.method, url = %request.url, "amoCRM request");
        let response = self.transport.execute(request)?;
        parse_response(response)
    }

    fn base_headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![("User-Agent".to_string(), self.user_agent.clone())];
        headers.extend(self.session_headers.read().iter().cloned());
        headers
    }

    fn login(&self) -> Result<()> {
        match &self.auth {
            AuthState::Legacy(session) => {
                session.login(&self.transport, &self.crm_url, self.base_headers())
            }
            _ => Ok(()),
        }
    }
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<String> {
    serde_json::to_string(body).map_err(AmoError::transport)
}
